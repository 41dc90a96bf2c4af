//! Search arena and priority-queue entries for the maze router.
//!
//! Search states live in a flat arena that is cleared between connections;
//! parent links are arena indices, so path reconstruction never chases heap
//! pointers and resetting a search is a single `clear`.

use std::cmp::Ordering;
use weft_device::{ConnKind, Device, Pip, WireRef};

/// Index of a search node within the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIdx(u32);

impl NodeIdx {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One state of an in-flight search.
#[derive(Debug, Clone, Copy)]
pub struct SearchNode {
    /// The wire this state sits on.
    pub wire: WireRef,
    /// The state this one was expanded from, `None` for seeds.
    pub parent: Option<NodeIdx>,
    /// The kind of edge taken from the parent, `None` for seeds.
    pub edge: Option<ConnKind>,
    /// PIP count from the seed.
    pub level: i32,
    /// Cost assigned when the state was enqueued.
    pub cost: i32,
}

/// Flat storage for the states of one connection search.
#[derive(Debug, Default)]
pub struct SearchArena {
    nodes: Vec<SearchNode>,
}

impl SearchArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all states. Indices from before the clear must not be reused.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Allocates a new state and returns its index.
    pub fn push(
        &mut self,
        wire: WireRef,
        parent: Option<NodeIdx>,
        edge: Option<ConnKind>,
        level: i32,
    ) -> NodeIdx {
        let idx = NodeIdx(self.nodes.len() as u32);
        self.nodes.push(SearchNode {
            wire,
            parent,
            edge,
            level,
            cost: 0,
        });
        idx
    }

    /// Returns the state at an index.
    pub fn node(&self, idx: NodeIdx) -> &SearchNode {
        &self.nodes[idx.index()]
    }

    /// Stores the queue cost on a state.
    pub fn set_cost(&mut self, idx: NodeIdx, cost: i32) {
        self.nodes[idx.index()].cost = cost;
    }

    /// Returns the wires from the seed to `idx`, seed first.
    pub fn path_from_root(&self, idx: NodeIdx) -> Vec<WireRef> {
        let mut path = Vec::new();
        let mut current = Some(idx);
        while let Some(i) = current {
            let node = self.node(i);
            path.push(node.wire);
            current = node.parent;
        }
        path.reverse();
        path
    }

    /// Collects the PIPs along the path from the seed to `idx`.
    ///
    /// Node-continuation hops contribute nothing; PIP and route-through hops
    /// are resolved against the device.
    pub fn pips_to_root(&self, device: &Device, idx: NodeIdx) -> Vec<Pip> {
        let mut pips = Vec::new();
        let mut current = idx;
        while let Some(parent) = self.node(current).parent {
            let node = self.node(current);
            if matches!(node.edge, Some(ConnKind::Pip) | Some(ConnKind::RouteThru)) {
                let from = self.node(parent).wire;
                if let Some(pip) = device.find_pip(node.wire.tile, from.wire, node.wire.wire) {
                    pips.push(pip);
                }
            }
            current = parent;
        }
        pips.reverse();
        pips
    }
}

/// A priority-queue entry ordered as a min-heap on `(cost, seq)`.
///
/// The discovery sequence breaks cost ties, so two runs over the same design
/// pop states in the same order and produce the same routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry {
    /// The cost of the state when enqueued.
    pub cost: i32,
    /// Monotonic discovery counter.
    pub seq: u64,
    /// The arena index of the state.
    pub idx: NodeIdx,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default)
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;
    use weft_device::{DeviceBuilder, IntentCode, Series, TileId, TileKind, WireIdx};

    fn wire(t: u32, w: u32) -> WireRef {
        WireRef::new(TileId::from_raw(t), WireIdx::from_raw(w))
    }

    #[test]
    fn path_reconstruction_seed_first() {
        let mut arena = SearchArena::new();
        let a = arena.push(wire(0, 0), None, None, 0);
        let b = arena.push(wire(0, 1), Some(a), Some(ConnKind::Pip), 1);
        let c = arena.push(wire(1, 1), Some(b), Some(ConnKind::Node), 1);
        assert_eq!(arena.path_from_root(c), vec![wire(0, 0), wire(0, 1), wire(1, 1)]);
    }

    #[test]
    fn pips_skip_node_hops() {
        let mut b = DeviceBuilder::new("t", Series::UltraScale);
        let t0 = b.tile("INT_X0Y0", TileKind::Interconnect, 0, 0);
        let t1 = b.tile("INT_X1Y0", TileKind::Interconnect, 1, 0);
        let w0 = b.wire(t0, "A", IntentCode::Default);
        let w1 = b.wire(t0, "B", IntentCode::Default);
        let w2 = b.wire(t1, "B_END", IntentCode::Default);
        b.pip(w0, w1);
        b.node(w1, w2);
        let dev = b.finish();

        let mut arena = SearchArena::new();
        let a = arena.push(w0, None, None, 0);
        let mid = arena.push(w1, Some(a), Some(ConnKind::Pip), 1);
        let end = arena.push(w2, Some(mid), Some(ConnKind::Node), 1);
        let pips = arena.pips_to_root(&dev, end);
        assert_eq!(pips.len(), 1);
        assert_eq!(pips[0].start_wire, w0.wire);
        assert_eq!(pips[0].end_wire, w1.wire);
    }

    #[test]
    fn queue_pops_lowest_cost_first() {
        let mut arena = SearchArena::new();
        let a = arena.push(wire(0, 0), None, None, 0);
        let b = arena.push(wire(0, 1), None, None, 0);
        let mut heap = BinaryHeap::new();
        heap.push(QueueEntry { cost: 7, seq: 0, idx: a });
        heap.push(QueueEntry { cost: 3, seq: 1, idx: b });
        assert_eq!(heap.pop().unwrap().idx, b);
        assert_eq!(heap.pop().unwrap().idx, a);
    }

    #[test]
    fn queue_breaks_ties_by_discovery_order() {
        let mut arena = SearchArena::new();
        let a = arena.push(wire(0, 0), None, None, 0);
        let b = arena.push(wire(0, 1), None, None, 0);
        let mut heap = BinaryHeap::new();
        heap.push(QueueEntry { cost: 5, seq: 1, idx: b });
        heap.push(QueueEntry { cost: 5, seq: 0, idx: a });
        assert_eq!(heap.pop().unwrap().idx, a);
        assert_eq!(heap.pop().unwrap().idx, b);
    }
}
