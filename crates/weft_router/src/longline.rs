//! Long-line shortcuts for long-distance connections.
//!
//! When source and sink are far apart on either axis, expanding the whole
//! corridor tile by tile wastes most of the node budget. Instead the router
//! probes from the source to the nearest long line running the dominant
//! direction, rides long-line hops until the remaining distance drops under
//! the threshold, and hands the resulting chain to the main search as a
//! pre-paid seed. Every step here is bounded; any failure simply falls back
//! to the plain search.

use crate::node::{NodeIdx, QueueEntry};
use crate::router::Router;
use std::collections::{BinaryHeap, HashSet};
use weft_device::{ConnKind, IntentCode, WireRef};
use weft_netlist::NetId;

impl Router<'_> {
    /// Builds a seed chain riding a long line toward `target`.
    ///
    /// On success the chain lives in the search arena with its wires marked
    /// visited, and the returned node carries the cost to enqueue it with.
    /// The caller must have reset the search state first.
    pub(crate) fn long_line_seed(
        &mut self,
        net: NetId,
        source: WireRef,
        target: WireRef,
    ) -> Option<NodeIdx> {
        let wanted = self.dominant_long_intent(source, target);
        let candidates = self.nearest_long_lines(source, wanted);
        if candidates.is_empty() {
            return None;
        }
        let reached = self.probe_to_long_line(net, source, target, &candidates)?;
        let end = self.thread_long_line(net, reached, target, wanted);
        let node = self.arena.node(end);
        let dist = self.device.manhattan(node.wire, target) as i32;
        let cost = (dist << 1) + node.level;
        self.arena.set_cost(end, cost);
        Some(end)
    }

    fn dominant_long_intent(&self, source: WireRef, target: WireRef) -> IntentCode {
        let ts = self.device.tile(source.tile);
        let tt = self.device.tile(target.tile);
        if (ts.x - tt.x).abs() >= (ts.y - tt.y).abs() {
            IntentCode::LongHoriz
        } else {
            IntentCode::LongVert
        }
    }

    /// Long-line wires of the wanted orientation within a two-tile window
    /// around the source, nearest first.
    fn nearest_long_lines(&self, source: WireRef, wanted: IntentCode) -> HashSet<WireRef> {
        let src_tile = self.device.tile(source.tile);
        let mut found = HashSet::new();
        for tile_id in self.device.tile_ids() {
            let tile = self.device.tile(tile_id);
            if (tile.x - src_tile.x).abs() > 2 || (tile.y - src_tile.y).abs() > 2 {
                continue;
            }
            for (i, wire) in tile.wires.iter().enumerate() {
                if wire.intent == wanted {
                    found.insert(WireRef::new(
                        tile_id,
                        weft_device::WireIdx::from_raw(i as u32),
                    ));
                }
            }
        }
        found
    }

    /// Bounded search from the source to any of the candidate long wires.
    /// Pin-feed wires are skipped; they lead into sites, never onto lines.
    fn probe_to_long_line(
        &mut self,
        net: NetId,
        source: WireRef,
        target: WireRef,
        candidates: &HashSet<WireRef>,
    ) -> Option<NodeIdx> {
        let mut heap: BinaryHeap<QueueEntry> = BinaryHeap::new();
        let root = self.arena.push(source, None, None, 0);
        self.arena.set_cost(root, 0);
        self.visited.insert(source);
        heap.push(QueueEntry {
            cost: 0,
            seq: self.seq,
            idx: root,
        });
        self.seq += 1;

        let mut probed = 0usize;
        while let Some(entry) = heap.pop() {
            if probed > self.config.long_line_probe_budget {
                return None;
            }
            probed += 1;
            self.nodes_expanded += 1;
            let node = self.arena.node(entry.idx);
            let (wire, level) = (node.wire, node.level);
            if candidates.contains(&wire) {
                return Some(entry.idx);
            }
            let conns: Vec<_> = self.device.conns(wire).to_vec();
            for conn in conns {
                let next = conn.dest;
                if self.visited.contains(&next) {
                    continue;
                }
                if self.device.intent(next).is_pin_feed() {
                    continue;
                }
                if conn.kind == ConnKind::RouteThru {
                    continue;
                }
                if !self.wire_free_for(net, next) {
                    continue;
                }
                let dist = self.device.manhattan(next, target) as i32;
                let cost = (dist << 1) + level + 1;
                let idx = self.arena.push(next, Some(entry.idx), Some(conn.kind), level + 1);
                self.arena.set_cost(idx, cost);
                self.visited.insert(next);
                heap.push(QueueEntry {
                    cost,
                    seq: self.seq,
                    idx,
                });
                self.seq += 1;
            }
        }
        None
    }

    /// Rides long-line hops toward the target until the remaining distance
    /// is short or no hop makes progress.
    fn thread_long_line(
        &mut self,
        net: NetId,
        from: NodeIdx,
        target: WireRef,
        wanted: IntentCode,
    ) -> NodeIdx {
        let mut current = from;
        let mut hops = 0usize;
        loop {
            let node = self.arena.node(current);
            let (wire, level) = (node.wire, node.level);
            let remaining = self.device.manhattan(wire, target) as i32;
            if remaining <= self.config.long_line_threshold
                || hops >= self.config.long_line_watchdog
            {
                return current;
            }
            let mut best: Option<(u32, WireRef, ConnKind)> = None;
            for conn in self.device.conns(wire) {
                let next = conn.dest;
                if self.visited.contains(&next) {
                    continue;
                }
                if self.device.intent(next) != wanted {
                    continue;
                }
                if !self.wire_free_for(net, next) {
                    continue;
                }
                let dist = self.device.manhattan(next, target);
                if dist as i32 >= remaining {
                    continue;
                }
                let better = match best {
                    Some((best_dist, best_wire, _)) => {
                        dist < best_dist
                            || (dist == best_dist
                                && (next.tile.as_raw(), next.wire.as_raw())
                                    < (best_wire.tile.as_raw(), best_wire.wire.as_raw()))
                    }
                    None => true,
                };
                if better {
                    best = Some((dist, next, conn.kind));
                }
            }
            let Some((_, next, kind)) = best else {
                return current;
            };
            current = self.arena.push(next, Some(current), Some(kind), level + 1);
            self.visited.insert(next);
            hops += 1;
        }
    }

    fn wire_free_for(&self, net: NetId, wire: WireRef) -> bool {
        if let Some(&holder) = self.reserved_by.get(&wire) {
            if holder != net {
                return false;
            }
        }
        match self.owners.get(&wire) {
            Some(owners) => owners.iter().all(|&n| n == net),
            None => true,
        }
    }
}
