//! Clock-network routing.
//!
//! Clock nets never ride the general fabric. They climb from the global
//! buffer onto horizontal routing tracks, travel to a centroid region,
//! spread across the sink regions on distribution tracks, drop into leaf
//! buffers, and only then fan out to the sink pins. The layer names differ
//! between hardware generations, so a [`ClockArch`] is picked once from the
//! device series and drives the staged pipeline.
//!
//! Any stage that cannot complete is a hard error: a design whose clock
//! cannot be routed is unusable, unlike a signal net that can be retried or
//! reported.

mod ultrascale;
mod versal;

use crate::node::NodeIdx;
use crate::router::Router;
use std::collections::BTreeSet;
use weft_common::{InternalError, WeftResult};
use weft_device::{
    ClockRegion, ConnKind, Device, IntentCode, Series, SiteKind, TileId, WireIdx, WireRef,
};
use weft_netlist::{Design, NetId};

/// The clock-network strategy for one hardware generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockArch {
    /// The UltraScale routing/distribution layer structure.
    UltraScale,
    /// The Versal layer structure with second-level vertical distribution.
    Versal,
}

impl ClockArch {
    /// Picks the strategy for a device series.
    pub fn for_series(series: Series) -> Self {
        match series {
            Series::UltraScale => ClockArch::UltraScale,
            Series::Versal => ClockArch::Versal,
        }
    }

    /// Routes one clock net through the staged pipeline.
    pub(crate) fn route(
        self,
        router: &mut Router<'_>,
        design: &mut Design,
        net: NetId,
    ) -> WeftResult<()> {
        match self {
            ClockArch::UltraScale => ultrascale::route_clock_net(router, design, net),
            ClockArch::Versal => versal::route_clock_net(router, design, net),
        }
    }
}

/// The clock regions containing the net's sinks, in deterministic order.
pub(crate) fn sink_regions(
    device: &Device,
    design: &Design,
    net: NetId,
) -> BTreeSet<ClockRegion> {
    let mut regions = BTreeSet::new();
    for &sink in &design.net(net).sinks {
        let pin = design.pin(sink);
        let tile = device.site(pin.site).tile;
        if let Some(region) = device.clock_region(tile) {
            regions.insert(region);
        }
    }
    regions
}

/// The centroid region of a sink spread: the midpoint of the bounding box.
pub(crate) fn centroid_region(regions: &BTreeSet<ClockRegion>) -> Option<ClockRegion> {
    let first = regions.iter().next()?;
    let (mut min_col, mut max_col) = (first.col, first.col);
    let (mut min_row, mut max_row) = (first.row, first.row);
    for region in regions {
        min_col = min_col.min(region.col);
        max_col = max_col.max(region.col);
        min_row = min_row.min(region.row);
        max_row = max_row.max(region.row);
    }
    Some(ClockRegion {
        col: (min_col + max_col) / 2,
        row: (min_row + max_row) / 2,
    })
}

/// An arbitrary-but-deterministic tile inside a region, used as the distance
/// target while steering a stage toward that region.
pub(crate) fn region_anchor(device: &Device, region: ClockRegion) -> Option<TileId> {
    device.tiles_in_region(region).next()
}

/// A wire reference usable purely as a distance target for a tile.
pub(crate) fn tile_anchor(tile: TileId) -> WireRef {
    WireRef::new(tile, WireIdx::from_raw(0))
}

/// Builds the hard error for a stage that found no track.
pub(crate) fn stage_error(design: &Design, net: NetId, stage: &str) -> InternalError {
    InternalError::new(format!(
        "clock net '{}': no {stage} reachable",
        design.net(net).name
    ))
}

impl Router<'_> {
    /// Runs one bounded stage search over the clock network.
    ///
    /// Expands from `seeds` until a popped wire satisfies `accept` (which
    /// also sees the wire's parent in the search tree), the watchdog fires,
    /// or the frontier empties. A stage constrained to a region (`within`)
    /// never expands a wire outside it. Dedicated clock wires are strongly
    /// favored in the queue.
    pub(crate) fn clock_stage<F>(
        &mut self,
        net: NetId,
        seeds: &[WireRef],
        cost_target: WireRef,
        watchdog: usize,
        within: Option<ClockRegion>,
        mut accept: F,
    ) -> Option<NodeIdx>
    where
        F: FnMut(&Device, WireRef, Option<WireRef>) -> bool,
    {
        self.arena.clear();
        self.queue.clear();
        self.visited.clear();
        for &wire in seeds {
            self.seed(wire, cost_target);
        }
        let mut processed = 0usize;
        while let Some(entry) = self.queue.pop() {
            if processed > watchdog {
                return None;
            }
            processed += 1;
            self.nodes_expanded += 1;
            let node = self.arena.node(entry.idx);
            let (wire, level) = (node.wire, node.level);
            let parent_wire = node.parent.map(|p| self.arena.node(p).wire);
            if accept(self.device, wire, parent_wire) {
                return Some(entry.idx);
            }
            let conns: Vec<_> = self.device.conns(wire).to_vec();
            for conn in conns {
                let next = conn.dest;
                if conn.kind == ConnKind::RouteThru {
                    continue;
                }
                if self.visited.contains(&next) {
                    continue;
                }
                if let Some(region) = within {
                    if self.device.clock_region(next.tile) != Some(region) {
                        continue;
                    }
                }
                if self.device.intent(next) == IntentCode::ExclusiveSink {
                    continue;
                }
                if !self.clock_wire_usable(net, next) {
                    continue;
                }
                let dist = self.device.manhattan(next, cost_target) as i32;
                let mut cost = (dist << 1) + level + 1;
                if self.device.intent(next).is_clock_network() {
                    cost -= 1000;
                }
                let idx = self.arena.push(next, Some(entry.idx), Some(conn.kind), level + 1);
                self.arena.set_cost(idx, cost);
                self.visited.insert(next);
                self.enqueue(idx, cost);
            }
        }
        None
    }

    fn clock_wire_usable(&self, net: NetId, wire: WireRef) -> bool {
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

    /// Commits the PIPs of a finished stage and returns the path wires so
    /// the caller can fold them into the next stage's seed set.
    pub(crate) fn commit_stage(
        &mut self,
        design: &mut Design,
        net: NetId,
        found: NodeIdx,
    ) -> Vec<WireRef> {
        let pips = self.arena.pips_to_root(self.device, found);
        let path = self.arena.path_from_root(found);
        self.mark_pips_used(net, &pips);
        design.net_mut(net).pips.extend(pips);
        path
    }
}

/// Returns `true` if the wire is the input pin of a leaf clock buffer site.
///
/// Some devices tie the last distribution hop directly to the buffer's site
/// pin instead of a dedicated leaf wire; the leaf stage accepts either.
pub(crate) fn is_leaf_buffer_input(device: &Device, wire: WireRef) -> bool {
    match device.site_pin_from_wire(wire) {
        Some((site, pin)) => {
            let site_data = device.site(site);
            site_data.kind == SiteKind::BufceLeaf && site_data.pin(pin).is_some()
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_of_bounding_box() {
        let mut regions = BTreeSet::new();
        regions.insert(ClockRegion { col: 0, row: 0 });
        regions.insert(ClockRegion { col: 4, row: 2 });
        regions.insert(ClockRegion { col: 2, row: 1 });
        assert_eq!(
            centroid_region(&regions),
            Some(ClockRegion { col: 2, row: 1 })
        );
    }

    #[test]
    fn centroid_of_single_region() {
        let mut regions = BTreeSet::new();
        regions.insert(ClockRegion { col: 3, row: 1 });
        assert_eq!(
            centroid_region(&regions),
            Some(ClockRegion { col: 3, row: 1 })
        );
    }

    #[test]
    fn centroid_of_empty_set() {
        assert_eq!(centroid_region(&BTreeSet::new()), None);
    }

    #[test]
    fn arch_selection() {
        assert_eq!(
            ClockArch::for_series(Series::UltraScale),
            ClockArch::UltraScale
        );
        assert_eq!(ClockArch::for_series(Series::Versal), ClockArch::Versal);
    }
}
