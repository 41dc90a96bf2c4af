//! Staged clock routing for UltraScale-class devices.
//!
//! Stage order: buffer output onto a horizontal routing track, vertical
//! routing into the centroid region's distribution layer, vertical
//! distribution out to every sink region, horizontal distribution within
//! each region, leaf buffers, then the sink pins themselves.

use super::{
    centroid_region, is_leaf_buffer_input, region_anchor, sink_regions, stage_error, tile_anchor,
};
use crate::router::{Outcome, Router};
use weft_common::WeftResult;
use weft_device::{IntentCode, WireRef};
use weft_netlist::{Design, NetId};

pub(super) fn route_clock_net(
    router: &mut Router<'_>,
    design: &mut Design,
    net: NetId,
) -> WeftResult<()> {
    let Some(source) = router.source_wire(design, net) else {
        return Err(stage_error(design, net, "source buffer wire"));
    };
    let regions = sink_regions(router.device, design, net);

    // A device without clock regions has no distribution network to climb;
    // the sinks route straight from the buffer.
    if !regions.is_empty() {
        let centroid = centroid_region(&regions)
            .ok_or_else(|| stage_error(design, net, "centroid region"))?;
        let centroid_anchor = region_anchor(router.device, centroid)
            .ok_or_else(|| stage_error(design, net, "centroid region"))?;
        let centroid_target = tile_anchor(centroid_anchor);

        // Onto a horizontal routing track.
        let found = router
            .clock_stage(
                net,
                &[source],
                centroid_target,
                router.config.hroute_watchdog,
                None,
                |d, w, _| d.intent(w) == IntentCode::GlobalHRoute,
            )
            .ok_or_else(|| stage_error(design, net, "horizontal routing track"))?;
        let mut clock_wires = router.commit_stage(design, net, found);

        // Vertical routing into the centroid's distribution layer. The
        // distribution track must be entered from a vertical routing track
        // inside the centroid, arriving from below; a track entered from
        // above or sidelong is not the fan-out root.
        let seeds = clock_wires.clone();
        let found = router
            .clock_stage(
                net,
                &seeds,
                centroid_target,
                router.config.node_budget,
                None,
                move |d, w, parent| {
                    d.intent(w) == IntentCode::GlobalVDistr
                        && d.clock_region(w.tile) == Some(centroid)
                        && parent.is_some_and(|p| {
                            d.intent(p) == IntentCode::GlobalVRoute
                                && d.clock_region(p.tile) == Some(centroid)
                                && d.tile(p.tile).y <= d.tile(w.tile).y
                        })
                },
            )
            .ok_or_else(|| stage_error(design, net, "centroid distribution track"))?;
        clock_wires.extend(router.commit_stage(design, net, found));

        // Vertical distribution to each sink region. A track anywhere in the
        // region's row can feed it through horizontal distribution, so the
        // stage accepts on row rather than exact region. The seed set grows
        // as regions are reached, so later regions branch from whichever
        // committed track is closest.
        for &region in &regions {
            let anchor = region_anchor(router.device, region)
                .ok_or_else(|| stage_error(design, net, "sink region"))?;
            let seeds = wires_with_intent(router, &clock_wires, IntentCode::GlobalVDistr);
            let found = router
                .clock_stage(
                    net,
                    &seeds,
                    tile_anchor(anchor),
                    router.config.node_budget,
                    None,
                    move |d, w, _| {
                        d.intent(w) == IntentCode::GlobalVDistr
                            && d.clock_region(w.tile).is_some_and(|r| r.row == region.row)
                    },
                )
                .ok_or_else(|| stage_error(design, net, "vertical distribution track"))?;
            clock_wires.extend(router.commit_stage(design, net, found));
        }

        // Horizontal distribution within each region.
        for &region in &regions {
            let anchor = region_anchor(router.device, region)
                .ok_or_else(|| stage_error(design, net, "sink region"))?;
            let seeds = wires_with_intent(router, &clock_wires, IntentCode::GlobalVDistr);
            let found = router
                .clock_stage(
                    net,
                    &seeds,
                    tile_anchor(anchor),
                    router.config.node_budget,
                    None,
                    move |d, w, _| {
                        d.intent(w) == IntentCode::GlobalHDistr
                            && d.clock_region(w.tile) == Some(region)
                    },
                )
                .ok_or_else(|| stage_error(design, net, "horizontal distribution track"))?;
            clock_wires.extend(router.commit_stage(design, net, found));
        }

        // Leaf clock buffers. Accept a dedicated leaf wire or a direct hop
        // onto a leaf buffer's input site pin, and only inside the region
        // being served; the search never expands out of it.
        for &region in &regions {
            let anchor = region_anchor(router.device, region)
                .ok_or_else(|| stage_error(design, net, "sink region"))?;
            let seeds = wires_with_intent(router, &clock_wires, IntentCode::GlobalHDistr);
            let found = router
                .clock_stage(
                    net,
                    &seeds,
                    tile_anchor(anchor),
                    router.config.node_budget,
                    Some(region),
                    move |d, w, _| {
                        (d.intent(w) == IntentCode::GlobalLeaf || is_leaf_buffer_input(d, w))
                            && d.clock_region(w.tile) == Some(region)
                    },
                )
                .ok_or_else(|| stage_error(design, net, "leaf clock buffer"))?;
            clock_wires.extend(router.commit_stage(design, net, found));
        }
    }

    // Fan out from the committed network to every sink pin.
    for sink in design.net(net).sinks.clone() {
        if design.pin(sink).routed {
            continue;
        }
        match router.route_connection(design, net, sink, false) {
            Outcome::Routed | Outcome::RoutedDisplacing(_) => {}
            Outcome::Failed => {
                return Err(stage_error(design, net, "path from leaf buffer to sink"));
            }
        }
    }
    Ok(())
}

fn wires_with_intent(
    router: &Router<'_>,
    wires: &[WireRef],
    intent: IntentCode,
) -> Vec<WireRef> {
    wires
        .iter()
        .copied()
        .filter(|&w| router.device.intent(w) == intent)
        .collect()
}
