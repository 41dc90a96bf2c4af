//! Staged clock routing for Versal-class devices.
//!
//! Versal inserts a second-level vertical distribution layer between the
//! routing tracks and the per-region distribution, and the last hop to the
//! leaves rides region-local horizontal tracks and the global clock spine.

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

        // Second-level vertical distribution into the centroid region.
        let seeds = clock_wires.clone();
        let found = router
            .clock_stage(
                net,
                &seeds,
                centroid_target,
                router.config.node_budget,
                None,
                move |d, w, _| {
                    d.intent(w) == IntentCode::GlobalVDistrLvl2
                        && d.clock_region(w.tile) == Some(centroid)
                },
            )
            .ok_or_else(|| stage_error(design, net, "second-level distribution track"))?;
        clock_wires.extend(router.commit_stage(design, net, found));

        // First-level vertical distribution to each sink region. Any track
        // in the region's row can serve it over horizontal distribution.
        for &region in &regions {
            let anchor = region_anchor(router.device, region)
                .ok_or_else(|| stage_error(design, net, "sink region"))?;
            let seeds = wires_with_intents(
                router,
                &clock_wires,
                &[IntentCode::GlobalVDistrLvl2, IntentCode::GlobalVDistr],
            );
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

        // Region-local horizontal distribution.
        for &region in &regions {
            let anchor = region_anchor(router.device, region)
                .ok_or_else(|| stage_error(design, net, "sink region"))?;
            let seeds = wires_with_intents(router, &clock_wires, &[IntentCode::GlobalVDistr]);
            let found = router
                .clock_stage(
                    net,
                    &seeds,
                    tile_anchor(anchor),
                    router.config.node_budget,
                    None,
                    move |d, w, _| {
                        d.intent(w) == IntentCode::GlobalHDistrLocal
                            && d.clock_region(w.tile) == Some(region)
                    },
                )
                .ok_or_else(|| stage_error(design, net, "local distribution track"))?;
            clock_wires.extend(router.commit_stage(design, net, found));
        }

        // Global clock spine or leaf buffer inputs, confined to the region
        // being served.
        for &region in &regions {
            let anchor = region_anchor(router.device, region)
                .ok_or_else(|| stage_error(design, net, "sink region"))?;
            let seeds =
                wires_with_intents(router, &clock_wires, &[IntentCode::GlobalHDistrLocal]);
            let found = router
                .clock_stage(
                    net,
                    &seeds,
                    tile_anchor(anchor),
                    router.config.node_budget,
                    Some(region),
                    move |d, w, _| {
                        (matches!(
                            d.intent(w),
                            IntentCode::GlobalGclk | IntentCode::GlobalLeaf
                        ) || is_leaf_buffer_input(d, w))
                            && d.clock_region(w.tile) == Some(region)
                    },
                )
                .ok_or_else(|| stage_error(design, net, "clock spine"))?;
            clock_wires.extend(router.commit_stage(design, net, found));
        }
    }

    for sink in design.net(net).sinks.clone() {
        if design.pin(sink).routed {
            continue;
        }
        match router.route_connection(design, net, sink, false) {
            Outcome::Routed | Outcome::RoutedDisplacing(_) => {}
            Outcome::Failed => {
                return Err(stage_error(design, net, "path from clock spine to sink"));
            }
        }
    }
    Ok(())
}

fn wires_with_intents(
    router: &Router<'_>,
    wires: &[WireRef],
    intents: &[IntentCode],
) -> Vec<WireRef> {
    wires
        .iter()
        .copied()
        .filter(|&w| intents.contains(&router.device.intent(w)))
        .collect()
}
