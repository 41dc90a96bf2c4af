//! Runtime router configuration.

use std::path::PathBuf;
use weft_config::WeftConfig;

/// The flattened runtime configuration the router works from.
///
/// Assembled once from a [`WeftConfig`] at the start of a run; the router
/// never re-reads configuration mid-flight.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Maximum node expansions per connection search.
    pub node_budget: usize,
    /// Queue admission slack over the current best entry.
    pub ceiling_slack: i32,
    /// Queue admission slack when the sink is a clock pin.
    pub clock_ceiling_slack: i32,
    /// Per-axis tile distance above which the long-line shortcut fires.
    pub long_line_threshold: i32,
    /// Node budget for each bounded long-line probe.
    pub long_line_probe_budget: usize,
    /// Maximum long-line hops threaded before falling back.
    pub long_line_watchdog: usize,
    /// Watchdog for the backward walk of a static-net sink.
    pub static_watchdog: usize,
    /// Watchdog for the backward walk from a sink pin to its switch box.
    pub pin_feed_watchdog: usize,
    /// Maximum rip-up-and-reroute rounds.
    pub ripup_rounds: usize,
    /// Whether rip-up-and-reroute is attempted.
    pub enable_ripup: bool,
    /// Whether LUT input pins may be swapped.
    pub enable_lut_swap: bool,
    /// Backward probe depth for the LUT-swap routability check.
    pub lut_probe_depth: usize,
    /// Extra cost for expansions through a route-through.
    pub route_thru_penalty: i32,
    /// Optional on-disk location of the route-through table cache.
    pub route_thru_cache: Option<PathBuf>,
    /// Watchdog for the clock buffer to horizontal-track stage.
    pub hroute_watchdog: usize,
}

impl RouterConfig {
    /// Flattens a parsed configuration file into runtime settings.
    pub fn from_settings(config: &WeftConfig) -> Self {
        Self {
            node_budget: config.router.node_budget,
            ceiling_slack: config.router.ceiling_slack as i32,
            clock_ceiling_slack: config.clock.ceiling_slack as i32,
            long_line_threshold: config.router.long_line_threshold,
            long_line_probe_budget: config.router.long_line_probe_budget,
            long_line_watchdog: config.router.long_line_watchdog,
            static_watchdog: config.router.static_watchdog,
            pin_feed_watchdog: config.router.pin_feed_watchdog,
            ripup_rounds: config.router.ripup_rounds,
            enable_ripup: config.router.enable_ripup,
            enable_lut_swap: config.router.enable_lut_swap,
            lut_probe_depth: config.router.lut_probe_depth,
            route_thru_penalty: config.router.route_thru_penalty as i32,
            route_thru_cache: config.router.route_thru_cache.clone(),
            hroute_watchdog: config.clock.hroute_watchdog,
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::from_settings(&WeftConfig::default())
    }
}
