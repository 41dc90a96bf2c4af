//! Configuration types deserialized from `weft.toml`.

use serde::Deserialize;
use std::path::PathBuf;

/// The top-level router configuration parsed from `weft.toml`.
///
/// Every section and field has a default, chosen to match the stock router
/// tuning, so a missing or empty file is always valid.
#[derive(Debug, Default, Deserialize)]
pub struct WeftConfig {
    /// Signal-router search budgets and cost tuning.
    #[serde(default)]
    pub router: RouterSettings,
    /// Clock-network routing settings.
    #[serde(default)]
    pub clock: ClockSettings,
}

/// Search budgets and cost tuning for the signal router.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
    /// Maximum number of nodes a single connection search may expand before
    /// the connection is declared unroutable.
    pub node_budget: usize,
    /// Slack added to the lowest cost seen at the sink tile; queue entries
    /// above `lowest_sink_cost + ceiling_slack` are discarded.
    pub ceiling_slack: u32,
    /// Threshold (in tiles, per axis) above which a connection is considered
    /// long-distance and the long-line shortcut is attempted.
    pub long_line_threshold: i32,
    /// Node budget for each bounded sub-search toward or from a long line.
    pub long_line_probe_budget: usize,
    /// Maximum long-line hops threaded end to end before giving up on the
    /// shortcut and falling back to a plain search.
    pub long_line_watchdog: usize,
    /// Watchdog for the backward walk of a static (GND/VCC) net sink.
    pub static_watchdog: usize,
    /// Watchdog for the backward walk from an input site pin to its
    /// switch-box feed wire.
    pub pin_feed_watchdog: usize,
    /// Maximum rip-up-and-reroute rounds before failing connections are
    /// reported as hard failures.
    pub ripup_rounds: usize,
    /// Whether rip-up-and-reroute is attempted at all.
    pub enable_ripup: bool,
    /// Whether LUT input pins may be swapped to ease congestion.
    pub enable_lut_swap: bool,
    /// Backward probe depth used when testing whether a wire feeds some
    /// swappable LUT input of the target site.
    pub lut_probe_depth: usize,
    /// Extra cost added when an expansion passes through a route-through.
    pub route_thru_penalty: u32,
    /// Optional path for the persisted route-through table cache.
    pub route_thru_cache: Option<PathBuf>,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            node_budget: 100_000,
            ceiling_slack: 20,
            long_line_threshold: 11,
            long_line_probe_budget: 1_000,
            long_line_watchdog: 100,
            static_watchdog: 10_000,
            pin_feed_watchdog: 1_000,
            ripup_rounds: 3,
            enable_ripup: true,
            enable_lut_swap: true,
            lut_probe_depth: 2,
            route_thru_penalty: 4,
            route_thru_cache: None,
        }
    }
}

/// Settings for the dedicated clock-network pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClockSettings {
    /// Slack used in place of `ceiling_slack` when the search target is a
    /// clock sink; clock paths through the distribution network run far
    /// longer than the Manhattan estimate suggests.
    pub ceiling_slack: u32,
    /// Watchdog for the search from the clock buffer onto a horizontal
    /// routing track.
    pub hroute_watchdog: usize,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            ceiling_slack: 2_000,
            hroute_watchdog: 300,
        }
    }
}
