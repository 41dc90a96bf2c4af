//! Wire intent codes and device series tags.
//!
//! Every wire in the device model carries an [`IntentCode`] describing its
//! routing role. The router never matches on wire names; all classification
//! (long lines, clock-network layers, exclusive sinks) goes through the
//! intent code.

use serde::{Deserialize, Serialize};

/// The hardware generation a device belongs to.
///
/// The clock-network layers differ between generations, so the clock router
/// picks its strategy from this tag once at setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Series {
    /// UltraScale and UltraScale+ fabric.
    UltraScale,
    /// Versal fabric.
    Versal,
}

/// The routing role of a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntentCode {
    /// Ordinary fabric routing with no special role.
    Default,
    /// A wire that feeds a site input pin.
    Pinfeed,
    /// A pin-feed wire that reaches exactly one sink and nothing else.
    /// Exclusive sinks are never usable as intermediates for other sinks.
    ExclusiveSink,
    /// A bounce wire inside a switch box.
    Pinbounce,
    /// A horizontal long line spanning many tiles.
    LongHoriz,
    /// A vertical long line spanning many tiles.
    LongVert,
    /// A wire that can drive onto a long line.
    LongDriver,
    /// Horizontal clock routing track (distribution trunk feeder).
    GlobalHRoute,
    /// Vertical clock routing track.
    GlobalVRoute,
    /// Vertical clock distribution track.
    GlobalVDistr,
    /// Horizontal clock distribution track.
    GlobalHDistr,
    /// Second-level vertical distribution track (Versal).
    GlobalVDistrLvl2,
    /// Region-local horizontal distribution track (Versal).
    GlobalHDistrLocal,
    /// Global clock spine wire (Versal).
    GlobalGclk,
    /// Leaf clock buffer input wire.
    GlobalLeaf,
    /// Global buffer output wire.
    GlobalBufg,
}

impl IntentCode {
    /// Returns `true` for long-line wires in either orientation.
    pub fn is_long(self) -> bool {
        matches!(self, IntentCode::LongHoriz | IntentCode::LongVert)
    }

    /// Returns `true` if this wire belongs to the dedicated clock network.
    pub fn is_clock_network(self) -> bool {
        matches!(
            self,
            IntentCode::GlobalHRoute
                | IntentCode::GlobalVRoute
                | IntentCode::GlobalVDistr
                | IntentCode::GlobalHDistr
                | IntentCode::GlobalVDistrLvl2
                | IntentCode::GlobalHDistrLocal
                | IntentCode::GlobalGclk
                | IntentCode::GlobalLeaf
                | IntentCode::GlobalBufg
        )
    }

    /// Returns `true` for wires the backward static-net walk must not enter.
    ///
    /// Tie-off nets are short and local; clock tracks and long lines would
    /// only carry the walk away from the nearest tie-off source.
    pub fn is_static_pruned(self) -> bool {
        self.is_long() || self.is_clock_network()
    }

    /// Returns `true` if this is a pin-feed wire of either flavor.
    pub fn is_pin_feed(self) -> bool {
        matches!(self, IntentCode::Pinfeed | IntentCode::ExclusiveSink)
    }
}
