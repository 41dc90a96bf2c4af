//! The placed netlist the router consumes and mutates.
//!
//! A [`Design`] holds nets, their physical pins, and the site instances the
//! placer produced. The router reads pin positions from here, commits PIPs
//! into [`Net::pips`], and — when LUT-input swapping fires — rewrites pin
//! mappings on the affected [`SiteInst`].

#![warn(missing_docs)]

pub mod data;
pub mod ids;

pub use data::{Design, Net, NetClass, Pin, SiteInst};
pub use ids::{NetId, PinId};
