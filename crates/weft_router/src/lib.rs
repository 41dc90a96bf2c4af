//! Maze routing for placed FPGA designs.
//!
//! The router consumes a placed [`Design`](weft_netlist::Design) on an
//! immutable [`Device`](weft_device::Device) and commits PIPs net by net,
//! one sink connection at a time. Signal nets run a cost-bounded priority
//! search with long-line shortcuts and bounded rip-up-and-reroute; clock
//! nets go through a dedicated staged pipeline over the clock network;
//! GND/VCC nets are tied off backward from their sinks.
//!
//! The main entry point is [`route_design`].

#![warn(missing_docs)]

pub mod clock;
pub mod config;
mod longline;
pub mod node;
pub mod ripup;
pub mod routethru;
pub mod router;

pub use clock::ClockArch;
pub use config::RouterConfig;
pub use routethru::RouteThruAdvisor;
pub use router::{route_design, FailedConnection, RouteReport};
