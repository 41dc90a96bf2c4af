//! The FPGA device model the router searches over.
//!
//! A [`Device`] is an immutable description of one part: a grid of tiles,
//! each owning wires joined by node continuations and PIPs, plus the sites
//! bound into the grid. The router treats the device as a read-only graph;
//! the unit of identity everywhere is the [`WireRef`] pair of tile and wire
//! index.
//!
//! Synthetic devices for tests are assembled with [`DeviceBuilder`].

#![warn(missing_docs)]

pub mod builder;
pub mod device;
pub mod ids;
pub mod intent;
pub mod types;

pub use builder::DeviceBuilder;
pub use device::Device;
pub use ids::{SiteId, TileId, WireIdx};
pub use intent::{IntentCode, Series};
pub use types::{
    ClockRegion, Conn, ConnKind, PinDirection, Pip, Site, SitePin, SiteKind, TieOff, Tile,
    TileKind, Wire, WireRef,
};
