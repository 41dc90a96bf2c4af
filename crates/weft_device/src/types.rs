//! Structural types of the device model: tiles, wires, connections, PIPs,
//! sites, and clock regions.

use crate::ids::{SiteId, TileId, WireIdx};
use crate::intent::IntentCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use weft_common::Ident;

/// A routing resource identified by its tile and wire index.
///
/// This pair is the unit of identity for the entire router: ownership,
/// reservation, and visited-state all key on it. Two searches reaching the
/// same `(tile, wire)` pair have reached the same physical metal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireRef {
    /// The tile owning the wire.
    pub tile: TileId,
    /// The wire's index within the tile.
    pub wire: WireIdx,
}

impl WireRef {
    /// Creates a wire reference from its parts.
    pub fn new(tile: TileId, wire: WireIdx) -> Self {
        Self { tile, wire }
    }
}

/// The functional type of a tile in the device grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// A switch-box tile where fabric routing choices are made.
    Interconnect,
    /// A tile containing configurable logic sites.
    Logic,
    /// A clock distribution tile.
    Clock,
    /// An I/O or configuration tile.
    Io,
    /// An empty tile with no programmable resources.
    Empty,
}

/// How power nets may terminate at a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TieOff {
    /// The wire is a hardwired logic-0 source.
    Gnd,
    /// The wire is a hardwired logic-1 source.
    Vcc,
}

/// The kind of a forward or backward connection between two wires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConnKind {
    /// Passive continuation of the same electrical node into another tile.
    /// Traversal costs nothing and commits no configuration.
    Node,
    /// A programmable interconnect point that must be committed when used.
    Pip,
    /// A PIP that passes through a site instead of the switch fabric.
    /// Usable only when the site has no conflicting placement.
    RouteThru,
}

/// A single traversable edge in the routing graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conn {
    /// The wire reached by taking this edge.
    pub dest: WireRef,
    /// Whether the edge is a node continuation, a PIP, or a route-through.
    pub kind: ConnKind,
}

/// A programmable interconnect point within a tile.
///
/// Both endpoint wires belong to the PIP's tile; inter-tile reach comes from
/// node continuations on either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pip {
    /// The tile the PIP lives in.
    pub tile: TileId,
    /// The driven-from wire.
    pub start_wire: WireIdx,
    /// The driven-to wire.
    pub end_wire: WireIdx,
    /// `true` if the PIP passes through a site rather than the switch fabric.
    pub is_route_thru: bool,
    /// `true` if a bidirectional PIP is used against its canonical direction.
    pub is_reversed: bool,
}

impl fmt::Display for Pip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pip t{} w{}->w{}",
            self.tile.as_raw(),
            self.start_wire.as_raw(),
            self.end_wire.as_raw()
        )
    }
}

/// A wire within a tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wire {
    /// The wire's interned name, unique within its tile. Wire names repeat
    /// across thousands of tiles, so they are interned once per device.
    pub name: Ident,
    /// The wire's routing role.
    pub intent: IntentCode,
    /// An optional hardwired tie-off at this wire.
    pub tie: Option<TieOff>,
    /// Forward edges leaving this wire.
    pub conns: Vec<Conn>,
    /// Backward edges arriving at this wire.
    pub back_conns: Vec<Conn>,
}

/// A clock region position in the device's region grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClockRegion {
    /// Region column (0-based, left to right).
    pub col: u32,
    /// Region row (0-based, bottom to top).
    pub row: u32,
}

/// A single tile in the device grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    /// The tile's name (e.g., `INT_X4Y7`).
    pub name: String,
    /// The functional type of this tile.
    pub kind: TileKind,
    /// Column index in the device grid.
    pub x: i32,
    /// Row index in the device grid.
    pub y: i32,
    /// The clock region this tile belongs to, if any.
    pub clock_region: Option<ClockRegion>,
    /// Wires owned by this tile, indexed by [`WireIdx`](crate::ids::WireIdx).
    pub wires: Vec<Wire>,
    /// PIPs whose endpoints are wires of this tile.
    pub pips: Vec<Pip>,
}

impl Tile {
    /// Returns the wire at the given index.
    pub fn wire(&self, idx: WireIdx) -> &Wire {
        &self.wires[idx.as_raw() as usize]
    }
}

/// The functional type of a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiteKind {
    /// A logic slice containing LUTs and flip-flops.
    Slice,
    /// A leaf clock buffer site feeding local fabric rows.
    BufceLeaf,
    /// A global clock buffer site.
    BufgCtrl,
    /// A block RAM site.
    Bram,
    /// A DSP site.
    Dsp,
    /// An I/O pad site.
    IoPad,
}

/// The signal direction of a site pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinDirection {
    /// Signal flows into the site.
    Input,
    /// Signal flows out of the site.
    Output,
}

/// A pin on the boundary of a site, tied to a fabric wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitePin {
    /// The pin's name, unique within its site (e.g., `A1`, `CLK_OUT`).
    pub name: String,
    /// The signal direction.
    pub direction: PinDirection,
    /// The fabric wire this pin connects to, if routed fabric reaches it.
    pub wire: Option<WireRef>,
    /// The BEL this pin feeds or is driven by, if any (e.g., `A6LUT`).
    pub bel: Option<String>,
}

/// A site (placement location) bound to a tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    /// The site's name (e.g., `SLICE_X4Y7`).
    pub name: String,
    /// The tile the site is anchored in.
    pub tile: TileId,
    /// The functional type of this site.
    pub kind: SiteKind,
    /// The site's boundary pins.
    pub pins: Vec<SitePin>,
}

impl Site {
    /// Looks up a pin by name.
    pub fn pin(&self, name: &str) -> Option<&SitePin> {
        self.pins.iter().find(|p| p.name == name)
    }
}
