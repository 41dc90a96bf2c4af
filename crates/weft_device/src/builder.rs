//! Programmatic construction of device models.
//!
//! Production devices are deserialized from vendor databases; the builder
//! exists so tests and tools can assemble small synthetic grids with exactly
//! the wires, PIPs, and sites a scenario needs.

use crate::device::Device;
use crate::ids::{SiteId, TileId, WireIdx};
use crate::intent::{IntentCode, Series};
use crate::types::{
    ClockRegion, Conn, ConnKind, PinDirection, Pip, Site, SitePin, SiteKind, TieOff, Tile,
    TileKind, Wire, WireRef,
};
use std::collections::HashMap;
use std::fmt::Write;
use weft_common::{ContentHash, Interner};

/// Builds a [`Device`] incrementally.
pub struct DeviceBuilder {
    name: String,
    series: Series,
    tiles: Vec<Tile>,
    sites: Vec<Site>,
    tile_index: HashMap<String, TileId>,
    site_index: HashMap<String, SiteId>,
    interner: Interner,
}

impl DeviceBuilder {
    /// Starts a new device with the given name and hardware generation.
    pub fn new(name: impl Into<String>, series: Series) -> Self {
        Self {
            name: name.into(),
            series,
            tiles: Vec::new(),
            sites: Vec::new(),
            tile_index: HashMap::new(),
            site_index: HashMap::new(),
            interner: Interner::new(),
        }
    }

    /// Adds a tile at grid position `(x, y)`.
    pub fn tile(&mut self, name: &str, kind: TileKind, x: i32, y: i32) -> TileId {
        let id = TileId::from_raw(self.tiles.len() as u32);
        self.tiles.push(Tile {
            name: name.to_string(),
            kind,
            x,
            y,
            clock_region: None,
            wires: Vec::new(),
            pips: Vec::new(),
        });
        self.tile_index.insert(name.to_string(), id);
        id
    }

    /// Assigns a tile to a clock region.
    pub fn clock_region(&mut self, tile: TileId, col: u32, row: u32) {
        self.tiles[tile.as_raw() as usize].clock_region = Some(ClockRegion { col, row });
    }

    /// Adds a wire to a tile and returns its reference.
    pub fn wire(&mut self, tile: TileId, name: &str, intent: IntentCode) -> WireRef {
        let name = self.interner.get_or_intern(name);
        let tile_data = &mut self.tiles[tile.as_raw() as usize];
        let idx = WireIdx::from_raw(tile_data.wires.len() as u32);
        tile_data.wires.push(Wire {
            name,
            intent,
            tie: None,
            conns: Vec::new(),
            back_conns: Vec::new(),
        });
        WireRef::new(tile, idx)
    }

    /// Marks a wire as a hardwired tie-off source.
    pub fn tie(&mut self, wire: WireRef, tie: TieOff) {
        self.wire_mut(wire).tie = Some(tie);
    }

    /// Adds a PIP between two wires of the same tile.
    pub fn pip(&mut self, start: WireRef, end: WireRef) {
        assert_eq!(start.tile, end.tile, "pip endpoints must share a tile");
        self.add_pip(start, end, false);
    }

    /// Adds a route-through PIP between two wires of the same tile.
    ///
    /// The start wire should be a site input pin wire and the end wire the
    /// corresponding output pin wire; the advisor derives its table from
    /// these edges.
    pub fn route_thru(&mut self, start: WireRef, end: WireRef) {
        assert_eq!(start.tile, end.tile, "pip endpoints must share a tile");
        self.add_pip(start, end, true);
    }

    fn add_pip(&mut self, start: WireRef, end: WireRef, is_route_thru: bool) {
        let kind = if is_route_thru {
            ConnKind::RouteThru
        } else {
            ConnKind::Pip
        };
        self.tiles[start.tile.as_raw() as usize].pips.push(Pip {
            tile: start.tile,
            start_wire: start.wire,
            end_wire: end.wire,
            is_route_thru,
            is_reversed: false,
        });
        self.wire_mut(start).conns.push(Conn { dest: end, kind });
        self.wire_mut(end).back_conns.push(Conn { dest: start, kind });
    }

    /// Adds a directed node continuation from one wire to another.
    ///
    /// Both ends belong to the same electrical node; the edge is directed
    /// because the routing graph only ever walks it source-to-sink. Call
    /// twice for wires reachable from either side.
    pub fn node(&mut self, from: WireRef, to: WireRef) {
        self.wire_mut(from).conns.push(Conn {
            dest: to,
            kind: ConnKind::Node,
        });
        self.wire_mut(to).back_conns.push(Conn {
            dest: from,
            kind: ConnKind::Node,
        });
    }

    /// Adds a site anchored in a tile.
    pub fn site(&mut self, name: &str, tile: TileId, kind: SiteKind) -> SiteId {
        let id = SiteId::from_raw(self.sites.len() as u32);
        self.sites.push(Site {
            name: name.to_string(),
            tile,
            kind,
            pins: Vec::new(),
        });
        self.site_index.insert(name.to_string(), id);
        id
    }

    /// Adds a pin to a site.
    pub fn site_pin(
        &mut self,
        site: SiteId,
        name: &str,
        direction: PinDirection,
        wire: Option<WireRef>,
        bel: Option<&str>,
    ) {
        self.sites[site.as_raw() as usize].pins.push(SitePin {
            name: name.to_string(),
            direction,
            wire,
            bel: bel.map(str::to_string),
        });
    }

    fn wire_mut(&mut self, wire: WireRef) -> &mut Wire {
        &mut self.tiles[wire.tile.as_raw() as usize].wires[wire.wire.as_raw() as usize]
    }

    /// Finalizes the device, computing lookup indexes and the content hash.
    pub fn finish(self) -> Device {
        let mut pin_index = HashMap::new();
        for (i, site) in self.sites.iter().enumerate() {
            for pin in &site.pins {
                if let Some(wire) = pin.wire {
                    pin_index.insert(wire, (SiteId::from_raw(i as u32), pin.name.clone()));
                }
            }
        }
        let content_hash = hash_structure(
            &self.name,
            self.series,
            &self.tiles,
            &self.sites,
            &self.interner,
        );
        Device {
            name: self.name,
            series: self.series,
            tiles: self.tiles,
            sites: self.sites,
            tile_index: self.tile_index,
            site_index: self.site_index,
            pin_index,
            interner: self.interner,
            content_hash,
        }
    }
}

/// Hashes the structural content of the device for cache keying.
fn hash_structure(
    name: &str,
    series: Series,
    tiles: &[Tile],
    sites: &[Site],
    interner: &Interner,
) -> ContentHash {
    let mut summary = String::new();
    let _ = write!(summary, "{name};{series:?};");
    for tile in tiles {
        let _ = write!(
            summary,
            "t:{}:{:?}:{}:{};",
            tile.name, tile.kind, tile.x, tile.y
        );
        for wire in &tile.wires {
            let _ = write!(summary, "w:{}:{:?};", interner.resolve(wire.name), wire.intent);
            for conn in &wire.conns {
                let _ = write!(
                    summary,
                    "c:{}:{}:{:?};",
                    conn.dest.tile.as_raw(),
                    conn.dest.wire.as_raw(),
                    conn.kind
                );
            }
        }
    }
    for site in sites {
        let _ = write!(summary, "s:{}:{:?}:{};", site.name, site.kind, site.pins.len());
    }
    ContentHash::from_bytes(summary.as_bytes())
}
