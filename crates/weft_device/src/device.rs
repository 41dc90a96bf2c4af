//! The queryable device model.

use crate::ids::{SiteId, TileId, WireIdx};
use crate::intent::{IntentCode, Series};
use crate::types::{ClockRegion, Conn, Pip, Site, Tile, TileKind, Wire, WireRef};
use std::collections::HashMap;
use weft_common::{ContentHash, Interner};

/// An immutable FPGA device model: the tile grid, the routing graph, and the
/// sites bound to it.
///
/// Built once by [`DeviceBuilder`](crate::builder::DeviceBuilder) and then
/// shared read-only across the whole routing run. All mutable routing state
/// (ownership, visited flags) lives in the router, never here.
#[derive(Debug)]
pub struct Device {
    pub(crate) name: String,
    pub(crate) series: Series,
    pub(crate) tiles: Vec<Tile>,
    pub(crate) sites: Vec<Site>,
    pub(crate) tile_index: HashMap<String, TileId>,
    pub(crate) site_index: HashMap<String, SiteId>,
    /// Reverse map from a fabric wire to the site pin it serves.
    pub(crate) pin_index: HashMap<WireRef, (SiteId, String)>,
    /// Interner holding every wire name in the device.
    pub(crate) interner: Interner,
    pub(crate) content_hash: ContentHash,
}

impl Device {
    /// Returns the device name (e.g., `xcvu3p`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the hardware generation tag.
    pub fn series(&self) -> Series {
        self.series
    }

    /// Returns the hash identifying this device's structure.
    ///
    /// Used to key on-disk caches derived from the device.
    pub fn content_hash(&self) -> ContentHash {
        self.content_hash
    }

    /// Returns the tile with the given ID.
    pub fn tile(&self, id: TileId) -> &Tile {
        &self.tiles[id.as_raw() as usize]
    }

    /// Looks up a tile by name.
    pub fn tile_by_name(&self, name: &str) -> Option<TileId> {
        self.tile_index.get(name).copied()
    }

    /// Iterates over all tile IDs in the device.
    pub fn tile_ids(&self) -> impl Iterator<Item = TileId> + '_ {
        (0..self.tiles.len() as u32).map(TileId::from_raw)
    }

    /// Returns the wire behind a reference.
    pub fn wire(&self, wire: WireRef) -> &Wire {
        self.tile(wire.tile).wire(wire.wire)
    }

    /// Resolves a `TILE/WIRE` path to a wire reference.
    pub fn wire_ref(&self, path: &str) -> Option<WireRef> {
        let (tile_name, wire_name) = path.split_once('/')?;
        let tile_id = self.tile_by_name(tile_name)?;
        let name = self.interner.get(wire_name)?;
        let tile = self.tile(tile_id);
        let idx = tile.wires.iter().position(|w| w.name == name)?;
        Some(WireRef::new(tile_id, WireIdx::from_raw(idx as u32)))
    }

    /// Returns a wire's name.
    pub fn wire_name(&self, wire: WireRef) -> &str {
        self.interner.resolve(self.wire(wire).name)
    }

    /// Formats a wire reference back into its `TILE/WIRE` path.
    pub fn wire_path(&self, wire: WireRef) -> String {
        format!("{}/{}", self.tile(wire.tile).name, self.wire_name(wire))
    }

    /// Returns the intent code of a wire.
    pub fn intent(&self, wire: WireRef) -> IntentCode {
        self.wire(wire).intent
    }

    /// Returns the forward edges leaving a wire.
    pub fn conns(&self, wire: WireRef) -> &[Conn] {
        &self.wire(wire).conns
    }

    /// Returns the backward edges arriving at a wire.
    pub fn back_conns(&self, wire: WireRef) -> &[Conn] {
        &self.wire(wire).back_conns
    }

    /// Finds the PIP joining two wires of one tile, in either direction.
    ///
    /// A hit against the PIP's canonical direction is returned with
    /// `is_reversed` set.
    pub fn find_pip(&self, tile: TileId, start: WireIdx, end: WireIdx) -> Option<Pip> {
        let pips = &self.tile(tile).pips;
        if let Some(pip) = pips
            .iter()
            .find(|p| p.start_wire == start && p.end_wire == end)
        {
            return Some(*pip);
        }
        pips.iter()
            .find(|p| p.start_wire == end && p.end_wire == start)
            .map(|p| Pip {
                is_reversed: true,
                ..*p
            })
    }

    /// Returns `true` if the tile is a switch box.
    pub fn is_switch_box(&self, tile: TileId) -> bool {
        self.tile(tile).kind == TileKind::Interconnect
    }

    /// Manhattan distance in tiles between two wires' tiles.
    pub fn manhattan(&self, a: WireRef, b: WireRef) -> u32 {
        let ta = self.tile(a.tile);
        let tb = self.tile(b.tile);
        ta.x.abs_diff(tb.x) + ta.y.abs_diff(tb.y)
    }

    /// Returns the clock region of a tile, if it belongs to one.
    pub fn clock_region(&self, tile: TileId) -> Option<ClockRegion> {
        self.tile(tile).clock_region
    }

    /// Iterates over the tiles belonging to the given clock region.
    pub fn tiles_in_region(&self, region: ClockRegion) -> impl Iterator<Item = TileId> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(move |(_, t)| t.clock_region == Some(region))
            .map(|(i, _)| TileId::from_raw(i as u32))
    }

    /// Returns the site with the given ID.
    pub fn site(&self, id: SiteId) -> &Site {
        &self.sites[id.as_raw() as usize]
    }

    /// Looks up a site by name.
    pub fn site_by_name(&self, name: &str) -> Option<SiteId> {
        self.site_index.get(name).copied()
    }

    /// Iterates over all site IDs in the device.
    pub fn site_ids(&self) -> impl Iterator<Item = SiteId> + '_ {
        (0..self.sites.len() as u32).map(SiteId::from_raw)
    }

    /// Returns the fabric wire bound to a site pin, if any.
    pub fn site_pin_wire(&self, site: SiteId, pin: &str) -> Option<WireRef> {
        self.site(site).pin(pin).and_then(|p| p.wire)
    }

    /// Returns the site pin a fabric wire serves, if any.
    pub fn site_pin_from_wire(&self, wire: WireRef) -> Option<(SiteId, &str)> {
        self.pin_index
            .get(&wire)
            .map(|(site, pin)| (*site, pin.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DeviceBuilder;
    use crate::types::{ConnKind, PinDirection, SiteKind};

    fn two_tile_device() -> Device {
        let mut b = DeviceBuilder::new("testdev", Series::UltraScale);
        let t0 = b.tile("INT_X0Y0", TileKind::Interconnect, 0, 0);
        let t1 = b.tile("INT_X1Y0", TileKind::Interconnect, 1, 0);
        let a = b.wire(t0, "EE1_BEG0", IntentCode::Default);
        let a_mid = b.wire(t0, "EE1_END0", IntentCode::Default);
        let c = b.wire(t1, "EE1_END0", IntentCode::Default);
        b.pip(a, a_mid);
        b.node(a_mid, c);
        let s = b.site("SLICE_X0Y0", t1, SiteKind::Slice);
        b.site_pin(s, "A1", PinDirection::Input, Some(c), Some("A6LUT"));
        b.finish()
    }

    #[test]
    fn path_roundtrip() {
        let dev = two_tile_device();
        let wire = dev.wire_ref("INT_X1Y0/EE1_END0").unwrap();
        assert_eq!(dev.wire_path(wire), "INT_X1Y0/EE1_END0");
        assert!(dev.wire_ref("INT_X1Y0/NO_SUCH").is_none());
        assert!(dev.wire_ref("no_slash").is_none());
    }

    #[test]
    fn conns_and_back_conns_mirror() {
        let dev = two_tile_device();
        let a = dev.wire_ref("INT_X0Y0/EE1_BEG0").unwrap();
        let a_mid = dev.wire_ref("INT_X0Y0/EE1_END0").unwrap();
        let c = dev.wire_ref("INT_X1Y0/EE1_END0").unwrap();

        let fwd = dev.conns(a);
        assert_eq!(fwd.len(), 1);
        assert_eq!(fwd[0].dest, a_mid);
        assert_eq!(fwd[0].kind, ConnKind::Pip);

        let back = dev.back_conns(c);
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].dest, a_mid);
        assert_eq!(back[0].kind, ConnKind::Node);
    }

    #[test]
    fn find_pip_both_directions() {
        let dev = two_tile_device();
        let a = dev.wire_ref("INT_X0Y0/EE1_BEG0").unwrap();
        let a_mid = dev.wire_ref("INT_X0Y0/EE1_END0").unwrap();
        let forward = dev.find_pip(a.tile, a.wire, a_mid.wire).unwrap();
        assert!(!forward.is_reversed);
        let reversed = dev.find_pip(a.tile, a_mid.wire, a.wire).unwrap();
        assert!(reversed.is_reversed);
        assert_eq!(reversed.start_wire, forward.start_wire);
    }

    #[test]
    fn manhattan_distance() {
        let dev = two_tile_device();
        let a = dev.wire_ref("INT_X0Y0/EE1_BEG0").unwrap();
        let c = dev.wire_ref("INT_X1Y0/EE1_END0").unwrap();
        assert_eq!(dev.manhattan(a, c), 1);
        assert_eq!(dev.manhattan(a, a), 0);
    }

    #[test]
    fn site_pin_indexes() {
        let dev = two_tile_device();
        let c = dev.wire_ref("INT_X1Y0/EE1_END0").unwrap();
        let site = dev.site_by_name("SLICE_X0Y0").unwrap();
        assert_eq!(dev.site_pin_wire(site, "A1"), Some(c));
        let (found_site, pin) = dev.site_pin_from_wire(c).unwrap();
        assert_eq!(found_site, site);
        assert_eq!(pin, "A1");
    }

    #[test]
    fn content_hash_differs_by_structure() {
        let dev_a = two_tile_device();
        let mut b = DeviceBuilder::new("testdev", Series::UltraScale);
        b.tile("INT_X0Y0", TileKind::Interconnect, 0, 0);
        let dev_b = b.finish();
        assert_ne!(dev_a.content_hash(), dev_b.content_hash());
    }
}
