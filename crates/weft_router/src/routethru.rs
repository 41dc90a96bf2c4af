//! Route-through bookkeeping.
//!
//! A route-through PIP borrows a site's internal path instead of the switch
//! fabric, so it is only usable while nothing is placed in that site. The
//! advisor holds a per-tile table of route-through wire pairs, packed as
//! `start << 16 | end`, and answers availability queries against the current
//! placement. Building the table walks every PIP in the device, so it is
//! cached on disk keyed by the device's content hash.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use weft_common::ContentHash;
use weft_device::{ConnKind, Device, TileId, WireIdx, WireRef};
use weft_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use weft_netlist::Design;

fn pack(start: WireIdx, end: WireIdx) -> u32 {
    debug_assert!(start.as_raw() < 1 << 16 && end.as_raw() < 1 << 16);
    (start.as_raw() << 16) | end.as_raw()
}

/// The serialized form of the route-through table.
#[derive(Debug, Serialize, Deserialize)]
struct CachedTable {
    device_hash: ContentHash,
    table: HashMap<u32, HashSet<u32>>,
}

/// Answers "is this wire pair a route-through, and may I use it right now?".
#[derive(Debug)]
pub struct RouteThruAdvisor {
    table: HashMap<u32, HashSet<u32>>,
}

impl RouteThruAdvisor {
    /// Builds the table by scanning every PIP in the device.
    pub fn build(device: &Device) -> Self {
        let mut table: HashMap<u32, HashSet<u32>> = HashMap::new();
        for tile_id in device.tile_ids() {
            for pip in &device.tile(tile_id).pips {
                if pip.is_route_thru {
                    table
                        .entry(tile_id.as_raw())
                        .or_default()
                        .insert(pack(pip.start_wire, pip.end_wire));
                }
            }
        }
        Self { table }
    }

    /// Loads the table from a cache file, rebuilding if the file is missing,
    /// unreadable, or was built for a different device.
    ///
    /// Cache problems are reported as warnings, never as failures.
    pub fn load_or_build(device: &Device, cache: Option<&Path>, sink: &DiagnosticSink) -> Self {
        let Some(path) = cache else {
            return Self::build(device);
        };
        if let Some(advisor) = Self::try_load(device, path) {
            return advisor;
        }
        let advisor = Self::build(device);
        if let Err(err) = advisor.store(device, path) {
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::new(Category::Device, 301),
                    format!("could not write route-through cache: {err}"),
                )
                .with_resource(path.display().to_string()),
            );
        }
        advisor
    }

    fn try_load(device: &Device, path: &Path) -> Option<Self> {
        let bytes = std::fs::read(path).ok()?;
        let (cached, _): (CachedTable, usize) =
            bincode::serde::decode_from_slice(&bytes, bincode::config::standard()).ok()?;
        if cached.device_hash != device.content_hash() {
            return None;
        }
        Some(Self {
            table: cached.table,
        })
    }

    fn store(&self, device: &Device, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let cached = CachedTable {
            device_hash: device.content_hash(),
            table: self.table.clone(),
        };
        let bytes = bincode::serde::encode_to_vec(&cached, bincode::config::standard())
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        std::fs::write(path, bytes)
    }

    /// Returns `true` if the wire pair is a route-through of its tile.
    pub fn is_route_thru(&self, tile: TileId, start: WireIdx, end: WireIdx) -> bool {
        self.table
            .get(&tile.as_raw())
            .is_some_and(|set| set.contains(&pack(start, end)))
    }

    /// Node-level variant of [`is_route_thru`](Self::is_route_thru): the
    /// start wire's node may continue into neighboring tiles, and the pair
    /// is registered under whichever tile holds the PIP.
    pub fn is_route_thru_node(&self, device: &Device, start: WireRef, end: WireIdx) -> bool {
        if self.is_route_thru(start.tile, start.wire, end) {
            return true;
        }
        device
            .conns(start)
            .iter()
            .filter(|conn| conn.kind == ConnKind::Node)
            .any(|conn| self.is_route_thru(conn.dest.tile, conn.dest.wire, end))
    }

    /// Returns `true` if the route-through entered at `start` may be used
    /// under the current placement.
    ///
    /// The site whose input pin the start wire feeds must hold no placed
    /// cells; a placed cell means the site's internal path is spoken for.
    pub fn is_available(
        &self,
        device: &Device,
        design: &Design,
        tile: TileId,
        start: WireIdx,
    ) -> bool {
        let start_ref = WireRef::new(tile, start);
        match device.site_pin_from_wire(start_ref) {
            Some((site, _)) => !design.is_site_used(site),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_device::{IntentCode, PinDirection, Series, SiteKind, TileKind};

    fn device_with_route_thru() -> Device {
        DeviceBuilderFixture::new().finish()
    }

    struct DeviceBuilderFixture {
        builder: weft_device::DeviceBuilder,
        pub a_pin: WireRef,
        pub o_pin: WireRef,
        pub site_tile: TileId,
    }

    impl DeviceBuilderFixture {
        fn new() -> Self {
            let mut builder = weft_device::DeviceBuilder::new("rt", Series::UltraScale);
            let t = builder.tile("CLE_X1Y0", TileKind::Logic, 1, 0);
            let a_pin = builder.wire(t, "A1_PIN", IntentCode::Pinfeed);
            let o_pin = builder.wire(t, "O_PIN", IntentCode::Default);
            builder.route_thru(a_pin, o_pin);
            let s = builder.site("SLICE_X0Y0", t, SiteKind::Slice);
            builder.site_pin(s, "A1", PinDirection::Input, Some(a_pin), Some("A6LUT"));
            builder.site_pin(s, "O", PinDirection::Output, Some(o_pin), Some("A6LUT"));
            Self {
                builder,
                a_pin,
                o_pin,
                site_tile: t,
            }
        }

        fn finish(self) -> Device {
            self.builder.finish()
        }
    }

    #[test]
    fn table_contains_registered_pair() {
        let fixture = DeviceBuilderFixture::new();
        let (a, o, t) = (fixture.a_pin, fixture.o_pin, fixture.site_tile);
        let dev = fixture.finish();
        let advisor = RouteThruAdvisor::build(&dev);
        assert!(advisor.is_route_thru(t, a.wire, o.wire));
        assert!(!advisor.is_route_thru(t, o.wire, a.wire));
    }

    #[test]
    fn node_alias_resolves_a_route_thru_pair() {
        let mut fixture = DeviceBuilderFixture::new();
        let t2 = fixture
            .builder
            .tile("INT_X0Y0", TileKind::Interconnect, 0, 0);
        let alias = fixture.builder.wire(t2, "EE1_END0", IntentCode::Default);
        fixture.builder.node(alias, fixture.a_pin);
        let o = fixture.o_pin;
        let dev = fixture.finish();
        let advisor = RouteThruAdvisor::build(&dev);

        // The pair lives in the logic tile, but the alias in the
        // interconnect tile still resolves it at node level.
        assert!(!advisor.is_route_thru(alias.tile, alias.wire, o.wire));
        assert!(advisor.is_route_thru_node(&dev, alias, o.wire));
    }

    #[test]
    fn availability_tracks_placement() {
        let fixture = DeviceBuilderFixture::new();
        let (a, t) = (fixture.a_pin, fixture.site_tile);
        let dev = fixture.finish();
        let advisor = RouteThruAdvisor::build(&dev);

        let mut design = Design::new("t");
        assert!(advisor.is_available(&dev, &design, t, a.wire));

        let site = dev.site_by_name("SLICE_X0Y0").unwrap();
        design
            .site_inst_mut(site)
            .cells
            .insert("A6LUT".to_string(), "u_lut".to_string());
        assert!(!advisor.is_available(&dev, &design, t, a.wire));
    }

    #[test]
    fn cache_roundtrip_and_stale_rejection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routethru.bin");
        let dev = device_with_route_thru();
        let sink = DiagnosticSink::new();

        let built = RouteThruAdvisor::load_or_build(&dev, Some(&path), &sink);
        assert!(path.exists());
        assert!(!sink.has_errors());

        let loaded = RouteThruAdvisor::try_load(&dev, &path).unwrap();
        assert_eq!(loaded.table, built.table);

        // A different device must not accept the cache.
        let mut b = weft_device::DeviceBuilder::new("other", Series::UltraScale);
        b.tile("INT_X0Y0", TileKind::Interconnect, 0, 0);
        let other = b.finish();
        assert!(RouteThruAdvisor::try_load(&other, &path).is_none());
    }

    #[test]
    fn unwritable_cache_is_a_warning_not_a_failure() {
        let dev = device_with_route_thru();
        let sink = DiagnosticSink::new();
        let advisor = RouteThruAdvisor::load_or_build(
            &dev,
            Some(Path::new("/proc/weft-no-such-dir/cache.bin")),
            &sink,
        );
        assert!(!advisor.table.is_empty());
        assert!(!sink.has_errors());
        assert_eq!(sink.diagnostics().len(), 1);
    }
}
