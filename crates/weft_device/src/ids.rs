//! Opaque ID newtypes for device-model entities.
//!
//! Each ID is a thin `u32` wrapper that is `Copy`, `Hash`, and
//! `Serialize`/`Deserialize`. Tiles and sites are indexed device-wide; wires
//! are indexed within their owning tile.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Opaque, copyable ID for a tile in the device grid.
    TileId
);

define_id!(
    /// Opaque, copyable ID for a site (placement location) in the device grid.
    SiteId
);

define_id!(
    /// Opaque, copyable index of a wire within its owning tile.
    WireIdx
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn id_roundtrip() {
        let id = TileId::from_raw(42);
        assert_eq!(id.as_raw(), 42);
    }

    #[test]
    fn id_equality() {
        let a = WireIdx::from_raw(7);
        let b = WireIdx::from_raw(7);
        let c = WireIdx::from_raw(8);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn id_hash_in_set() {
        let mut set = HashSet::new();
        set.insert(SiteId::from_raw(1));
        set.insert(SiteId::from_raw(2));
        set.insert(SiteId::from_raw(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn id_serde_roundtrip() {
        let id = TileId::from_raw(99);
        let json = serde_json::to_string(&id).unwrap();
        let restored: TileId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }
}
