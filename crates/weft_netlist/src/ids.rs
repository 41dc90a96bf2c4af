//! Opaque ID newtypes for netlist entities.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
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
    /// Opaque, copyable ID for a net in the design.
    NetId
);

define_id!(
    /// Opaque, copyable ID for a physical pin (a net terminal on a site).
    PinId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_roundtrip() {
        let id = NetId::from_raw(5);
        assert_eq!(id.as_raw(), 5);
    }

    #[test]
    fn ids_order_by_raw() {
        assert!(NetId::from_raw(1) < NetId::from_raw(2));
        assert!(PinId::from_raw(0) < PinId::from_raw(9));
    }
}
