//! The placed design the router operates on: nets, pins, and site instances.

use crate::ids::{NetId, PinId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use weft_device::{PinDirection, Pip, SiteId};

/// The electrical class of a net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetClass {
    /// An ordinary signal net routed through the fabric.
    Signal,
    /// A clock net routed through the dedicated clock network.
    Clock,
    /// The global logic-0 net, sourced from tie-offs.
    Gnd,
    /// The global logic-1 net, sourced from tie-offs.
    Vcc,
}

impl NetClass {
    /// Returns `true` for the tie-off-sourced power nets.
    pub fn is_static(self) -> bool {
        matches!(self, NetClass::Gnd | NetClass::Vcc)
    }
}

/// A net connecting one source pin to zero or more sink pins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Net {
    /// The net's hierarchical name.
    pub name: String,
    /// The net's electrical class.
    pub class: NetClass,
    /// The driving pin. Static nets have no source; they terminate at
    /// tie-offs instead.
    pub source: Option<PinId>,
    /// The receiving pins.
    pub sinks: Vec<PinId>,
    /// The PIPs committed for this net so far.
    pub pips: Vec<Pip>,
}

/// A physical pin: a net terminal on a named site pin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pin {
    /// The net this pin belongs to.
    pub net: NetId,
    /// The site the pin sits on.
    pub site: SiteId,
    /// The site pin name (e.g., `A3`, `CLK_B2`).
    pub name: String,
    /// The signal direction at the site boundary.
    pub direction: PinDirection,
    /// Whether routing has reached this pin.
    pub routed: bool,
}

/// A used site: the cells placed on its BELs and the mapping from physical
/// site pins to logical cell pins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteInst {
    /// Cells placed in this site, keyed by BEL name (e.g., `A6LUT`).
    pub cells: HashMap<String, String>,
    /// Mapping from physical site pin name to logical cell pin name.
    pub pin_mappings: HashMap<String, String>,
}

impl SiteInst {
    /// Returns `true` if a cell is placed on the given BEL.
    pub fn is_bel_used(&self, bel: &str) -> bool {
        self.cells.contains_key(bel)
    }

    /// Returns `true` if the site holds no placed cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns `true` if a logical pin is mapped onto the physical pin.
    pub fn is_pin_mapped(&self, phys_pin: &str) -> bool {
        self.pin_mappings.contains_key(phys_pin)
    }

    /// Moves the logical pin mapped at `from` onto the physical pin `to`.
    ///
    /// Returns `false` if `from` has no mapping or `to` is already taken.
    pub fn move_pin_mapping(&mut self, from: &str, to: &str) -> bool {
        if self.pin_mappings.contains_key(to) {
            return false;
        }
        match self.pin_mappings.remove(from) {
            Some(logical) => {
                self.pin_mappings.insert(to.to_string(), logical);
                true
            }
            None => false,
        }
    }
}

/// A placed design: nets, their pins, and the site instances they land on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Design {
    /// The design's name.
    pub name: String,
    nets: Vec<Net>,
    pins: Vec<Pin>,
    site_insts: HashMap<SiteId, SiteInst>,
}

impl Design {
    /// Creates an empty design.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Adds a net and returns its ID.
    pub fn add_net(&mut self, name: impl Into<String>, class: NetClass) -> NetId {
        let id = NetId::from_raw(self.nets.len() as u32);
        self.nets.push(Net {
            name: name.into(),
            class,
            source: None,
            sinks: Vec::new(),
            pips: Vec::new(),
        });
        id
    }

    /// Adds a pin to a net.
    ///
    /// Output pins become the net's source; input pins become sinks.
    pub fn add_pin(
        &mut self,
        net: NetId,
        site: SiteId,
        name: impl Into<String>,
        direction: PinDirection,
    ) -> PinId {
        let id = PinId::from_raw(self.pins.len() as u32);
        self.pins.push(Pin {
            net,
            site,
            name: name.into(),
            direction,
            routed: false,
        });
        let net_data = &mut self.nets[net.as_raw() as usize];
        match direction {
            PinDirection::Output => net_data.source = Some(id),
            PinDirection::Input => net_data.sinks.push(id),
        }
        id
    }

    /// Returns the net with the given ID.
    pub fn net(&self, id: NetId) -> &Net {
        &self.nets[id.as_raw() as usize]
    }

    /// Returns the net mutably.
    pub fn net_mut(&mut self, id: NetId) -> &mut Net {
        &mut self.nets[id.as_raw() as usize]
    }

    /// Returns the pin with the given ID.
    pub fn pin(&self, id: PinId) -> &Pin {
        &self.pins[id.as_raw() as usize]
    }

    /// Returns the pin mutably.
    pub fn pin_mut(&mut self, id: PinId) -> &mut Pin {
        &mut self.pins[id.as_raw() as usize]
    }

    /// Iterates over all net IDs in the design.
    pub fn net_ids(&self) -> impl Iterator<Item = NetId> + '_ {
        (0..self.nets.len() as u32).map(NetId::from_raw)
    }

    /// Returns the site instance occupying a site, if any.
    pub fn site_inst(&self, site: SiteId) -> Option<&SiteInst> {
        self.site_insts.get(&site)
    }

    /// Returns the site instance for a site, creating an empty one if needed.
    pub fn site_inst_mut(&mut self, site: SiteId) -> &mut SiteInst {
        self.site_insts.entry(site).or_default()
    }

    /// Returns `true` if the site holds placed cells.
    pub fn is_site_used(&self, site: SiteId) -> bool {
        self.site_insts.get(&site).is_some_and(|s| !s.is_empty())
    }

    /// Removes all committed PIPs from a net and marks its sinks unrouted.
    pub fn unroute(&mut self, net: NetId) {
        let sinks = {
            let net_data = &mut self.nets[net.as_raw() as usize];
            net_data.pips.clear();
            net_data.sinks.clone()
        };
        for sink in sinks {
            self.pins[sink.as_raw() as usize].routed = false;
        }
    }

    /// Returns `true` if every sink of the net has been reached.
    pub fn is_fully_routed(&self, net: NetId) -> bool {
        self.net(net)
            .sinks
            .iter()
            .all(|&sink| self.pin(sink).routed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_device::{TileId, WireIdx};

    fn test_pip() -> Pip {
        Pip {
            tile: TileId::from_raw(0),
            start_wire: WireIdx::from_raw(0),
            end_wire: WireIdx::from_raw(1),
            is_route_thru: false,
            is_reversed: false,
        }
    }

    #[test]
    fn source_and_sinks_by_direction() {
        let mut design = Design::new("t");
        let net = design.add_net("data", NetClass::Signal);
        let src = design.add_pin(net, SiteId::from_raw(0), "O", PinDirection::Output);
        let snk = design.add_pin(net, SiteId::from_raw(1), "A1", PinDirection::Input);
        assert_eq!(design.net(net).source, Some(src));
        assert_eq!(design.net(net).sinks, vec![snk]);
    }

    #[test]
    fn unroute_clears_pips_and_sinks() {
        let mut design = Design::new("t");
        let net = design.add_net("data", NetClass::Signal);
        let snk = design.add_pin(net, SiteId::from_raw(1), "A1", PinDirection::Input);
        design.net_mut(net).pips.push(test_pip());
        design.pin_mut(snk).routed = true;
        assert!(design.is_fully_routed(net));

        design.unroute(net);
        assert!(design.net(net).pips.is_empty());
        assert!(!design.pin(snk).routed);
        assert!(!design.is_fully_routed(net));
    }

    #[test]
    fn static_net_classes() {
        assert!(NetClass::Gnd.is_static());
        assert!(NetClass::Vcc.is_static());
        assert!(!NetClass::Signal.is_static());
        assert!(!NetClass::Clock.is_static());
    }

    #[test]
    fn site_usage() {
        let mut design = Design::new("t");
        let site = SiteId::from_raw(3);
        assert!(!design.is_site_used(site));
        design
            .site_inst_mut(site)
            .cells
            .insert("A6LUT".to_string(), "u_lut".to_string());
        assert!(design.is_site_used(site));
        assert!(design.site_inst(site).unwrap().is_bel_used("A6LUT"));
        assert!(!design.site_inst(site).unwrap().is_bel_used("B6LUT"));
    }

    #[test]
    fn pin_mapping_moves() {
        let mut inst = SiteInst::default();
        inst.pin_mappings
            .insert("A3".to_string(), "I2".to_string());
        assert!(inst.is_pin_mapped("A3"));

        assert!(inst.move_pin_mapping("A3", "A1"));
        assert!(!inst.is_pin_mapped("A3"));
        assert_eq!(inst.pin_mappings["A1"], "I2");

        // No mapping at A3 anymore.
        assert!(!inst.move_pin_mapping("A3", "A2"));

        // Destination occupied.
        inst.pin_mappings
            .insert("A2".to_string(), "I0".to_string());
        assert!(!inst.move_pin_mapping("A1", "A2"));
    }
}
