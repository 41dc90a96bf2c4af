//! The per-connection maze router.
//!
//! Nets are routed one sink at a time. Each connection runs a priority-queue
//! search over the device graph from the net's source (plus any wires the
//! net already owns) to the sink's switch-box feed wire. The cost of a state
//! is twice its Manhattan distance to the target plus its PIP depth and the
//! congestion history of its wire, so searches stay tight around the
//! straight line while still escaping blockages.

use crate::config::RouterConfig;
use crate::node::{NodeIdx, QueueEntry, SearchArena};
use crate::ripup::{Connection, RipupPass};
use crate::routethru::RouteThruAdvisor;
use std::collections::{BinaryHeap, HashMap, HashSet};
use weft_common::WeftResult;
use weft_device::{
    ConnKind, Device, IntentCode, PinDirection, Pip, TieOff, WireRef,
};
use weft_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use weft_netlist::{Design, NetClass, NetId, PinId};

/// Strong queue preference, used to favor dedicated clock wires.
const CLOCK_WIRE_BONUS: i32 = 1000;

/// A connection that could not be routed.
#[derive(Debug, Clone)]
pub struct FailedConnection {
    /// The net's name.
    pub net: String,
    /// The sink pin, as `SITE/PIN`.
    pub pin: String,
}

/// Summary of a routing run.
#[derive(Debug, Default)]
pub struct RouteReport {
    /// Nets that ended fully routed.
    pub nets_routed: usize,
    /// Individual sink connections routed.
    pub connections_routed: usize,
    /// Individual sink connections that failed.
    pub connections_failed: usize,
    /// Total search states expanded across the run.
    pub nodes_expanded: usize,
    /// Rip-up rounds consumed.
    pub ripup_rounds: usize,
    /// The connections that failed, in routing order.
    pub failed: Vec<FailedConnection>,
}

impl RouteReport {
    /// Returns `true` if every connection routed.
    pub fn is_fully_routed(&self) -> bool {
        self.connections_failed == 0
    }
}

/// How a single connection attempt ended.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// Routed without touching any other net.
    Routed,
    /// Routed by taking wires from the listed nets, which are now unrouted.
    RoutedDisplacing(Vec<NetId>),
    /// No route found.
    Failed,
}

/// What the current search is trying to reach.
struct SearchTarget {
    /// The sink pin's fabric wire.
    sink: WireRef,
    /// The sink's entry wire in its switch box, when the pin wire itself is
    /// outside one.
    feed: Option<WireRef>,
    /// Forward hops from the feed wire to the sink, feed-side first. Each
    /// entry is the wire reached and the kind of edge that reaches it.
    feed_path: Vec<(WireRef, ConnKind)>,
    /// Whether the sink is a clock pin, which widens the cost ceiling and
    /// favors dedicated clock wires.
    clock: bool,
}

impl SearchTarget {
    /// The wire distances are measured against.
    fn cost_target(&self) -> WireRef {
        self.feed.unwrap_or(self.sink)
    }

    fn is_target(&self, wire: WireRef) -> bool {
        wire == self.sink || self.feed == Some(wire)
    }
}

pub(crate) struct Router<'a> {
    pub(crate) device: &'a Device,
    pub(crate) config: &'a RouterConfig,
    pub(crate) diagnostics: &'a DiagnosticSink,
    pub(crate) advisor: RouteThruAdvisor,
    /// Every wire consumed by committed routing.
    pub(crate) used: HashSet<WireRef>,
    /// Which nets consume each used wire.
    pub(crate) owners: HashMap<WireRef, Vec<NetId>>,
    /// Wires held for a specific net before routing starts.
    pub(crate) reserved_by: HashMap<WireRef, NetId>,
    /// Congestion pressure accumulated by rip-up, keyed by wire.
    pub(crate) history: HashMap<WireRef, i32>,
    pub(crate) arena: SearchArena,
    pub(crate) queue: BinaryHeap<QueueEntry>,
    pub(crate) visited: HashSet<WireRef>,
    pub(crate) seq: u64,
    pub(crate) nodes_expanded: usize,
}

impl<'a> Router<'a> {
    pub(crate) fn new(
        device: &'a Device,
        config: &'a RouterConfig,
        diagnostics: &'a DiagnosticSink,
        advisor: RouteThruAdvisor,
    ) -> Self {
        Self {
            device,
            config,
            diagnostics,
            advisor,
            used: HashSet::new(),
            owners: HashMap::new(),
            reserved_by: HashMap::new(),
            history: HashMap::new(),
            arena: SearchArena::new(),
            queue: BinaryHeap::new(),
            visited: HashSet::new(),
            seq: 0,
            nodes_expanded: 0,
        }
    }

    // ---- wire ownership ----------------------------------------------

    pub(crate) fn set_wire_used(&mut self, net: NetId, wire: WireRef) {
        self.used.insert(wire);
        let owners = self.owners.entry(wire).or_default();
        if !owners.contains(&net) {
            owners.push(net);
        }
    }

    fn set_wire_unused(&mut self, net: NetId, wire: WireRef) {
        if let Some(owners) = self.owners.get_mut(&wire) {
            owners.retain(|&n| n != net);
            if owners.is_empty() {
                self.owners.remove(&wire);
                self.used.remove(&wire);
            }
        }
    }

    fn owned_by_other(&self, net: NetId, wire: WireRef) -> bool {
        self.owners
            .get(&wire)
            .is_some_and(|owners| owners.iter().any(|&n| n != net))
    }

    /// A wire is usable when it is not reserved for or owned by another net.
    /// With `allow_overlap`, ownership by another net is tolerated and
    /// resolved by rip-up after the search succeeds.
    fn can_use(&self, net: NetId, wire: WireRef, allow_overlap: bool) -> bool {
        if let Some(&holder) = self.reserved_by.get(&wire) {
            if holder != net {
                return false;
            }
        }
        if self.used.contains(&wire) && self.owned_by_other(net, wire) {
            return allow_overlap;
        }
        true
    }

    /// Marks every wire a list of PIPs consumes, including the off-tile
    /// continuations of each endpoint node.
    pub(crate) fn mark_pips_used(&mut self, net: NetId, pips: &[Pip]) {
        for pip in pips {
            let start = WireRef::new(pip.tile, pip.start_wire);
            let end = WireRef::new(pip.tile, pip.end_wire);
            self.set_wire_used(net, start);
            self.set_wire_used(net, end);
            self.mark_continuations_used(net, end);
            let start_long = self.device.intent(start).is_long();
            let end_long = self.device.intent(end).is_long();
            if start_long && end_long {
                self.mark_continuations_used(net, start);
            }
        }
    }

    fn mark_continuations_used(&mut self, net: NetId, wire: WireRef) {
        let continuations: Vec<WireRef> = self
            .device
            .conns(wire)
            .iter()
            .filter(|c| c.kind == ConnKind::Node && c.dest.tile != wire.tile)
            .map(|c| c.dest)
            .collect();
        for dest in continuations {
            self.set_wire_used(net, dest);
        }
    }

    /// Removes a net's routing and raises the history of every wire it held.
    /// The extra history steers the displaced net's reroute away from the
    /// contested wires.
    pub(crate) fn unroute_net(&mut self, design: &mut Design, net: NetId) {
        let wires: Vec<WireRef> = self
            .owners
            .iter()
            .filter(|(_, owners)| owners.contains(&net))
            .map(|(&wire, _)| wire)
            .collect();
        for wire in wires {
            self.set_wire_unused(net, wire);
            *self.history.entry(wire).or_insert(0) += 1;
        }
        design.unroute(net);
        // The net's sinks are back in play and need their pin wires held
        // again until they reroute.
        for &sink in &design.net(net).sinks.clone() {
            let pin = design.pin(sink);
            if let Some(wire) = self.device.site_pin_wire(pin.site, &pin.name) {
                self.reserved_by.entry(wire).or_insert(net);
            }
        }
    }

    // ---- sink preparation --------------------------------------------

    /// Walks backward from an input pin's wire to the first wire inside a
    /// switch box. Returns the forward hop chain feed-to-sink, or `None`
    /// when the pin wire already sits in a switch box or no feed exists
    /// within the watchdog.
    fn find_input_pin_feed(&self, sink: WireRef) -> Option<(WireRef, Vec<(WireRef, ConnKind)>)> {
        if self.device.is_switch_box(sink.tile) {
            return None;
        }
        let mut visited = HashSet::new();
        visited.insert(sink);
        // Each frontier entry carries the forward chain from itself to the sink.
        let mut frontier: Vec<(WireRef, Vec<(WireRef, ConnKind)>)> = vec![(sink, Vec::new())];
        let mut walked = 0usize;
        while let Some((wire, chain)) = frontier.pop() {
            walked += 1;
            if walked > self.config.pin_feed_watchdog {
                return None;
            }
            for conn in self.device.back_conns(wire) {
                if !visited.insert(conn.dest) {
                    continue;
                }
                let mut next_chain = vec![(wire, conn.kind)];
                next_chain.extend(chain.iter().copied());
                if self.device.is_switch_box(conn.dest.tile) {
                    return Some((conn.dest, next_chain));
                }
                frontier.push((conn.dest, next_chain));
            }
        }
        None
    }

    fn prepare_target(&self, design: &Design, sink_pin: PinId) -> Option<SearchTarget> {
        let pin = design.pin(sink_pin);
        let net = design.net(pin.net);
        let Some(sink) = self.device.site_pin_wire(pin.site, &pin.name) else {
            self.diagnostics.emit(
                Diagnostic::error(
                    DiagnosticCode::new(Category::Routing, 103),
                    "sink pin has no fabric wire",
                )
                .with_net(&net.name)
                .with_pin(self.pin_path(design, sink_pin)),
            );
            return None;
        };
        let (feed, feed_path) = match self.find_input_pin_feed(sink) {
            Some((feed, chain)) => (Some(feed), chain),
            None => (None, Vec::new()),
        };
        let clock = net.class == NetClass::Clock || pin.name.contains("CLK");
        Some(SearchTarget {
            sink,
            feed,
            feed_path,
            clock,
        })
    }

    fn pin_path(&self, design: &Design, pin: PinId) -> String {
        let pin = design.pin(pin);
        format!("{}/{}", self.device.site(pin.site).name, pin.name)
    }

    // ---- search ------------------------------------------------------

    fn reset_search(&mut self) {
        self.arena.clear();
        self.queue.clear();
        self.visited.clear();
    }

    /// Seeds the queue with a root state.
    pub(crate) fn seed(&mut self, wire: WireRef, cost_target: WireRef) -> NodeIdx {
        let idx = self.arena.push(wire, None, None, 0);
        let cost = (self.device.manhattan(wire, cost_target) as i32) << 1;
        self.arena.set_cost(idx, cost);
        self.visited.insert(wire);
        self.enqueue(idx, cost);
        idx
    }

    pub(crate) fn enqueue(&mut self, idx: NodeIdx, cost: i32) {
        let entry = QueueEntry {
            cost,
            seq: self.seq,
            idx,
        };
        self.seq += 1;
        self.queue.push(entry);
    }

    fn wire_cost(&self, wire: WireRef, level: i32, target: &SearchTarget, route_thru: bool) -> i32 {
        let dist = self.device.manhattan(wire, target.cost_target()) as i32;
        let history = self.history.get(&wire).copied().unwrap_or(0);
        let mut cost = (dist << 1) + level + history;
        if route_thru {
            cost += self.config.route_thru_penalty;
        }
        if target.clock && self.device.intent(wire).is_clock_network() {
            cost -= CLOCK_WIRE_BONUS;
        }
        cost
    }

    /// Runs the queue until a target wire pops or the budget runs out.
    fn expand(
        &mut self,
        design: &Design,
        net: NetId,
        target: &SearchTarget,
        allow_overlap: bool,
    ) -> Option<NodeIdx> {
        let ceiling = if target.clock {
            self.config.clock_ceiling_slack
        } else {
            self.config.ceiling_slack
        };
        let mut processed = 0usize;
        while let Some(entry) = self.queue.pop() {
            if processed > self.config.node_budget {
                return None;
            }
            processed += 1;
            self.nodes_expanded += 1;
            let current = self.arena.node(entry.idx);
            let (current_wire, current_level) = (current.wire, current.level);
            if target.is_target(current_wire) {
                return Some(entry.idx);
            }
            let conns: Vec<_> = self.device.conns(current_wire).to_vec();
            for conn in conns {
                let wire = conn.dest;
                if self.visited.contains(&wire) {
                    continue;
                }
                // Exclusive sinks serve exactly one pin; never pass through
                // someone else's.
                if self.device.intent(wire) == IntentCode::ExclusiveSink && !target.is_target(wire)
                {
                    continue;
                }
                if conn.kind == ConnKind::RouteThru {
                    let legal = self
                        .advisor
                        .is_route_thru_node(self.device, current_wire, wire.wire)
                        && self.advisor.is_available(
                            self.device,
                            design,
                            current_wire.tile,
                            current_wire.wire,
                        );
                    if !legal {
                        continue;
                    }
                }
                if !self.can_use(net, wire, allow_overlap) {
                    continue;
                }
                let level = current_level + 1;
                let cost =
                    self.wire_cost(wire, level, target, conn.kind == ConnKind::RouteThru);
                // Admit only states close to the current best; everything
                // beyond the ceiling is never worth expanding.
                let admit = match self.queue.peek() {
                    Some(head) => cost < head.cost + ceiling,
                    None => true,
                };
                if admit {
                    let idx = self.arena.push(wire, Some(entry.idx), Some(conn.kind), level);
                    self.arena.set_cost(idx, cost);
                    self.visited.insert(wire);
                    self.enqueue(idx, cost);
                }
            }
        }
        None
    }

    /// Seed wires a partially routed net offers for its remaining sinks:
    /// the endpoints of its committed PIPs that land in switch boxes,
    /// excluding exclusive sinks already spoken for.
    fn sources_from_pips(&self, design: &Design, net: NetId) -> Vec<WireRef> {
        let net_data = design.net(net);
        let filter_switch_box = net_data.class != NetClass::Clock;
        let mut seen = HashSet::new();
        let mut sources = Vec::new();
        for pip in &net_data.pips {
            for wire in [
                WireRef::new(pip.tile, pip.start_wire),
                WireRef::new(pip.tile, pip.end_wire),
            ] {
                if filter_switch_box && !self.device.is_switch_box(wire.tile) {
                    continue;
                }
                if self.device.intent(wire) == IntentCode::ExclusiveSink {
                    continue;
                }
                if seen.insert(wire) {
                    sources.push(wire);
                }
            }
        }
        sources
    }

    pub(crate) fn source_wire(&self, design: &Design, net: NetId) -> Option<WireRef> {
        let net_data = design.net(net);
        let source = net_data.source?;
        let pin = design.pin(source);
        self.device.site_pin_wire(pin.site, &pin.name)
    }

    /// Routes one sink connection of a net.
    pub(crate) fn route_connection(
        &mut self,
        design: &mut Design,
        net: NetId,
        sink_pin: PinId,
        allow_overlap: bool,
    ) -> Outcome {
        let Some(target) = self.prepare_target(design, sink_pin) else {
            return Outcome::Failed;
        };
        let Some(source) = self.source_wire(design, net) else {
            self.diagnostics.emit(
                Diagnostic::error(
                    DiagnosticCode::new(Category::Routing, 104),
                    "net has no routable source pin",
                )
                .with_net(&design.net(net).name),
            );
            return Outcome::Failed;
        };

        // Long-distance connections first try to ride a long line most of
        // the way; on any failure the plain search below still runs.
        if self.is_long_distance(source, target.cost_target()) {
            self.reset_search();
            if let Some(seed) = self.long_line_seed(net, source, target.cost_target()) {
                let cost = self.arena.node(seed).cost;
                self.enqueue(seed, cost);
                if let Some(found) = self.expand(design, net, &target, allow_overlap) {
                    return self.commit_connection(design, net, sink_pin, &target, found);
                }
            }
        }

        self.reset_search();
        self.seed(source, target.cost_target());
        for wire in self.sources_from_pips(design, net) {
            if !self.visited.contains(&wire) {
                self.seed(wire, target.cost_target());
            }
        }
        match self.expand(design, net, &target, allow_overlap) {
            Some(found) => self.commit_connection(design, net, sink_pin, &target, found),
            None => Outcome::Failed,
        }
    }

    fn is_long_distance(&self, a: WireRef, b: WireRef) -> bool {
        let ta = self.device.tile(a.tile);
        let tb = self.device.tile(b.tile);
        (ta.x - tb.x).abs() > self.config.long_line_threshold
            || (ta.y - tb.y).abs() > self.config.long_line_threshold
    }

    fn commit_connection(
        &mut self,
        design: &mut Design,
        net: NetId,
        sink_pin: PinId,
        target: &SearchTarget,
        found: NodeIdx,
    ) -> Outcome {
        // Wires taken from other nets become rip-up victims.
        let mut displaced: Vec<NetId> = Vec::new();
        for wire in self.arena.path_from_root(found) {
            if let Some(owners) = self.owners.get(&wire) {
                for &owner in owners {
                    if owner != net && !displaced.contains(&owner) {
                        displaced.push(owner);
                    }
                }
            }
        }
        displaced.sort();

        let mut pips = self.arena.pips_to_root(self.device, found);
        pips.extend(self.feed_path_pips(target));
        for &owner in &displaced {
            self.unroute_net(design, owner);
        }
        self.mark_pips_used(net, &pips);
        design.net_mut(net).pips.extend(pips);
        design.pin_mut(sink_pin).routed = true;
        // The sink is owned by the net now; the reservation has done its job.
        if self.reserved_by.get(&target.sink) == Some(&net) {
            self.reserved_by.remove(&target.sink);
        }

        if displaced.is_empty() {
            Outcome::Routed
        } else {
            Outcome::RoutedDisplacing(displaced)
        }
    }

    /// PIPs along the stored feed chain from the switch box to the sink pin.
    fn feed_path_pips(&self, target: &SearchTarget) -> Vec<Pip> {
        let mut pips = Vec::new();
        let mut prev = match target.feed {
            Some(feed) => feed,
            None => return pips,
        };
        for &(wire, kind) in &target.feed_path {
            if matches!(kind, ConnKind::Pip | ConnKind::RouteThru) {
                if let Some(pip) = self.device.find_pip(wire.tile, prev.wire, wire.wire) {
                    pips.push(pip);
                }
            }
            prev = wire;
        }
        pips
    }

    // ---- static nets -------------------------------------------------

    /// Routes a GND or VCC net by walking backward from each sink until a
    /// matching tie-off (or the output of an unplaced site) is found.
    pub(crate) fn route_static_net(&mut self, design: &mut Design, net: NetId) -> usize {
        let needed = match design.net(net).class {
            NetClass::Gnd => TieOff::Gnd,
            NetClass::Vcc => TieOff::Vcc,
            _ => return 0,
        };
        let mut failures = 0usize;
        let sinks = design.net(net).sinks.clone();
        for sink_pin in sinks {
            if design.pin(sink_pin).routed {
                continue;
            }
            if self.route_static_sink(design, net, sink_pin, needed) {
                design.pin_mut(sink_pin).routed = true;
            } else {
                failures += 1;
                let net_name = design.net(net).name.clone();
                self.diagnostics.emit(
                    Diagnostic::error(
                        DiagnosticCode::new(Category::Routing, 110),
                        "no tie-off source reachable for static sink",
                    )
                    .with_net(net_name)
                    .with_pin(self.pin_path(design, sink_pin)),
                );
            }
        }
        failures
    }

    fn route_static_sink(
        &mut self,
        design: &mut Design,
        net: NetId,
        sink_pin: PinId,
        needed: TieOff,
    ) -> bool {
        let pin = design.pin(sink_pin);
        let Some(sink) = self.device.site_pin_wire(pin.site, &pin.name) else {
            return false;
        };
        self.reset_search();
        let root = self.arena.push(sink, None, None, 0);
        self.arena.set_cost(root, 0);
        self.visited.insert(sink);
        self.enqueue(root, 0);

        let mut walked = 0usize;
        while let Some(entry) = self.queue.pop() {
            walked += 1;
            if walked > self.config.static_watchdog {
                return false;
            }
            let wire = self.arena.node(entry.idx).wire;
            if self.is_static_source(design, wire, needed) {
                let pips = self.backward_pips(entry.idx);
                self.mark_pips_used(net, &pips);
                design.net_mut(net).pips.extend(pips);
                return true;
            }
            let level = self.arena.node(entry.idx).level;
            let back: Vec<_> = self.device.back_conns(wire).to_vec();
            for conn in back {
                let prev = conn.dest;
                if self.visited.contains(&prev) {
                    continue;
                }
                // Long lines and clock tracks never lead to a nearby tie-off.
                if self.device.intent(prev).is_static_pruned() {
                    continue;
                }
                if !self.can_use(net, prev, false) {
                    continue;
                }
                let idx = self.arena.push(prev, Some(entry.idx), Some(conn.kind), level + 1);
                self.arena.set_cost(idx, level + 1);
                self.visited.insert(prev);
                self.enqueue(idx, level + 1);
            }
        }
        false
    }

    fn is_static_source(&self, design: &Design, wire: WireRef, needed: TieOff) -> bool {
        if self.device.wire(wire).tie == Some(needed) {
            return true;
        }
        // The output of an unplaced site can be configured as a constant
        // generator.
        if let Some((site, pin)) = self.device.site_pin_from_wire(wire) {
            let site_data = self.device.site(site);
            if let Some(pin_data) = site_data.pin(pin) {
                return pin_data.direction == PinDirection::Output && !design.is_site_used(site);
            }
        }
        false
    }

    /// Converts a backward walk into forward PIPs. Arena parents here sit
    /// closer to the sink, so each PIP hop runs child-to-parent.
    fn backward_pips(&self, found: NodeIdx) -> Vec<Pip> {
        let mut pips = Vec::new();
        let mut current = found;
        while let Some(parent) = self.arena.node(current).parent {
            let node = self.arena.node(current);
            if matches!(node.edge, Some(ConnKind::Pip) | Some(ConnKind::RouteThru)) {
                let parent_wire = self.arena.node(parent).wire;
                if let Some(pip) =
                    self.device
                        .find_pip(parent_wire.tile, node.wire.wire, parent_wire.wire)
                {
                    pips.push(pip);
                }
            }
            current = parent;
        }
        pips
    }

    // ---- LUT input swapping ------------------------------------------

    /// Looks backward `depth` PIP hops from a wire for at least one path
    /// that is not already consumed.
    pub(crate) fn is_routable_backward(&self, wire: WireRef, level: usize, depth: usize) -> bool {
        if self.used.contains(&wire) {
            return false;
        }
        if level == depth {
            return true;
        }
        self.device
            .back_conns(wire)
            .iter()
            .filter(|c| c.kind == ConnKind::Pip)
            .any(|c| self.is_routable_backward(c.dest, level + 1, depth))
    }

    /// Moves a congested LUT input pin to an unused input of the same LUT.
    pub(crate) fn swap_lut_pin_for_unused(&self, design: &mut Design, sink_pin: PinId) -> bool {
        let (site, old_name) = {
            let pin = design.pin(sink_pin);
            (pin.site, pin.name.clone())
        };
        let Some(letter) = lut_input_letter(&old_name) else {
            return false;
        };
        let mut chosen = None;
        {
            let inst = design.site_inst_mut(site);
            for index in 1..=6u32 {
                let candidate = format!("{letter}{index}");
                if candidate == old_name || inst.is_pin_mapped(&candidate) {
                    continue;
                }
                if self.device.site_pin_wire(site, &candidate).is_none() {
                    continue;
                }
                if inst.move_pin_mapping(&old_name, &candidate) {
                    chosen = Some(candidate);
                    break;
                }
            }
        }
        match chosen {
            Some(candidate) => {
                design.pin_mut(sink_pin).name = candidate;
                true
            }
            None => false,
        }
    }

    /// Alternative physical input pins of the sink's LUT that carry no
    /// logical pin yet. Empty when both the 5LUT and 6LUT halves are
    /// occupied; shared inputs make swapping unsafe then.
    pub(crate) fn alternative_lut_inputs(&self, design: &Design, sink_pin: PinId) -> Vec<String> {
        let pin = design.pin(sink_pin);
        let Some(letter) = lut_input_letter(&pin.name) else {
            return Vec::new();
        };
        let Some(inst) = design.site_inst(pin.site) else {
            return Vec::new();
        };
        let (own, other): (String, String) = if inst.is_bel_used(&format!("{letter}6LUT")) {
            (format!("{letter}6LUT"), format!("{letter}5LUT"))
        } else if inst.is_bel_used(&format!("{letter}5LUT")) {
            (format!("{letter}5LUT"), format!("{letter}6LUT"))
        } else {
            return Vec::new();
        };
        if inst.is_bel_used(&other) {
            return Vec::new();
        }
        let size: u32 = if own.contains("6LUT") { 6 } else { 5 };
        let mut alternatives = Vec::new();
        for index in (1..=size).rev() {
            let candidate = format!("{letter}{index}");
            if candidate == pin.name || inst.is_pin_mapped(&candidate) {
                continue;
            }
            if self.device.site_pin_wire(pin.site, &candidate).is_some() {
                alternatives.push(candidate);
            }
        }
        alternatives
    }

    /// Moves the sink pin to a specific alternative input. Returns the old
    /// pin name so a failed reroute can undo the move.
    pub(crate) fn swap_lut_input(
        &self,
        design: &mut Design,
        sink_pin: PinId,
        new_name: &str,
    ) -> String {
        let (site, old_name) = {
            let pin = design.pin(sink_pin);
            (pin.site, pin.name.clone())
        };
        let inst = design.site_inst_mut(site);
        inst.move_pin_mapping(&old_name, new_name);
        design.pin_mut(sink_pin).name = new_name.to_string();
        old_name
    }
}

/// Returns the LUT letter of a swappable input pin name (`A1`..`H6`).
fn lut_input_letter(name: &str) -> Option<char> {
    let mut chars = name.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(letter), Some(index), None)
            if ('A'..='H').contains(&letter) && ('1'..='6').contains(&index) =>
        {
            Some(letter)
        }
        _ => None,
    }
}

// ---- run orchestration ----------------------------------------------

/// Routes every net of the design in place.
///
/// Clock nets go through the dedicated clock-network pipeline first; a
/// clock that cannot be routed is a hard error. Static (GND/VCC) nets are
/// tied off next. Signal nets are then routed connection by connection,
/// with failed connections replayed under bounded rip-up-and-reroute.
/// Per-connection failures are reported through the diagnostic sink and
/// summarized in the returned [`RouteReport`].
pub fn route_design(
    design: &mut Design,
    device: &Device,
    config: &RouterConfig,
    sink: &DiagnosticSink,
) -> WeftResult<RouteReport> {
    let advisor = RouteThruAdvisor::load_or_build(device, config.route_thru_cache.as_deref(), sink);
    let mut router = Router::new(device, config, sink, advisor);
    let mut report = RouteReport::default();

    // Routing already present in the design stays fixed.
    for net in design.net_ids() {
        let pips = design.net(net).pips.clone();
        if !pips.is_empty() {
            router.mark_pips_used(net, &pips);
        }
    }
    reserve_sink_feeds(&mut router, design);

    let clock_arch = crate::clock::ClockArch::for_series(device.series());
    for net in design.net_ids().collect::<Vec<_>>() {
        let sinks = &design.net(net).sinks;
        if !sinks.is_empty() && sinks.iter().all(|&s| design.pin(s).routed) {
            continue;
        }
        match design.net(net).class {
            NetClass::Clock => clock_arch.route(&mut router, design, net)?,
            NetClass::Gnd | NetClass::Vcc => {
                report.connections_failed += router.route_static_net(design, net);
            }
            NetClass::Signal => {}
        }
    }

    route_signal_nets(&mut router, design, &mut report);

    for net in design.net_ids() {
        let sinks = &design.net(net).sinks;
        let routed = sinks.iter().filter(|&&s| design.pin(s).routed).count();
        report.connections_routed += routed;
        if !sinks.is_empty() && routed == sinks.len() {
            report.nets_routed += 1;
        }
    }
    report.nodes_expanded = router.nodes_expanded;
    Ok(report)
}

/// Holds each unrouted sink's pin wire for its own net, so earlier nets
/// cannot wall off a pin that only one net can ever use.
fn reserve_sink_feeds(router: &mut Router<'_>, design: &Design) {
    for net in design.net_ids() {
        for &sink_pin in &design.net(net).sinks {
            let pin = design.pin(sink_pin);
            if pin.routed {
                continue;
            }
            if let Some(wire) = router.device.site_pin_wire(pin.site, &pin.name) {
                router.reserved_by.entry(wire).or_insert(net);
            }
        }
    }
}

fn route_signal_nets(router: &mut Router<'_>, design: &mut Design, report: &mut RouteReport) {
    let mut ripup = RipupPass::new(if router.config.enable_ripup {
        router.config.ripup_rounds
    } else {
        0
    });

    for net in design.net_ids().collect::<Vec<_>>() {
        if design.net(net).class != NetClass::Signal || design.net(net).source.is_none() {
            continue;
        }
        lut_swap_prepass(router, design, net);
        let sinks = design.net(net).sinks.clone();
        for sink_pin in sinks {
            if design.pin(sink_pin).routed {
                continue;
            }
            match route_with_lut_fallback(router, design, net, sink_pin, false) {
                Outcome::Routed | Outcome::RoutedDisplacing(_) => {}
                Outcome::Failed => {
                    if router.config.enable_ripup {
                        ripup.defer(Connection {
                            net,
                            sink: sink_pin,
                        });
                        let net_name = design.net(net).name.clone();
                        router.diagnostics.emit(
                            Diagnostic::warning(
                                DiagnosticCode::new(Category::Warning, 201),
                                "connection deferred to rip-up",
                            )
                            .with_net(net_name)
                            .with_pin(router.pin_path(design, sink_pin)),
                        );
                    } else {
                        record_failure(router, design, report, net, sink_pin);
                    }
                }
            }
        }
    }

    while let Some(round) = ripup.next_round() {
        for conn in round {
            if design.pin(conn.sink).routed {
                continue;
            }
            match route_with_lut_fallback(router, design, conn.net, conn.sink, true) {
                Outcome::Routed => {}
                Outcome::RoutedDisplacing(victims) => {
                    for victim in victims {
                        for &sink in &design.net(victim).sinks.clone() {
                            ripup.defer(Connection { net: victim, sink });
                        }
                    }
                }
                Outcome::Failed => {
                    record_failure(router, design, report, conn.net, conn.sink);
                }
            }
        }
    }
    for conn in ripup.drain_unresolved() {
        record_failure(router, design, report, conn.net, conn.sink);
    }
    report.ripup_rounds = ripup.rounds_used();
}

/// Pre-pass over a net's LUT input sinks: pins whose immediate fan-in is
/// already consumed get moved to an unused input before routing starts.
fn lut_swap_prepass(router: &mut Router<'_>, design: &mut Design, net: NetId) {
    if !router.config.enable_lut_swap {
        return;
    }
    let sinks = design.net(net).sinks.clone();
    for sink_pin in sinks {
        let pin = design.pin(sink_pin);
        if pin.routed || lut_input_letter(&pin.name).is_none() {
            continue;
        }
        let Some(wire) = router.device.site_pin_wire(pin.site, &pin.name) else {
            continue;
        };
        if !router.is_routable_backward(wire, 0, router.config.lut_probe_depth) {
            router.swap_lut_pin_for_unused(design, sink_pin);
        }
    }
}

/// Routes a connection, falling back to LUT input alternatives when the
/// first attempt fails. A failed swap is undone.
fn route_with_lut_fallback(
    router: &mut Router<'_>,
    design: &mut Design,
    net: NetId,
    sink_pin: PinId,
    allow_overlap: bool,
) -> Outcome {
    let outcome = router.route_connection(design, net, sink_pin, allow_overlap);
    if !matches!(outcome, Outcome::Failed) || !router.config.enable_lut_swap {
        return outcome;
    }
    let original = design.pin(sink_pin).name.clone();
    for alternative in router.alternative_lut_inputs(design, sink_pin) {
        router.swap_lut_input(design, sink_pin, &alternative);
        let retry = router.route_connection(design, net, sink_pin, allow_overlap);
        if !matches!(retry, Outcome::Failed) {
            return retry;
        }
    }
    if design.pin(sink_pin).name != original {
        router.swap_lut_input(design, sink_pin, &original);
    }
    Outcome::Failed
}

fn record_failure(
    router: &Router<'_>,
    design: &Design,
    report: &mut RouteReport,
    net: NetId,
    sink_pin: PinId,
) {
    report.connections_failed += 1;
    let pin_path = router.pin_path(design, sink_pin);
    report.failed.push(FailedConnection {
        net: design.net(net).name.clone(),
        pin: pin_path.clone(),
    });
    router.diagnostics.emit(
        Diagnostic::error(
            DiagnosticCode::new(Category::Routing, 101),
            "failed to route connection",
        )
        .with_net(&design.net(net).name)
        .with_pin(pin_path)
        .with_note(format!(
            "search budget is {} nodes per connection",
            router.config.node_budget
        )),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lut_input_names() {
        assert_eq!(lut_input_letter("A1"), Some('A'));
        assert_eq!(lut_input_letter("H6"), Some('H'));
        assert_eq!(lut_input_letter("A7"), None);
        assert_eq!(lut_input_letter("CLK"), None);
        assert_eq!(lut_input_letter("I1"), None);
    }

    #[test]
    fn empty_report_is_fully_routed() {
        assert!(RouteReport::default().is_fully_routed());
    }
}
