//! Bounded rip-up-and-reroute state.
//!
//! Connections that fail a clean route are deferred here. Each round replays
//! the deferred connections with overlap allowed; nets displaced by a winner
//! are queued into the following round. The round count is capped, so a
//! pathological displacement cycle degrades into reported failures instead
//! of livelock.

use weft_netlist::{NetId, PinId};

/// One sink connection of a net.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    /// The net being routed.
    pub net: NetId,
    /// The sink pin of this connection.
    pub sink: PinId,
}

/// Tracks deferred connections across rip-up rounds.
#[derive(Debug)]
pub struct RipupPass {
    max_rounds: usize,
    rounds_used: usize,
    pending: Vec<Connection>,
}

impl RipupPass {
    /// Creates a pass allowing at most `max_rounds` replay rounds.
    pub fn new(max_rounds: usize) -> Self {
        Self {
            max_rounds,
            rounds_used: 0,
            pending: Vec::new(),
        }
    }

    /// Defers a connection into the next round. Deferring the same
    /// connection twice in one round is a no-op.
    pub fn defer(&mut self, conn: Connection) {
        if !self.pending.contains(&conn) {
            self.pending.push(conn);
        }
    }

    /// Takes the next round of deferred connections.
    ///
    /// Returns `None` when nothing is pending or the round cap is reached;
    /// in the latter case the leftovers stay pending for
    /// [`drain_unresolved`](Self::drain_unresolved).
    pub fn next_round(&mut self) -> Option<Vec<Connection>> {
        if self.pending.is_empty() || self.rounds_used >= self.max_rounds {
            return None;
        }
        self.rounds_used += 1;
        Some(std::mem::take(&mut self.pending))
    }

    /// Returns the connections left unresolved after the final round.
    pub fn drain_unresolved(&mut self) -> Vec<Connection> {
        std::mem::take(&mut self.pending)
    }

    /// Returns how many rounds have been taken.
    pub fn rounds_used(&self) -> usize {
        self.rounds_used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(net: u32, sink: u32) -> Connection {
        Connection {
            net: NetId::from_raw(net),
            sink: PinId::from_raw(sink),
        }
    }

    #[test]
    fn empty_pass_has_no_rounds() {
        let mut pass = RipupPass::new(3);
        assert!(pass.next_round().is_none());
        assert_eq!(pass.rounds_used(), 0);
    }

    #[test]
    fn rounds_consume_pending() {
        let mut pass = RipupPass::new(3);
        pass.defer(conn(0, 0));
        pass.defer(conn(1, 1));
        let round = pass.next_round().unwrap();
        assert_eq!(round.len(), 2);
        assert!(pass.next_round().is_none());
    }

    #[test]
    fn duplicate_defer_is_ignored() {
        let mut pass = RipupPass::new(3);
        pass.defer(conn(0, 0));
        pass.defer(conn(0, 0));
        pass.defer(conn(0, 1));
        assert_eq!(pass.next_round().unwrap().len(), 2);
    }

    #[test]
    fn round_cap_stops_replay() {
        let mut pass = RipupPass::new(2);
        pass.defer(conn(0, 0));
        assert!(pass.next_round().is_some());
        pass.defer(conn(1, 1));
        assert!(pass.next_round().is_some());
        // Displaced again after the last allowed round.
        pass.defer(conn(0, 0));
        assert!(pass.next_round().is_none());
        assert_eq!(pass.rounds_used(), 2);
        assert_eq!(pass.drain_unresolved(), vec![conn(0, 0)]);
    }
}
