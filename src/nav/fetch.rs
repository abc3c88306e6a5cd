//! Latest-navigation-wins guard for async loads
//!
//! Loads started by two quick navigations can resolve in either order. Each
//! load takes a [`Ticket`] keyed by its target; only a ticket for the most
//! recently requested target may be applied.

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    target: String,
}

impl Ticket {
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Default)]
pub struct LatestFetch {
    next_seq: u64,
    latest: Option<Ticket>,
}

impl LatestFetch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new load, superseding any earlier one
    pub fn begin(&mut self, target: impl Into<String>) -> Ticket {
        self.next_seq += 1;
        let ticket = Ticket {
            seq: self.next_seq,
            target: target.into(),
        };
        self.latest = Some(ticket.clone());
        ticket
    }

    /// Whether a result for `ticket` may still be applied.
    ///
    /// A result for the latest target is accepted even from an older ticket;
    /// the data is for the same target either way.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.latest
            .as_ref()
            .is_some_and(|latest| latest.target == ticket.target)
    }

    /// Check a completed load, logging when it is dropped
    pub fn accept(&self, ticket: &Ticket) -> bool {
        let current = self.is_current(ticket);
        if !current {
            debug!(
                target_id = %ticket.target,
                seq = ticket.seq,
                "Discarding stale load"
            );
        }
        current
    }

    /// Forget the outstanding load (navigated to a page with no data)
    pub fn clear(&mut self) {
        self.latest = None;
    }

    pub fn pending_target(&self) -> Option<&str> {
        self.latest.as_ref().map(|t| t.target.as_str())
    }
}
