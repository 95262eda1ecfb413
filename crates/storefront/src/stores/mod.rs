//! Observable client-side state.
//!
//! A store owns a snapshot of one resource plus in-flight flags, publishes
//! every change on a `tokio::sync::watch` channel, and follows an explicit
//! lifecycle:
//!
//! - `mount()` starts a new generation and loads the snapshot once.
//! - `unmount()` starts a new generation and resets the state. Responses
//!   belonging to an older generation are dropped on arrival.
//! - `refresh()` reloads the snapshot on demand.
//!
//! Mutators return the service result unchanged; they never retry.

pub mod auth;
pub mod favoris;
pub mod panier;

use std::sync::atomic::{AtomicU64, Ordering};

pub use auth::{AuthState, AuthStore};
pub use favoris::{FavorisState, FavorisStore};
pub use panier::{PanierState, PanierStore};

/// Generation counter shared by a store and its in-flight requests.
#[derive(Debug, Default)]
pub(crate) struct Lifecycle {
    generation: AtomicU64,
}

/// The generation a request was started in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket(u64);

impl Lifecycle {
    /// Ticket for a request starting now.
    pub(crate) fn ticket(&self) -> Ticket {
        Ticket(self.generation.load(Ordering::Acquire))
    }

    /// Invalidate every outstanding ticket and return a fresh one.
    pub(crate) fn advance(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether a response for `ticket` may still touch the state.
    pub(crate) fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.0
    }
}

/// Requests in flight per operation kind.
///
/// Lives inside the published state, so it is reset together with the
/// snapshot and only touched by updates of the current generation. A flag
/// stays raised until the last request of its kind has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InFlight<const N: usize>([u16; N]);

impl<const N: usize> Default for InFlight<N> {
    fn default() -> Self {
        Self([0; N])
    }
}

impl<const N: usize> InFlight<N> {
    /// Record a started request of `kind`.
    pub(crate) fn begin(&mut self, kind: usize) {
        if let Some(count) = self.0.get_mut(kind) {
            *count = count.saturating_add(1);
        }
    }

    /// Record a finished request of `kind`. Returns whether others of the
    /// same kind are still running.
    pub(crate) fn finish(&mut self, kind: usize) -> bool {
        self.0.get_mut(kind).is_some_and(|count| {
            *count = count.saturating_sub(1);
            *count > 0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_flight_counts_per_kind() {
        let mut in_flight = InFlight::<2>::default();
        in_flight.begin(0);
        in_flight.begin(0);
        in_flight.begin(1);

        assert!(in_flight.finish(0));
        assert!(!in_flight.finish(1));
        assert!(!in_flight.finish(0));
        // Unknown kinds and extra finishes are ignored
        assert!(!in_flight.finish(0));
        assert!(!in_flight.finish(7));
        assert_eq!(in_flight, InFlight::default());
    }

    #[test]
    fn test_advance_invalidates_outstanding_tickets() {
        let lifecycle = Lifecycle::default();
        let before = lifecycle.ticket();
        assert!(lifecycle.is_current(before));

        let after = lifecycle.advance();
        assert!(!lifecycle.is_current(before));
        assert!(lifecycle.is_current(after));
        assert_eq!(lifecycle.ticket(), after);
    }
}
