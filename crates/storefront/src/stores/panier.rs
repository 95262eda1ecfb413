//! Cart store.
//!
//! The cached cart is always the last snapshot the server returned; the
//! store never computes totals or merges lines itself.

use std::future::Future;
use std::sync::Arc;

use texpress_core::{LignePanierId, ProduitId};
use tokio::sync::watch;
use tracing::debug;

use super::{InFlight, Lifecycle, Ticket};
use crate::api::{ApiError, Session};
use crate::services::PanierService;
use crate::types::PanierContenu;

/// Observable cart state.
///
/// Each request flag stays raised while at least one request of its kind
/// is in flight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanierState {
    pub contenu: PanierContenu,
    /// Snapshot fetch in flight.
    pub loading: bool,
    pub adding: bool,
    pub updating: bool,
    pub removing: bool,
    pub clearing: bool,
    in_flight: InFlight<5>,
}

impl PanierState {
    /// Whether any request is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.loading || self.adding || self.updating || self.removing || self.clearing
    }

    const fn flag_mut(&mut self, operation: Operation) -> &mut bool {
        match operation {
            Operation::Loading => &mut self.loading,
            Operation::Adding => &mut self.adding,
            Operation::Updating => &mut self.updating,
            Operation::Removing => &mut self.removing,
            Operation::Clearing => &mut self.clearing,
        }
    }

    fn begin(&mut self, operation: Operation) {
        self.in_flight.begin(operation as usize);
        *self.flag_mut(operation) = true;
    }

    fn finish(&mut self, operation: Operation) {
        let running = self.in_flight.finish(operation as usize);
        *self.flag_mut(operation) = running;
    }
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Loading,
    Adding,
    Updating,
    Removing,
    Clearing,
}

/// Cart store.
#[derive(Clone)]
pub struct PanierStore {
    inner: Arc<PanierStoreInner>,
}

struct PanierStoreInner {
    service: PanierService,
    session: Session,
    state: watch::Sender<PanierState>,
    lifecycle: Lifecycle,
}

impl PanierStore {
    /// Create an unmounted store.
    #[must_use]
    pub fn new(service: PanierService, session: Session) -> Self {
        let (state, _) = watch::channel(PanierState::default());
        Self {
            inner: Arc::new(PanierStoreInner {
                service,
                session,
                state,
                lifecycle: Lifecycle::default(),
            }),
        }
    }

    /// Receive every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PanierState> {
        self.inner.state.subscribe()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> PanierState {
        self.inner.state.borrow().clone()
    }

    /// Current cached cart.
    #[must_use]
    pub fn contenu(&self) -> PanierContenu {
        self.inner.state.borrow().contenu.clone()
    }

    /// Start a new generation and load the cart when signed in.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the state keeps an empty cart.
    pub async fn mount(&self) -> Result<(), ApiError> {
        let ticket = self.inner.lifecycle.advance();
        if !self.inner.session.is_authenticated().await {
            debug!("No session, cart left empty");
            return Ok(());
        }
        self.run(ticket, Operation::Loading, self.inner.service.contenu())
            .await
            .map(drop)
    }

    /// Drop the cached cart and discard in-flight responses.
    pub fn unmount(&self) {
        self.reset();
    }

    /// Empty the local state, e.g. after sign-out. Pending responses are
    /// discarded.
    pub fn reset(&self) {
        self.inner.lifecycle.advance();
        self.inner.state.send_replace(PanierState::default());
    }

    /// Reload the cart from the server.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the cached cart is left unchanged.
    pub async fn refresh(&self) -> Result<PanierContenu, ApiError> {
        let ticket = self.inner.lifecycle.ticket();
        self.run(ticket, Operation::Loading, self.inner.service.contenu())
            .await
    }

    /// Add a product, then cache the returned cart.
    ///
    /// # Errors
    ///
    /// Returns the service error; the cached cart is left unchanged.
    pub async fn ajouter(
        &self,
        produit_id: ProduitId,
        quantite: u32,
    ) -> Result<PanierContenu, ApiError> {
        let ticket = self.inner.lifecycle.ticket();
        self.run(
            ticket,
            Operation::Adding,
            self.inner.service.ajouter(produit_id, quantite),
        )
        .await
    }

    /// Change a line's quantity, then cache the returned cart.
    ///
    /// # Errors
    ///
    /// Returns the service error; the cached cart is left unchanged.
    pub async fn modifier(
        &self,
        ligne_id: LignePanierId,
        quantite: u32,
    ) -> Result<PanierContenu, ApiError> {
        let ticket = self.inner.lifecycle.ticket();
        self.run(
            ticket,
            Operation::Updating,
            self.inner.service.modifier(ligne_id, quantite),
        )
        .await
    }

    /// Remove a line, then cache the returned cart.
    ///
    /// # Errors
    ///
    /// Returns the service error; the cached cart is left unchanged.
    pub async fn supprimer(&self, ligne_id: LignePanierId) -> Result<PanierContenu, ApiError> {
        let ticket = self.inner.lifecycle.ticket();
        self.run(
            ticket,
            Operation::Removing,
            self.inner.service.supprimer(ligne_id),
        )
        .await
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Aggregate` when any line failed to delete. The
    /// cached cart is then left as it was, even though some lines may be
    /// gone server-side; call [`Self::refresh`] to resynchronise.
    pub async fn vider(&self) -> Result<PanierContenu, ApiError> {
        let ticket = self.inner.lifecycle.ticket();
        self.run(ticket, Operation::Clearing, self.inner.service.vider())
            .await
    }

    async fn run<F>(
        &self,
        ticket: Ticket,
        operation: Operation,
        request: F,
    ) -> Result<PanierContenu, ApiError>
    where
        F: Future<Output = Result<PanierContenu, ApiError>>,
    {
        self.apply(ticket, |state| state.begin(operation));

        let result = request.await;

        self.apply(ticket, |state| {
            state.finish(operation);
            if let Ok(contenu) = &result {
                state.contenu = contenu.clone();
            }
        });
        result
    }

    /// Apply `update` unless the store moved to a newer generation.
    fn apply(&self, ticket: Ticket, update: impl FnOnce(&mut PanierState)) {
        let lifecycle = &self.inner.lifecycle;
        self.inner.state.send_if_modified(|state| {
            if !lifecycle.is_current(ticket) {
                debug!("Discarding stale cart response");
                return false;
            }
            update(state);
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_busy_tracks_any_flag() {
        let mut state = PanierState::default();
        assert!(!state.is_busy());
        *state.flag_mut(Operation::Clearing) = true;
        assert!(state.clearing);
        assert!(state.is_busy());
    }

    #[test]
    fn test_concurrent_additions_keep_flag_until_last_finishes() {
        let mut state = PanierState::default();
        state.begin(Operation::Adding);
        state.begin(Operation::Adding);
        state.begin(Operation::Removing);

        state.finish(Operation::Adding);
        assert!(state.adding);
        state.finish(Operation::Removing);
        assert!(!state.removing);
        state.finish(Operation::Adding);
        assert!(!state.is_busy());
    }
}
