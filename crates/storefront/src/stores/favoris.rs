//! Wishlist store.
//!
//! Unlike the cart, mutations patch the cached list by product id instead
//! of replacing it, since the wishlist endpoints return a single entry.

use std::future::Future;
use std::sync::Arc;

use texpress_core::ProduitId;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::{InFlight, Lifecycle, Ticket};
use crate::api::{ApiError, Session};
use crate::services::{Bascule, FavorisService};
use crate::types::Favori;

/// Observable wishlist state.
///
/// Each request flag stays raised while at least one request of its kind
/// is in flight.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FavorisState {
    pub favoris: Vec<Favori>,
    /// Snapshot fetch in flight.
    pub loading: bool,
    pub toggling: bool,
    pub adding: bool,
    pub removing: bool,
    in_flight: InFlight<4>,
}

impl FavorisState {
    /// Whether `produit_id` is in the cached wishlist.
    #[must_use]
    pub fn est_favori(&self, produit_id: ProduitId) -> bool {
        self.favoris.iter().any(|f| f.produit_id == produit_id)
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.favoris.len()
    }

    /// Whether the cached wishlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.favoris.is_empty()
    }

    fn flag_mut(&mut self, operation: Operation) -> &mut bool {
        match operation {
            Operation::Loading => &mut self.loading,
            Operation::Toggling => &mut self.toggling,
            Operation::Adding => &mut self.adding,
            Operation::Removing => &mut self.removing,
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

    /// Insert or replace the entry for the same product.
    fn upsert(&mut self, favori: Favori) {
        match self
            .favoris
            .iter_mut()
            .find(|f| f.produit_id == favori.produit_id)
        {
            Some(existing) => *existing = favori,
            None => self.favoris.push(favori),
        }
    }

    fn remove(&mut self, produit_id: ProduitId) {
        self.favoris.retain(|f| f.produit_id != produit_id);
    }
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    Loading,
    Toggling,
    Adding,
    Removing,
}

/// Local change to apply once a request succeeds.
enum Patch {
    Replace(Vec<Favori>),
    Upsert(Favori),
    Remove(ProduitId),
}

/// Wishlist store.
#[derive(Clone)]
pub struct FavorisStore {
    inner: Arc<FavorisStoreInner>,
}

struct FavorisStoreInner {
    service: FavorisService,
    session: Session,
    state: watch::Sender<FavorisState>,
    lifecycle: Lifecycle,
}

impl FavorisStore {
    /// Create an unmounted store.
    #[must_use]
    pub fn new(service: FavorisService, session: Session) -> Self {
        let (state, _) = watch::channel(FavorisState::default());
        Self {
            inner: Arc::new(FavorisStoreInner {
                service,
                session,
                state,
                lifecycle: Lifecycle::default(),
            }),
        }
    }

    /// Receive every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FavorisState> {
        self.inner.state.subscribe()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> FavorisState {
        self.inner.state.borrow().clone()
    }

    /// Whether `produit_id` is in the cached wishlist.
    #[must_use]
    pub fn est_favori(&self, produit_id: ProduitId) -> bool {
        self.inner.state.borrow().est_favori(produit_id)
    }

    /// Start a new generation and load the wishlist when signed in.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the state keeps an empty list.
    pub async fn mount(&self) -> Result<(), ApiError> {
        let ticket = self.inner.lifecycle.advance();
        if !self.inner.session.is_authenticated().await {
            debug!("No session, wishlist left empty");
            return Ok(());
        }
        self.load(ticket).await.map(drop)
    }

    /// Drop the cached list and discard in-flight responses.
    pub fn unmount(&self) {
        self.reset();
    }

    /// Empty the local state, e.g. after sign-out. Pending responses are
    /// discarded.
    pub fn reset(&self) {
        self.inner.lifecycle.advance();
        self.inner.state.send_replace(FavorisState::default());
    }

    /// Reload the wishlist from the server.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the cached list is left unchanged.
    pub async fn refresh(&self) -> Result<Vec<Favori>, ApiError> {
        let ticket = self.inner.lifecycle.ticket();
        self.load(ticket).await
    }

    /// Flip a product's membership. Returns the new membership.
    ///
    /// # Errors
    ///
    /// Returns the service error; the cached list is left unchanged.
    pub async fn basculer(&self, produit_id: ProduitId) -> Result<bool, ApiError> {
        let ticket = self.inner.lifecycle.ticket();
        let bascule = self
            .run(
                ticket,
                Operation::Toggling,
                self.inner.service.basculer(produit_id),
                |bascule: &Bascule| match (&bascule.favori, bascule.est_favori) {
                    (_, false) => Some(Patch::Remove(produit_id)),
                    (Some(favori), true) => Some(Patch::Upsert(favori.clone())),
                    (None, true) => None,
                },
            )
            .await?;

        if bascule.est_favori && bascule.favori.is_none() {
            // Without the created entry the list can only be rebuilt
            debug!(produit_id = %produit_id, "Toggle answered without entry, reloading wishlist");
            if let Err(e) = self.load(ticket).await {
                warn!(error = %e, "Wishlist reload after toggle failed");
            }
        }
        Ok(bascule.est_favori)
    }

    /// Add a product.
    ///
    /// # Errors
    ///
    /// Returns the service error; the cached list is left unchanged.
    pub async fn ajouter(&self, produit_id: ProduitId) -> Result<Favori, ApiError> {
        let ticket = self.inner.lifecycle.ticket();
        self.run(
            ticket,
            Operation::Adding,
            self.inner.service.ajouter(produit_id),
            |favori: &Favori| Some(Patch::Upsert(favori.clone())),
        )
        .await
    }

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// Returns the service error; the cached list is left unchanged.
    pub async fn retirer(&self, produit_id: ProduitId) -> Result<Option<String>, ApiError> {
        let ticket = self.inner.lifecycle.ticket();
        self.run(
            ticket,
            Operation::Removing,
            self.inner.service.retirer(produit_id),
            |_: &Option<String>| Some(Patch::Remove(produit_id)),
        )
        .await
    }

    async fn load(&self, ticket: Ticket) -> Result<Vec<Favori>, ApiError> {
        self.run(
            ticket,
            Operation::Loading,
            self.inner.service.liste(),
            |favoris: &Vec<Favori>| Some(Patch::Replace(favoris.clone())),
        )
        .await
    }

    async fn run<T, F>(
        &self,
        ticket: Ticket,
        operation: Operation,
        request: F,
        patch: impl FnOnce(&T) -> Option<Patch>,
    ) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        self.apply(ticket, |state| state.begin(operation));

        let result = request.await;
        let patch = result.as_ref().ok().and_then(patch);

        self.apply(ticket, |state| {
            state.finish(operation);
            match patch {
                Some(Patch::Replace(favoris)) => state.favoris = favoris,
                Some(Patch::Upsert(favori)) => state.upsert(favori),
                Some(Patch::Remove(produit_id)) => state.remove(produit_id),
                None => {}
            }
        });
        result
    }

    fn apply(&self, ticket: Ticket, update: impl FnOnce(&mut FavorisState)) {
        let lifecycle = &self.inner.lifecycle;
        self.inner.state.send_if_modified(|state| {
            if !lifecycle.is_current(ticket) {
                debug!("Discarding stale wishlist response");
                return false;
            }
            update(state);
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use texpress_core::FavoriId;

    use super::*;

    fn favori(id: i64, produit_id: i64) -> Favori {
        Favori {
            id: FavoriId::new(id),
            produit_id: ProduitId::new(produit_id),
            produit: None,
            created_at: None,
        }
    }

    #[test]
    fn test_upsert_replaces_same_product() {
        let mut state = FavorisState::default();
        state.upsert(favori(1, 10));
        state.upsert(favori(2, 20));
        state.upsert(favori(3, 10));

        assert_eq!(state.len(), 2);
        assert_eq!(state.favoris[0].id, FavoriId::new(3));
        assert!(state.est_favori(ProduitId::new(20)));
    }

    #[test]
    fn test_remove_by_product() {
        let mut state = FavorisState {
            favoris: vec![favori(1, 10), favori(2, 20)],
            ..FavorisState::default()
        };
        state.remove(ProduitId::new(10));
        assert!(!state.est_favori(ProduitId::new(10)));
        state.remove(ProduitId::new(99));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_overlapping_toggles_keep_flag_raised() {
        let mut state = FavorisState::default();
        state.begin(Operation::Toggling);
        state.begin(Operation::Toggling);

        state.finish(Operation::Toggling);
        assert!(state.toggling);
        state.finish(Operation::Toggling);
        assert!(!state.toggling);
        assert_eq!(state, FavorisState::default());
    }
}
