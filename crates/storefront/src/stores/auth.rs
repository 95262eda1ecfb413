//! Auth store: the signed-in client as observable state.
//!
//! The session (token and persisted profile) is owned by [`Session`]; this
//! store mirrors the profile and tracks in-flight auth requests so views
//! and the cart/wishlist watchers can react to sign-in and sign-out.

use std::future::Future;
use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::{InFlight, Lifecycle, Ticket};
use crate::api::Session;
use crate::services::{AuthError, AuthService, ClientService};
use crate::types::{Client, Inscription, MiseAJourProfil};

/// Observable auth state.
///
/// Each request flag stays raised while at least one request of its kind
/// is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub client: Option<Client>,
    /// Restoring the persisted session.
    pub loading: bool,
    pub logging_in: bool,
    pub registering: bool,
    pub logging_out: bool,
    pub updating_profile: bool,
    in_flight: InFlight<5>,
}

impl AuthState {
    /// Whether a client is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.client.is_some()
    }

    fn flag_mut(&mut self, operation: Operation) -> &mut bool {
        match operation {
            Operation::Loading => &mut self.loading,
            Operation::LoggingIn => &mut self.logging_in,
            Operation::Registering => &mut self.registering,
            Operation::LoggingOut => &mut self.logging_out,
            Operation::UpdatingProfile => &mut self.updating_profile,
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
    LoggingIn,
    Registering,
    LoggingOut,
    UpdatingProfile,
}

/// Auth store.
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<AuthStoreInner>,
}

struct AuthStoreInner {
    auth: AuthService,
    clients: ClientService,
    session: Session,
    state: watch::Sender<AuthState>,
    lifecycle: Lifecycle,
}

impl AuthStore {
    /// Create an unmounted store.
    #[must_use]
    pub fn new(auth: AuthService, clients: ClientService, session: Session) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            inner: Arc::new(AuthStoreInner {
                auth,
                clients,
                session,
                state,
                lifecycle: Lifecycle::default(),
            }),
        }
    }

    /// Receive every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// The signed-in client, if any.
    #[must_use]
    pub fn client(&self) -> Option<Client> {
        self.inner.state.borrow().client.clone()
    }

    /// Whether a client is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    /// Start a new generation and restore the persisted session.
    pub async fn mount(&self) -> Option<Client> {
        let ticket = self.inner.lifecycle.advance();
        self.apply(ticket, |state| state.begin(Operation::Loading));

        let client = self.inner.auth.restaurer().await;

        self.apply(ticket, |state| {
            state.finish(Operation::Loading);
            state.client.clone_from(&client);
        });
        client
    }

    /// Forget the mirrored profile and discard in-flight responses. The
    /// persisted session is kept.
    pub fn unmount(&self) {
        self.inner.lifecycle.advance();
        self.inner.state.send_replace(AuthState::default());
    }

    /// Re-read the profile from the in-memory session.
    pub async fn refresh(&self) -> Option<Client> {
        let ticket = self.inner.lifecycle.ticket();
        let client = self.inner.session.client().await;
        self.apply(ticket, |state| state.client.clone_from(&client));
        client
    }

    /// Sign in.
    ///
    /// # Errors
    ///
    /// Returns the service error; the state is left signed out.
    pub async fn connexion(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Client, AuthError> {
        let ticket = self.inner.lifecycle.ticket();
        self.run(
            ticket,
            Operation::LoggingIn,
            self.inner.auth.connexion(email, password),
        )
        .await
    }

    /// Register and sign in.
    ///
    /// # Errors
    ///
    /// Returns the validation or service error.
    pub async fn inscription(&self, form: &Inscription) -> Result<Client, AuthError> {
        let ticket = self.inner.lifecycle.ticket();
        self.run(
            ticket,
            Operation::Registering,
            self.inner.auth.inscription(form),
        )
        .await
    }

    /// Sign out. Always ends signed out, even if the API call fails.
    pub async fn deconnexion(&self) {
        let ticket = self.inner.lifecycle.ticket();
        self.apply(ticket, |state| state.begin(Operation::LoggingOut));

        self.inner.auth.deconnexion().await;

        self.apply(ticket, |state| {
            state.finish(Operation::LoggingOut);
            state.client = None;
        });
    }

    /// Save profile changes and mirror the returned profile.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` without a session, or the
    /// service error.
    pub async fn modifier_profil(&self, update: &MiseAJourProfil) -> Result<Client, AuthError> {
        if !self.inner.session.is_authenticated().await {
            return Err(AuthError::NotAuthenticated);
        }
        let ticket = self.inner.lifecycle.ticket();
        let session = self.inner.session.clone();
        let clients = self.inner.clients.clone();
        self.run(ticket, Operation::UpdatingProfile, async move {
            let client = clients.modifier_profil(update).await?;
            session.update_profile(client.clone()).await;
            Ok(client)
        })
        .await
    }

    /// Re-fetch the profile from the API.
    ///
    /// A 401 means the token was revoked or expired: the session is then
    /// cleared and the state signed out.
    ///
    /// # Errors
    ///
    /// Returns the service error.
    pub async fn rafraichir_profil(&self) -> Result<Client, AuthError> {
        let ticket = self.inner.lifecycle.ticket();
        let result = self
            .run(ticket, Operation::UpdatingProfile, self.inner.auth.profil())
            .await;

        if let Err(e) = &result
            && e.is_unauthorized()
        {
            warn!("Session rejected by the API, signing out locally");
            self.inner.session.clear().await;
            self.apply(ticket, |state| state.client = None);
        }
        result
    }

    async fn run<F>(
        &self,
        ticket: Ticket,
        operation: Operation,
        request: F,
    ) -> Result<Client, AuthError>
    where
        F: Future<Output = Result<Client, AuthError>>,
    {
        self.apply(ticket, |state| state.begin(operation));

        let result = request.await;

        self.apply(ticket, |state| {
            state.finish(operation);
            if let Ok(client) = &result {
                state.client = Some(client.clone());
            }
        });
        result
    }

    fn apply(&self, ticket: Ticket, update: impl FnOnce(&mut AuthState)) {
        let lifecycle = &self.inner.lifecycle;
        self.inner.state.send_if_modified(|state| {
            if !lifecycle.is_current(ticket) {
                debug!("Discarding stale auth response");
                return false;
            }
            update(state);
            true
        });
    }
}
