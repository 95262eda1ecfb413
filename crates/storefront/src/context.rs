//! Composition root.
//!
//! [`AppContext`] wires the session, the API client, the services and the
//! state stores together. Stores are opt-in: a front end provides only the
//! ones it renders, and reaching for a store that was never provided is a
//! wiring bug that panics immediately.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::adapters::ImageResolver;
use crate::api::{ApiClient, ApiError, FileStorage, Session};
use crate::config::Config;
use crate::services::Services;
use crate::stores::{AuthStore, FavorisStore, PanierStore};

/// A named slot for a store that may or may not be provided.
#[derive(Debug)]
pub struct Provider<T> {
    name: &'static str,
    value: Option<T>,
}

impl<T> Provider<T> {
    /// An empty slot.
    #[must_use]
    pub const fn empty(name: &'static str) -> Self {
        Self { name, value: None }
    }

    /// Fill the slot, replacing any previous value.
    pub fn provide(&mut self, value: T) {
        self.value = Some(value);
    }

    /// The provided value.
    ///
    /// # Panics
    ///
    /// Panics if nothing was provided.
    #[must_use]
    pub fn get(&self) -> &T {
        match &self.value {
            Some(value) => value,
            None => panic!("`{}` must be used within its provider", self.name),
        }
    }

    /// The provided value, if any.
    #[must_use]
    pub const fn try_get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Whether a value was provided.
    #[must_use]
    pub const fn is_provided(&self) -> bool {
        self.value.is_some()
    }
}

/// Application context.
pub struct AppContext {
    config: Config,
    session: Session,
    api: ApiClient,
    services: Services,
    images: ImageResolver,
    auth: Provider<AuthStore>,
    panier: Provider<PanierStore>,
    favoris: Provider<FavorisStore>,
    watcher: Mutex<Option<JoinHandle<()>>>,
}

impl AppContext {
    /// Build a context on top of an existing session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built.
    pub fn new(config: Config, session: Session) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api, session.clone())?;
        let services = Services::new(&api, &config);
        let images = ImageResolver::new(&config.storage);

        Ok(Self {
            config,
            session,
            api,
            services,
            images,
            auth: Provider::empty("auth"),
            panier: Provider::empty("panier"),
            favoris: Provider::empty("favoris"),
            watcher: Mutex::new(None),
        })
    }

    /// Build a context whose session lives in memory only.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn in_memory(config: Config) -> Result<Self, ApiError> {
        Self::new(config, Session::in_memory())
    }

    /// Build a context whose session is persisted to `config.session_file`.
    ///
    /// # Errors
    ///
    /// See [`Self::new`].
    pub fn with_session_file(config: Config) -> Result<Self, ApiError> {
        let storage = Arc::new(FileStorage::new(config.session_file.clone()));
        Self::new(config, Session::new(storage))
    }

    /// Provide the auth store.
    #[must_use]
    pub fn with_auth(mut self) -> Self {
        let store = AuthStore::new(
            self.services.auth.clone(),
            self.services.client.clone(),
            self.session.clone(),
        );
        self.auth.provide(store);
        self
    }

    /// Provide the cart store.
    #[must_use]
    pub fn with_panier(mut self) -> Self {
        let store = PanierStore::new(self.services.panier.clone(), self.session.clone());
        self.panier.provide(store);
        self
    }

    /// Provide the wishlist store.
    #[must_use]
    pub fn with_favoris(mut self) -> Self {
        let store = FavorisStore::new(self.services.favoris.clone(), self.session.clone());
        self.favoris.provide(store);
        self
    }

    /// Provide every store.
    #[must_use]
    pub fn with_all_stores(self) -> Self {
        self.with_auth().with_panier().with_favoris()
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub const fn services(&self) -> &Services {
        &self.services
    }

    /// Resolver for product and banner images.
    #[must_use]
    pub const fn images(&self) -> &ImageResolver {
        &self.images
    }

    /// The auth store.
    ///
    /// # Panics
    ///
    /// Panics if [`Self::with_auth`] was not called.
    #[must_use]
    pub fn auth(&self) -> &AuthStore {
        self.auth.get()
    }

    /// The cart store.
    ///
    /// # Panics
    ///
    /// Panics if [`Self::with_panier`] was not called.
    #[must_use]
    pub fn panier(&self) -> &PanierStore {
        self.panier.get()
    }

    /// The wishlist store.
    ///
    /// # Panics
    ///
    /// Panics if [`Self::with_favoris`] was not called.
    #[must_use]
    pub fn favoris(&self) -> &FavorisStore {
        self.favoris.get()
    }

    #[must_use]
    pub const fn try_auth(&self) -> Option<&AuthStore> {
        self.auth.try_get()
    }

    #[must_use]
    pub const fn try_panier(&self) -> Option<&PanierStore> {
        self.panier.try_get()
    }

    #[must_use]
    pub const fn try_favoris(&self) -> Option<&FavorisStore> {
        self.favoris.try_get()
    }

    /// Mount every provided store and start following the session.
    ///
    /// The auth store mounts first so the cart and wishlist see a restored
    /// session. Load failures are logged, not returned: the stores stay
    /// usable and can be refreshed later.
    pub async fn start(&self) {
        if let Some(auth) = self.try_auth() {
            auth.mount().await;
        }

        let (panier, favoris) = tokio::join!(
            async {
                match self.try_panier() {
                    Some(store) => store.mount().await,
                    None => Ok(()),
                }
            },
            async {
                match self.try_favoris() {
                    Some(store) => store.mount().await,
                    None => Ok(()),
                }
            }
        );
        if let Err(e) = panier {
            warn!(error = %e, "Initial cart load failed");
        }
        if let Err(e) = favoris {
            warn!(error = %e, "Initial wishlist load failed");
        }

        if let Some(auth) = self.try_auth()
            && (self.panier.is_provided() || self.favoris.is_provided())
        {
            let handle = tokio::spawn(watch_session(
                auth.clone(),
                self.try_panier().cloned(),
                self.try_favoris().cloned(),
            ));
            if let Some(previous) = self.watcher.lock().await.replace(handle) {
                previous.abort();
            }
        }
        info!("Application context started");
    }

    /// Stop the session watcher and unmount every store.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.watcher.lock().await.take() {
            handle.abort();
        }
        if let Some(store) = self.try_panier() {
            store.unmount();
        }
        if let Some(store) = self.try_favoris() {
            store.unmount();
        }
        if let Some(store) = self.try_auth() {
            store.unmount();
        }
        info!("Application context stopped");
    }
}

/// Reload the cart and wishlist on sign-in, drop them on sign-out.
async fn watch_session(
    auth: AuthStore,
    panier: Option<PanierStore>,
    favoris: Option<FavorisStore>,
) {
    let mut rx = auth.subscribe();
    let mut signed_in = rx.borrow_and_update().is_authenticated();

    while rx.changed().await.is_ok() {
        let now = rx.borrow_and_update().is_authenticated();
        if now == signed_in {
            continue;
        }
        signed_in = now;

        if now {
            debug!("Signed in, reloading cart and wishlist");
            let (p, f) = tokio::join!(
                async {
                    match &panier {
                        Some(store) => store.refresh().await.map(drop),
                        None => Ok(()),
                    }
                },
                async {
                    match &favoris {
                        Some(store) => store.refresh().await.map(drop),
                        None => Ok(()),
                    }
                }
            );
            if let Err(e) = p {
                warn!(error = %e, "Cart reload after sign-in failed");
            }
            if let Err(e) = f {
                warn!(error = %e, "Wishlist reload after sign-in failed");
            }
        } else {
            debug!("Signed out, clearing cart and wishlist");
            if let Some(store) = &panier {
                store.reset();
            }
            if let Some(store) = &favoris {
                store.reset();
            }
        }
    }
}
