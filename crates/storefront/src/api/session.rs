//! Authentication session shared by the API gateway and the auth store.
//!
//! A [`Session`] is created once by the composition root and handed to the
//! [`ApiClient`](super::ApiClient) at construction. It holds the bearer token
//! and the cached profile as a single value, so one can never be present
//! without the other, and mirrors both into a [`SessionStorage`] under the
//! `auth_token` and `user_data` keys.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::types::Client;

/// Storage key of the bearer token.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Storage key of the serialized profile.
pub const USER_DATA_KEY: &str = "user_data";

/// Errors raised by a [`SessionStorage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Corrupt session file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Session storage lock poisoned")]
    Poisoned,
}

/// Client-side key-value storage for the persisted session.
pub trait SessionStorage: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local storage, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Storage backed by a small JSON object on disk.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Use `path` as the session file. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if entries.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(entries)?)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

// =============================================================================
// Session
// =============================================================================

/// The signed-in state: bearer token plus the profile it belongs to.
#[derive(Debug, Clone)]
struct Authenticated {
    token: SecretString,
    client: Client,
}

/// Shared authentication session.
///
/// Cheaply cloneable; all clones observe the same state.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    current: RwLock<Option<Authenticated>>,
    storage: Arc<dyn SessionStorage>,
}

impl Session {
    /// Create an empty session persisted to `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                current: RwLock::new(None),
                storage,
            }),
        }
    }

    /// Create an empty session that is not persisted anywhere.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::default()))
    }

    /// Load a previously persisted session.
    ///
    /// Both keys must be present and the profile must decode; anything else
    /// is treated as a torn write and both keys are removed. When the
    /// storage cannot be read at all, nothing is removed.
    pub async fn restore(&self) -> Option<Client> {
        let storage = &self.inner.storage;
        let (token, user_data) = match (storage.get(AUTH_TOKEN_KEY), storage.get(USER_DATA_KEY)) {
            (Ok(token), Ok(user_data)) => (token, user_data),
            (Err(e), _) | (_, Err(e)) => {
                // A read failure says nothing about the stored values
                warn!(error = %e, "Session storage unreadable, starting signed out");
                return None;
            }
        };

        let restored = match (token, user_data) {
            (Some(token), Some(user_data)) if !token.is_empty() => {
                match serde_json::from_str::<Client>(&user_data) {
                    Ok(client) => Some(Authenticated {
                        token: SecretString::from(token),
                        client,
                    }),
                    Err(e) => {
                        warn!(error = %e, "Discarding unreadable persisted profile");
                        None
                    }
                }
            }
            (None, None) => return None,
            _ => None,
        };

        if let Some(auth) = restored {
            debug!(client_id = %auth.client.id, "Restored persisted session");
            let client = auth.client.clone();
            *self.inner.current.write().await = Some(auth);
            Some(client)
        } else {
            self.clear().await;
            None
        }
    }

    /// Install a freshly issued token together with its profile.
    ///
    /// The in-memory state is authoritative; persistence failures are logged
    /// and do not fail the call.
    pub async fn establish(&self, token: SecretString, client: Client) {
        let storage = &self.inner.storage;
        if let Err(e) = storage.set(AUTH_TOKEN_KEY, token.expose_secret()) {
            warn!(error = %e, "Failed to persist auth token");
        }
        self.persist_profile(&client);

        *self.inner.current.write().await = Some(Authenticated { token, client });
    }

    /// Replace the cached profile of the signed-in client.
    ///
    /// Returns `false` (and stores nothing) when nobody is signed in.
    pub async fn update_profile(&self, client: Client) -> bool {
        let mut current = self.inner.current.write().await;
        let Some(auth) = current.as_mut() else {
            return false;
        };
        self.persist_profile(&client);
        auth.client = client;
        true
    }

    /// Forget the token and profile, in memory and in storage.
    pub async fn clear(&self) {
        *self.inner.current.write().await = None;

        let storage = &self.inner.storage;
        for key in [AUTH_TOKEN_KEY, USER_DATA_KEY] {
            if let Err(e) = storage.remove(key) {
                warn!(error = %e, key, "Failed to clear persisted session key");
            }
        }
    }

    /// Current bearer token, if signed in.
    pub async fn token(&self) -> Option<SecretString> {
        self.inner
            .current
            .read()
            .await
            .as_ref()
            .map(|auth| auth.token.clone())
    }

    /// Cached profile, if signed in.
    pub async fn client(&self) -> Option<Client> {
        self.inner
            .current
            .read()
            .await
            .as_ref()
            .map(|auth| auth.client.clone())
    }

    /// Whether a token is currently installed.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.current.read().await.is_some()
    }

    fn persist_profile(&self, client: &Client) {
        match serde_json::to_string(client) {
            Ok(json) => {
                if let Err(e) = self.inner.storage.set(USER_DATA_KEY, &json) {
                    warn!(error = %e, "Failed to persist user data");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize user data"),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}
