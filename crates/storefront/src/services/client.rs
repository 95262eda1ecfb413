//! Client account service: profile edits and the admin customer list.
//!
//! Unlike [`AuthService`](super::AuthService) this service has no side
//! effects; the auth store decides what to do with the returned profile.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::api::{ApiClient, ApiError, RequestOptions, envelope};
use crate::types::{Client, MiseAJourProfil};

#[derive(Serialize)]
struct ChangementMotDePasse<'a> {
    mot_de_passe_actuel: &'a str,
    password: &'a str,
    password_confirmation: &'a str,
}

/// Client account service.
#[derive(Clone)]
pub struct ClientService {
    client: ApiClient,
}

impl ClientService {
    /// Create a new client account service.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Update profile fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the update or the request fails.
    #[instrument(skip(self, update))]
    pub async fn modifier_profil(&self, update: &MiseAJourProfil) -> Result<Client, ApiError> {
        let mut body: Value = self
            .client
            .post(
                "client/profil/modifier",
                update,
                RequestOptions::authenticated(),
            )
            .await?;
        envelope::field(&mut body, "client")
    }

    /// Change the account password. Returns the server message, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the current password is wrong or the request fails.
    #[instrument(skip_all)]
    pub async fn changer_mot_de_passe(
        &self,
        actuel: &SecretString,
        nouveau: &SecretString,
    ) -> Result<Option<String>, ApiError> {
        let request = ChangementMotDePasse {
            mot_de_passe_actuel: actuel.expose_secret(),
            password: nouveau.expose_secret(),
            password_confirmation: nouveau.expose_secret(),
        };
        let body: Value = self
            .client
            .post("client/mot-de-passe", &request, RequestOptions::authenticated())
            .await?;
        Ok(envelope::message(&body))
    }

    /// All customer accounts (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn liste(&self) -> Result<Vec<Client>, ApiError> {
        let mut body: Value = self
            .client
            .get("admin/clients", RequestOptions::authenticated())
            .await?;
        envelope::list(&mut body, "clients")
    }
}
