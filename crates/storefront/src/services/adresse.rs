//! Delivery address service.

use serde_json::{Value, json};
use texpress_core::AdresseId;
use tracing::instrument;

use super::with_id;
use crate::api::{ApiClient, ApiError, RequestOptions, envelope};
use crate::types::{Adresse, AdresseInput};

/// Delivery address service.
#[derive(Clone)]
pub struct AdresseService {
    client: ApiClient,
}

impl AdresseService {
    /// Create a new address service.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The signed-in client's addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn liste(&self) -> Result<Vec<Adresse>, ApiError> {
        let mut body: Value = self
            .client
            .post("adresses/liste", &json!({}), RequestOptions::authenticated())
            .await?;
        envelope::list(&mut body, "adresses")
    }

    /// Save a new address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the address or the request fails.
    #[instrument(skip(self, adresse))]
    pub async fn ajouter(&self, adresse: &AdresseInput) -> Result<Adresse, ApiError> {
        let mut body: Value = self
            .client
            .post("adresses/ajouter", adresse, RequestOptions::authenticated())
            .await?;
        envelope::field(&mut body, "adresse")
    }

    /// Replace an existing address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the address or the request fails.
    #[instrument(skip(self, adresse), fields(adresse_id = %adresse_id))]
    pub async fn modifier(
        &self,
        adresse_id: AdresseId,
        adresse: &AdresseInput,
    ) -> Result<Adresse, ApiError> {
        let payload = with_id(adresse, "adresse_id", adresse_id)?;
        let mut body: Value = self
            .client
            .post("adresses/modifier", &payload, RequestOptions::authenticated())
            .await?;
        envelope::field(&mut body, "adresse")
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(adresse_id = %adresse_id))]
    pub async fn supprimer(&self, adresse_id: AdresseId) -> Result<Option<String>, ApiError> {
        let body: Value = self
            .client
            .post(
                "adresses/supprimer",
                &json!({ "adresse_id": adresse_id }),
                RequestOptions::authenticated(),
            )
            .await?;
        Ok(envelope::message(&body))
    }

    /// Make an address the default one.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(adresse_id = %adresse_id))]
    pub async fn definir_defaut(&self, adresse_id: AdresseId) -> Result<Adresse, ApiError> {
        let mut body: Value = self
            .client
            .post(
                "adresses/defaut",
                &json!({ "adresse_id": adresse_id }),
                RequestOptions::authenticated(),
            )
            .await?;
        envelope::field(&mut body, "adresse")
    }
}
