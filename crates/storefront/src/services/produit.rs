//! Admin product management.

use serde::Serialize;
use serde_json::{Value, json};
use texpress_core::ProduitId;
use tracing::instrument;

use super::with_id;
use crate::api::{ApiClient, ApiError, RequestOptions, envelope};
use crate::types::{Produit, ProduitInput};

/// Admin product service.
#[derive(Clone)]
pub struct ProduitService {
    client: ApiClient,
}

impl ProduitService {
    /// Create a new product service.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Every product, including inactive ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn liste(&self) -> Result<Vec<Produit>, ApiError> {
        let mut body: Value = self
            .client
            .get("admin/produits", RequestOptions::authenticated().fresh())
            .await?;
        envelope::list(&mut body, "produits")
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the product or the request fails.
    #[instrument(skip(self, produit), fields(nom = %produit.nom))]
    pub async fn ajouter(&self, produit: &ProduitInput) -> Result<Produit, ApiError> {
        self.call("admin/produits/ajouter", produit).await
    }

    /// Replace a product's editable fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the product or the request fails.
    #[instrument(skip(self, produit), fields(produit_id = %produit_id))]
    pub async fn modifier(
        &self,
        produit_id: ProduitId,
        produit: &ProduitInput,
    ) -> Result<Produit, ApiError> {
        let payload = with_id(produit, "produit_id", produit_id)?;
        self.call("admin/produits/modifier", &payload).await
    }

    /// Delete a product. Returns the server message, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(produit_id = %produit_id))]
    pub async fn supprimer(&self, produit_id: ProduitId) -> Result<Option<String>, ApiError> {
        let body: Value = self
            .client
            .post(
                "admin/produits/supprimer",
                &json!({ "produit_id": produit_id }),
                RequestOptions::authenticated(),
            )
            .await?;
        Ok(envelope::message(&body))
    }

    async fn call<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        payload: &B,
    ) -> Result<Produit, ApiError> {
        let mut body: Value = self
            .client
            .post(endpoint, payload, RequestOptions::authenticated())
            .await?;
        envelope::field(&mut body, "produit")
    }
}
