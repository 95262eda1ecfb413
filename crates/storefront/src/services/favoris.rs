//! Wishlist (favoris) service.

use serde_json::{Value, json};
use texpress_core::ProduitId;
use tracing::instrument;

use crate::api::{ApiClient, ApiError, RequestOptions, envelope};
use crate::types::Favori;

/// Outcome of a toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct Bascule {
    /// Membership after the toggle.
    pub est_favori: bool,
    /// The created entry when the product was added.
    pub favori: Option<Favori>,
    pub message: Option<String>,
}

/// Wishlist service.
#[derive(Clone)]
pub struct FavorisService {
    client: ApiClient,
}

impl FavorisService {
    /// Create a new wishlist service.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The signed-in client's wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn liste(&self) -> Result<Vec<Favori>, ApiError> {
        let mut body: Value = self
            .client
            .post(
                "favoris/liste",
                &json!({}),
                RequestOptions::authenticated().fresh(),
            )
            .await?;
        envelope::list(&mut body, "favoris")
    }

    /// Add a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(produit_id = %produit_id))]
    pub async fn ajouter(&self, produit_id: ProduitId) -> Result<Favori, ApiError> {
        let mut body: Value = self
            .client
            .post(
                "favoris/ajouter",
                &json!({ "produit_id": produit_id }),
                RequestOptions::authenticated(),
            )
            .await?;
        envelope::field(&mut body, "favori")
    }

    /// Remove a product. Returns the server message, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(produit_id = %produit_id))]
    pub async fn retirer(&self, produit_id: ProduitId) -> Result<Option<String>, ApiError> {
        let body: Value = self
            .client
            .post(
                "favoris/retirer",
                &json!({ "produit_id": produit_id }),
                RequestOptions::authenticated(),
            )
            .await?;
        Ok(envelope::message(&body))
    }

    /// Flip membership of a product; the server decides the new state.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(produit_id = %produit_id))]
    pub async fn basculer(&self, produit_id: ProduitId) -> Result<Bascule, ApiError> {
        let mut body: Value = self
            .client
            .post(
                "favoris/basculer",
                &json!({ "produit_id": produit_id }),
                RequestOptions::authenticated(),
            )
            .await?;

        let message = envelope::message(&body);
        let est_favori = envelope::field(&mut body, "est_favori")?;
        let favori = envelope::optional_field(&mut body, "favori")?;

        Ok(Bascule {
            est_favori,
            favori,
            message,
        })
    }
}
