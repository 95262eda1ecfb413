//! Cart (panier) service.
//!
//! Every mutation answers with the full server-computed cart, which callers
//! must use as-is: prices, promotions and stock limits are applied by the
//! API.

use futures::future::join_all;
use serde_json::{Value, json};
use texpress_core::{LignePanierId, ProduitId};
use tracing::{instrument, warn};

use crate::api::{ApiClient, ApiError, RequestOptions, envelope};
use crate::types::PanierContenu;

/// Cart service.
#[derive(Clone)]
pub struct PanierService {
    client: ApiClient,
}

impl PanierService {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Current cart contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn contenu(&self) -> Result<PanierContenu, ApiError> {
        self.call(
            "panier/contenu",
            json!({}),
            RequestOptions::authenticated().fresh(),
        )
        .await
    }

    /// Add `quantite` units of a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the addition (e.g. insufficient
    /// stock) or the request fails.
    #[instrument(skip(self), fields(produit_id = %produit_id, quantite))]
    pub async fn ajouter(
        &self,
        produit_id: ProduitId,
        quantite: u32,
    ) -> Result<PanierContenu, ApiError> {
        self.call(
            "panier/ajouter",
            json!({ "produit_id": produit_id, "quantite": quantite }),
            RequestOptions::authenticated(),
        )
        .await
    }

    /// Set the quantity of a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the change or the request fails.
    #[instrument(skip(self), fields(ligne_id = %ligne_id, quantite))]
    pub async fn modifier(
        &self,
        ligne_id: LignePanierId,
        quantite: u32,
    ) -> Result<PanierContenu, ApiError> {
        self.call(
            "panier/modifier",
            json!({ "ligne_id": ligne_id, "quantite": quantite }),
            RequestOptions::authenticated(),
        )
        .await
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist or the request fails.
    #[instrument(skip(self), fields(ligne_id = %ligne_id))]
    pub async fn supprimer(&self, ligne_id: LignePanierId) -> Result<PanierContenu, ApiError> {
        self.call(
            "panier/supprimer",
            json!({ "ligne_id": ligne_id }),
            RequestOptions::authenticated(),
        )
        .await
    }

    /// Empty the cart.
    ///
    /// Fetches the contents, then deletes every line concurrently and waits
    /// for all of them. If any delete fails the whole operation fails with
    /// `ApiError::Aggregate`; the lines that were deleted stay deleted. On
    /// success the cart is fetched again and returned.
    ///
    /// # Errors
    ///
    /// Returns the fetch error, or `ApiError::Aggregate` when at least one
    /// delete failed.
    #[instrument(skip(self))]
    pub async fn vider(&self) -> Result<PanierContenu, ApiError> {
        let actuel = self.contenu().await?;
        if actuel.est_vide() {
            return Ok(actuel);
        }
        let lignes = actuel.ids_lignes();

        let total = lignes.len();
        let results = join_all(lignes.into_iter().map(|id| self.supprimer(id))).await;
        let errors: Vec<ApiError> = results.into_iter().filter_map(Result::err).collect();

        if !errors.is_empty() {
            warn!(
                failed = errors.len(),
                total, "Cart clear partially failed, cart left inconsistent"
            );
            return Err(ApiError::Aggregate {
                failed: errors.len(),
                total,
                errors,
            });
        }

        self.contenu().await
    }

    async fn call(
        &self,
        endpoint: &str,
        payload: Value,
        options: RequestOptions,
    ) -> Result<PanierContenu, ApiError> {
        let mut body: Value = self.client.post(endpoint, &payload, options).await?;
        envelope::field(&mut body, "panier")
    }
}
