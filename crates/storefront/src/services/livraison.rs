//! Delivery tracking.

use serde_json::{Value, json};
use texpress_core::{CommandeId, LivraisonId, StatutLivraison};
use tracing::instrument;

use crate::api::{ApiClient, ApiError, RequestOptions, envelope};
use crate::types::Livraison;

/// Delivery service.
#[derive(Clone)]
pub struct LivraisonService {
    client: ApiClient,
}

impl LivraisonService {
    /// Create a new delivery service.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Tracking for one of the client's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the order has no delivery or the request fails.
    #[instrument(skip(self), fields(commande_id = %commande_id))]
    pub async fn suivi(&self, commande_id: CommandeId) -> Result<Livraison, ApiError> {
        let mut body: Value = self
            .client
            .post(
                "livraisons/suivi",
                &json!({ "commande_id": commande_id }),
                RequestOptions::authenticated().fresh(),
            )
            .await?;
        envelope::field(&mut body, "livraison")
    }

    /// All deliveries (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn liste(&self) -> Result<Vec<Livraison>, ApiError> {
        let mut body: Value = self
            .client
            .get("admin/livraisons", RequestOptions::authenticated().fresh())
            .await?;
        envelope::list(&mut body, "livraisons")
    }

    /// Deliveries that have left the warehouse but not arrived (admin).
    ///
    /// # Errors
    ///
    /// See [`Self::liste`].
    pub async fn en_cours(&self) -> Result<Vec<Livraison>, ApiError> {
        Ok(en_cours(self.liste().await?))
    }

    /// Move a delivery to a new status (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is refused or the request fails.
    #[instrument(skip(self), fields(livraison_id = %livraison_id, statut = %statut))]
    pub async fn changer_statut(
        &self,
        livraison_id: LivraisonId,
        statut: StatutLivraison,
        numero_suivi: Option<&str>,
    ) -> Result<Livraison, ApiError> {
        let mut payload = json!({ "livraison_id": livraison_id, "statut": statut });
        if let Some(numero) = numero_suivi {
            payload["numero_suivi"] = json!(numero);
        }
        let mut body: Value = self
            .client
            .post(
                "admin/livraisons/statut",
                &payload,
                RequestOptions::authenticated(),
            )
            .await?;
        envelope::field(&mut body, "livraison")
    }
}

/// Keep deliveries currently in transit.
#[must_use]
pub fn en_cours(livraisons: Vec<Livraison>) -> Vec<Livraison> {
    livraisons
        .into_iter()
        .filter(|l| l.statut.est_en_transit())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn livraison(id: i64, statut: &str) -> Livraison {
        serde_json::from_value(json!({ "id": id, "commande_id": 100 + id, "statut": statut }))
            .unwrap()
    }

    #[test]
    fn test_en_cours_keeps_transit_statuses() {
        let kept = en_cours(vec![
            livraison(1, "en_attente"),
            livraison(2, "expediee"),
            livraison(3, "en_cours"),
            livraison(4, "livree"),
            livraison(5, "statut_futur"),
        ]);
        let ids: Vec<i64> = kept.iter().map(|l| l.id.as_i64()).collect();
        assert_eq!(ids, vec![2, 3]);
    }
}
