//! Orders: checkout, history and cancellation.

use serde_json::{Value, json};
use texpress_core::{CommandeId, StatutCommande};
use tracing::{info, instrument};

use crate::api::{ApiClient, ApiError, RequestOptions, envelope};
use crate::types::{Commande, PasserCommande};

/// Order service.
#[derive(Clone)]
pub struct CommandeService {
    client: ApiClient,
}

impl CommandeService {
    /// Create a new order service.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Turn the current cart into an order. The API empties the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart is empty, stock is insufficient or the
    /// request fails.
    #[instrument(skip(self, commande), fields(adresse_id = %commande.adresse_id, methode = %commande.methode_paiement))]
    pub async fn passer(&self, commande: &PasserCommande) -> Result<Commande, ApiError> {
        let mut body: Value = self
            .client
            .post("commandes/passer", commande, RequestOptions::authenticated())
            .await?;
        let commande: Commande = envelope::field(&mut body, "commande")?;
        info!(commande_id = %commande.id, total = %commande.total, "Order placed");
        Ok(commande)
    }

    /// The signed-in client's orders, newest first as sent by the API.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn mes_commandes(&self) -> Result<Vec<Commande>, ApiError> {
        let mut body: Value = self
            .client
            .post(
                "commandes/mes-commandes",
                &json!({}),
                RequestOptions::authenticated().fresh(),
            )
            .await?;
        envelope::list(&mut body, "commandes")
    }

    /// One order with its lines.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 404 if the order is not the
    /// client's.
    #[instrument(skip(self), fields(commande_id = %commande_id))]
    pub async fn details(&self, commande_id: CommandeId) -> Result<Commande, ApiError> {
        let mut body: Value = self
            .client
            .post(
                "commandes/details",
                &json!({ "commande_id": commande_id }),
                RequestOptions::authenticated().fresh(),
            )
            .await?;
        envelope::field(&mut body, "commande")
    }

    /// Cancel an order that has not been prepared yet.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` if the order can no longer be cancelled.
    #[instrument(skip(self), fields(commande_id = %commande_id))]
    pub async fn annuler(&self, commande_id: CommandeId) -> Result<Commande, ApiError> {
        let mut body: Value = self
            .client
            .post(
                "commandes/annuler",
                &json!({ "commande_id": commande_id }),
                RequestOptions::authenticated(),
            )
            .await?;
        envelope::field(&mut body, "commande")
    }

    /// Every order (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn liste(&self) -> Result<Vec<Commande>, ApiError> {
        let mut body: Value = self
            .client
            .get("admin/commandes", RequestOptions::authenticated().fresh())
            .await?;
        envelope::list(&mut body, "commandes")
    }
}

/// Keep orders in `statut`.
#[must_use]
pub fn par_statut(commandes: Vec<Commande>, statut: StatutCommande) -> Vec<Commande> {
    commandes
        .into_iter()
        .filter(|c| c.statut == statut)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_par_statut() {
        let commandes: Vec<Commande> = serde_json::from_value(json!([
            { "id": 1, "total": "12000", "statut": "livree" },
            { "id": 2, "total": "3000", "statut": "en_attente" },
            { "id": 3, "total": "8000", "statut": "livree" }
        ]))
        .unwrap();
        let livrees = par_statut(commandes, StatutCommande::Livree);
        assert_eq!(
            livrees.iter().map(|c| c.id.as_i64()).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }
}
