//! Payments.

use serde_json::{Value, json};
use texpress_core::{CommandeId, MethodePaiement, PaiementId, StatutPaiement};
use tracing::instrument;

use crate::api::{ApiClient, ApiError, RequestOptions, envelope};
use crate::types::Paiement;

/// Payment service.
#[derive(Clone)]
pub struct PaiementService {
    client: ApiClient,
}

impl PaiementService {
    /// Create a new payment service.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Start paying for an order.
    ///
    /// For card and mobile money the returned payment carries the
    /// `url_paiement` the customer must be sent to.
    ///
    /// # Errors
    ///
    /// Returns an error if the order cannot be paid or the request fails.
    #[instrument(skip(self), fields(commande_id = %commande_id, methode = %methode))]
    pub async fn initier(
        &self,
        commande_id: CommandeId,
        methode: MethodePaiement,
    ) -> Result<Paiement, ApiError> {
        let mut body: Value = self
            .client
            .post(
                "paiements/initier",
                &json!({ "commande_id": commande_id, "methode": methode }),
                RequestOptions::authenticated(),
            )
            .await?;
        envelope::field(&mut body, "paiement")
    }

    /// Ask the API for the provider's verdict on a payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(paiement_id = %paiement_id))]
    pub async fn verifier(&self, paiement_id: PaiementId) -> Result<Paiement, ApiError> {
        let mut body: Value = self
            .client
            .post(
                "paiements/verifier",
                &json!({ "paiement_id": paiement_id }),
                RequestOptions::authenticated().fresh(),
            )
            .await?;
        envelope::field(&mut body, "paiement")
    }

    /// All payments (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn liste(&self) -> Result<Vec<Paiement>, ApiError> {
        let mut body: Value = self
            .client
            .get("admin/paiements", RequestOptions::authenticated().fresh())
            .await?;
        envelope::list(&mut body, "paiements")
    }

    /// Failed payments (admin).
    ///
    /// # Errors
    ///
    /// See [`Self::liste`].
    pub async fn echoues(&self) -> Result<Vec<Paiement>, ApiError> {
        Ok(echoues(self.liste().await?))
    }
}

/// Keep failed payments.
#[must_use]
pub fn echoues(paiements: Vec<Paiement>) -> Vec<Paiement> {
    paiements
        .into_iter()
        .filter(|p| p.statut == StatutPaiement::Echoue)
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_echoues_filters_failed() {
        let paiements: Vec<Paiement> = serde_json::from_value(json!([
            { "id": 1, "commande_id": 10, "montant": "5000", "methode": "mobile_money", "statut": "reussi" },
            { "id": 2, "commande_id": 11, "montant": "7000", "methode": "carte", "statut": "echoue" },
            { "id": 3, "commande_id": 12, "montant": "1500", "methode": "carte" }
        ]))
        .unwrap();
        let failed = echoues(paiements);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].id, PaiementId::new(2));
    }
}
