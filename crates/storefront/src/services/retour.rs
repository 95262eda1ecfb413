//! Order returns.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use texpress_core::{RetourId, StatutRetour};
use tracing::instrument;

use crate::api::{ApiClient, ApiError, RequestOptions, envelope};
use crate::types::{DemandeRetour, RetourCommande};

/// Admin decision on a return request.
#[derive(Debug, Clone, Serialize)]
pub struct TraitementRetour {
    pub retour_id: RetourId,
    pub statut: StatutRetour,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commentaire_admin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub montant_rembourse: Option<Decimal>,
}

/// Return service.
#[derive(Clone)]
pub struct RetourService {
    client: ApiClient,
}

impl RetourService {
    /// Create a new return service.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Ask to return an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not returnable or the request fails.
    #[instrument(skip(self, demande), fields(commande_id = %demande.commande_id))]
    pub async fn demander(&self, demande: &DemandeRetour) -> Result<RetourCommande, ApiError> {
        let mut body: Value = self
            .client
            .post("retours/demander", demande, RequestOptions::authenticated())
            .await?;
        envelope::field(&mut body, "retour")
    }

    /// The signed-in client's return requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn mes_retours(&self) -> Result<Vec<RetourCommande>, ApiError> {
        let mut body: Value = self
            .client
            .post(
                "retours/mes-retours",
                &serde_json::json!({}),
                RequestOptions::authenticated().fresh(),
            )
            .await?;
        envelope::list(&mut body, "retours")
    }

    /// All return requests (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn liste(&self) -> Result<Vec<RetourCommande>, ApiError> {
        let mut body: Value = self
            .client
            .get("admin/retours", RequestOptions::authenticated().fresh())
            .await?;
        envelope::list(&mut body, "retours")
    }

    /// Requests awaiting a decision (admin).
    ///
    /// # Errors
    ///
    /// See [`Self::liste`].
    pub async fn en_attente(&self) -> Result<Vec<RetourCommande>, ApiError> {
        Ok(en_attente(self.liste().await?))
    }

    /// Approve, refuse or close a return (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the decision or the request fails.
    #[instrument(skip(self, traitement), fields(retour_id = %traitement.retour_id, statut = %traitement.statut))]
    pub async fn traiter(&self, traitement: &TraitementRetour) -> Result<RetourCommande, ApiError> {
        let mut body: Value = self
            .client
            .post(
                "admin/retours/traiter",
                traitement,
                RequestOptions::authenticated(),
            )
            .await?;
        envelope::field(&mut body, "retour")
    }
}

/// Keep requests still awaiting a decision.
#[must_use]
pub fn en_attente(retours: Vec<RetourCommande>) -> Vec<RetourCommande> {
    retours
        .into_iter()
        .filter(|r| r.statut == StatutRetour::EnAttente)
        .collect()
}
