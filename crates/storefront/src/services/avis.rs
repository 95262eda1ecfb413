//! Product reviews.

use serde_json::{Value, json};
use texpress_core::{AvisId, ProduitId, StatutAvis};
use tracing::instrument;

use crate::api::{ApiClient, ApiError, RequestOptions, envelope};
use crate::types::{Avis, NouvelAvis};

/// Review service.
#[derive(Clone)]
pub struct AvisService {
    client: ApiClient,
}

impl AvisService {
    /// Create a new review service.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Published reviews of a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(produit_id = %produit_id))]
    pub async fn produit(&self, produit_id: ProduitId) -> Result<Vec<Avis>, ApiError> {
        let mut body: Value = self
            .client
            .post(
                "avis/produit",
                &json!({ "produit_id": produit_id }),
                RequestOptions::public(),
            )
            .await?;
        envelope::list(&mut body, "avis")
    }

    /// Post a review. It stays hidden until moderated.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 422 for an out-of-range note.
    #[instrument(skip(self, avis), fields(produit_id = %avis.produit_id, note = avis.note))]
    pub async fn ajouter(&self, avis: &NouvelAvis) -> Result<Avis, ApiError> {
        let mut body: Value = self
            .client
            .post("avis/ajouter", avis, RequestOptions::authenticated())
            .await?;
        envelope::field(&mut body, "avis")
    }

    /// Delete one of the client's own reviews.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(avis_id = %avis_id))]
    pub async fn supprimer(&self, avis_id: AvisId) -> Result<Option<String>, ApiError> {
        let body: Value = self
            .client
            .post(
                "avis/supprimer",
                &json!({ "avis_id": avis_id }),
                RequestOptions::authenticated(),
            )
            .await?;
        Ok(envelope::message(&body))
    }

    /// Every review, whatever its status (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn liste(&self) -> Result<Vec<Avis>, ApiError> {
        let mut body: Value = self
            .client
            .get("admin/avis", RequestOptions::authenticated().fresh())
            .await?;
        envelope::list(&mut body, "avis")
    }

    /// Reviews awaiting moderation (admin).
    ///
    /// # Errors
    ///
    /// See [`Self::liste`].
    pub async fn en_attente(&self) -> Result<Vec<Avis>, ApiError> {
        Ok(en_attente(self.liste().await?))
    }

    /// Approve or reject a review (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(avis_id = %avis_id, statut = %statut))]
    pub async fn moderer(&self, avis_id: AvisId, statut: StatutAvis) -> Result<Avis, ApiError> {
        let mut body: Value = self
            .client
            .post(
                "admin/avis/moderer",
                &json!({ "avis_id": avis_id, "statut": statut }),
                RequestOptions::authenticated(),
            )
            .await?;
        envelope::field(&mut body, "avis")
    }
}

/// Keep reviews awaiting moderation.
#[must_use]
pub fn en_attente(avis: Vec<Avis>) -> Vec<Avis> {
    avis.into_iter()
        .filter(|a| a.statut == StatutAvis::EnAttente)
        .collect()
}

/// Mean note of a set of reviews, rounded to one decimal.
#[must_use]
pub fn note_moyenne(avis: &[Avis]) -> Option<f64> {
    if avis.is_empty() {
        return None;
    }
    let somme: u32 = avis.iter().map(|a| u32::from(a.note)).sum();
    let moyenne = f64::from(somme) / f64::from(u32::try_from(avis.len()).ok()?);
    Some((moyenne * 10.0).round() / 10.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn avis() -> Vec<Avis> {
        serde_json::from_value(json!([
            { "id": 1, "produit_id": 7, "note": 5, "statut": "approuve" },
            { "id": 2, "produit_id": 7, "note": 4, "statut": "en_attente" },
            { "id": 3, "produit_id": 7, "note": 4, "statut": "rejete" }
        ]))
        .unwrap()
    }

    #[test]
    fn test_en_attente_filters_pending() {
        let pending = en_attente(avis());
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, AvisId::new(2));
    }

    #[test]
    fn test_note_moyenne() {
        assert_eq!(note_moyenne(&avis()), Some(4.3));
        assert_eq!(note_moyenne(&[]), None);
    }
}
