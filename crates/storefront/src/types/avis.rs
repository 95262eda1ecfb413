//! Product reviews (avis).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use texpress_core::{AvisId, ProduitId, StatutAvis};

/// A customer review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avis {
    pub id: AvisId,
    pub produit_id: ProduitId,
    /// Display name of the author, as exposed by the API.
    #[serde(default)]
    pub auteur: Option<String>,
    pub note: u8,
    #[serde(default)]
    pub commentaire: Option<String>,
    #[serde(default)]
    pub statut: StatutAvis,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// New review payload. `note` is on a 1-5 scale.
#[derive(Debug, Clone, Serialize)]
pub struct NouvelAvis {
    pub produit_id: ProduitId,
    pub note: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commentaire: Option<String>,
}
