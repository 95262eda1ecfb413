//! Wishlist (favoris) records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use texpress_core::{FavoriId, ProduitId};

use super::Produit;

/// A product saved to the client's wishlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favori {
    pub id: FavoriId,
    pub produit_id: ProduitId,
    #[serde(default)]
    pub produit: Option<Produit>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
