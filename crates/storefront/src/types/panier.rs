//! Cart (panier) records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use texpress_core::{LignePanierId, ProduitId};

use super::Produit;

/// Server-computed cart snapshot.
///
/// Totals are computed by the API (promotions, stock rules); the client
/// never recomputes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanierContenu {
    #[serde(default)]
    pub lignes: Vec<LignePanier>,
    #[serde(default)]
    pub total: Decimal,
    #[serde(default)]
    pub nombre_articles: u32,
}

/// One cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LignePanier {
    pub id: LignePanierId,
    pub produit_id: ProduitId,
    #[serde(default)]
    pub produit: Option<Produit>,
    pub quantite: u32,
    #[serde(default)]
    pub prix_unitaire: Decimal,
    #[serde(default)]
    pub sous_total: Decimal,
}

impl PanierContenu {
    /// Whether the cart has no lines.
    #[must_use]
    pub fn est_vide(&self) -> bool {
        self.lignes.is_empty()
    }

    /// The line holding `produit_id`, if any.
    #[must_use]
    pub fn ligne_pour(&self, produit_id: ProduitId) -> Option<&LignePanier> {
        self.lignes.iter().find(|l| l.produit_id == produit_id)
    }

    /// Identifiers of every line, in cart order.
    #[must_use]
    pub fn ids_lignes(&self) -> Vec<LignePanierId> {
        self.lignes.iter().map(|l| l.id).collect()
    }
}
