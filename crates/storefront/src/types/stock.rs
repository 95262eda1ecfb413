//! Inventory levels.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use texpress_core::{ProduitId, StockId};

use super::Produit;

/// Alert threshold applied when the API does not send one.
pub const SEUIL_ALERTE_PAR_DEFAUT: i64 = 5;

const fn seuil_par_defaut() -> i64 {
    SEUIL_ALERTE_PAR_DEFAUT
}

/// Stock record for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    #[serde(default)]
    pub id: Option<StockId>,
    pub produit_id: ProduitId,
    #[serde(default)]
    pub produit: Option<Produit>,
    pub quantite: i64,
    #[serde(default = "seuil_par_defaut")]
    pub seuil_alerte: i64,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Coarse stock level derived from quantity and threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NiveauStock {
    Disponible,
    Faible,
    Rupture,
}

impl Stock {
    /// Classify the current quantity against the alert threshold.
    #[must_use]
    pub const fn niveau(&self) -> NiveauStock {
        if self.quantite <= 0 {
            NiveauStock::Rupture
        } else if self.quantite <= self.seuil_alerte {
            NiveauStock::Faible
        } else {
            NiveauStock::Disponible
        }
    }

    /// Whether the stock needs the admin's attention.
    #[must_use]
    pub const fn est_en_alerte(&self) -> bool {
        !matches!(self.niveau(), NiveauStock::Disponible)
    }
}

/// Admin stock adjustment; `quantite` is a signed delta.
#[derive(Debug, Clone, Serialize)]
pub struct AjustementStock {
    pub produit_id: ProduitId,
    pub quantite: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motif: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn stock(quantite: i64, seuil_alerte: i64) -> Stock {
        Stock {
            id: None,
            produit_id: ProduitId::new(1),
            produit: None,
            quantite,
            seuil_alerte,
            updated_at: None,
        }
    }

    #[test]
    fn test_niveau() {
        assert_eq!(stock(0, 5).niveau(), NiveauStock::Rupture);
        assert_eq!(stock(-2, 5).niveau(), NiveauStock::Rupture);
        assert_eq!(stock(5, 5).niveau(), NiveauStock::Faible);
        assert_eq!(stock(6, 5).niveau(), NiveauStock::Disponible);
    }

    #[test]
    fn test_missing_threshold_uses_default() {
        let stock: Stock =
            serde_json::from_value(json!({ "produit_id": 4, "quantite": 3 })).unwrap();
        assert_eq!(stock.seuil_alerte, SEUIL_ALERTE_PAR_DEFAUT);
        assert!(stock.est_en_alerte());
    }
}
