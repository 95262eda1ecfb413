//! Deliveries (livraisons).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use texpress_core::{CommandeId, LivraisonId, StatutLivraison};

/// Shipment tracking for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Livraison {
    pub id: LivraisonId,
    pub commande_id: CommandeId,
    #[serde(default)]
    pub statut: StatutLivraison,
    #[serde(default)]
    pub transporteur: Option<String>,
    #[serde(default)]
    pub numero_suivi: Option<String>,
    #[serde(default)]
    pub date_estimee: Option<NaiveDate>,
    #[serde(default)]
    pub frais: Decimal,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
