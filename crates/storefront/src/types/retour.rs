//! Order returns (retours).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use texpress_core::{ClientId, CommandeId, RetourId, StatutRetour};

/// A return request on a delivered order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetourCommande {
    pub id: RetourId,
    pub commande_id: CommandeId,
    #[serde(default)]
    pub client_id: Option<ClientId>,
    pub motif: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub statut: StatutRetour,
    #[serde(default)]
    pub commentaire_admin: Option<String>,
    #[serde(default)]
    pub montant_rembourse: Option<Decimal>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Customer-side return request.
#[derive(Debug, Clone, Serialize)]
pub struct DemandeRetour {
    pub commande_id: CommandeId,
    pub motif: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
