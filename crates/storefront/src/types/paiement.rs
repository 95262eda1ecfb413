//! Payments (paiements).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use texpress_core::{CommandeId, MethodePaiement, PaiementId, StatutPaiement};

/// A payment attempt for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paiement {
    pub id: PaiementId,
    pub commande_id: CommandeId,
    pub montant: Decimal,
    pub methode: MethodePaiement,
    #[serde(default)]
    pub statut: StatutPaiement,
    #[serde(default)]
    pub reference: Option<String>,
    /// Provider page the customer must visit to complete card or mobile
    /// money payments.
    #[serde(default)]
    pub url_paiement: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
