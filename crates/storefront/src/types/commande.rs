//! Orders (commandes).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use texpress_core::{AdresseId, CommandeId, MethodePaiement, ProduitId, StatutCommande};

use super::{Adresse, Produit};

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commande {
    pub id: CommandeId,
    #[serde(default)]
    pub numero: Option<String>,
    #[serde(default)]
    pub statut: StatutCommande,
    pub total: Decimal,
    #[serde(default)]
    pub frais_livraison: Decimal,
    #[serde(default)]
    pub lignes: Vec<LigneCommande>,
    #[serde(default)]
    pub adresse: Option<Adresse>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// One order line, priced at checkout time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LigneCommande {
    pub produit_id: ProduitId,
    #[serde(default)]
    pub produit: Option<Produit>,
    pub quantite: u32,
    pub prix_unitaire: Decimal,
}

/// Checkout payload; the API turns the current cart into an order.
#[derive(Debug, Clone, Serialize)]
pub struct PasserCommande {
    pub adresse_id: AdresseId,
    pub methode_paiement: MethodePaiement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode_livraison: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
