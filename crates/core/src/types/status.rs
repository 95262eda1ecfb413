//! Status enums for T-Express resources.
//!
//! The API serialises every status as a `snake_case` French label
//! (`"en_attente"`, `"livree"`, ...). Labels this client does not know yet
//! decode to an `Inconnu` variant instead of failing the whole response.

use serde::{Deserialize, Serialize};

/// Implements `Display` and `FromStr` using the serde label.
macro_rules! serde_label {
    ($name:ident) => {
        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                match serde_json::to_value(self) {
                    Ok(serde_json::Value::String(label)) => f.write_str(&label),
                    _ => write!(f, "{self:?}"),
                }
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match serde_json::from_value(serde_json::Value::String(s.to_owned())) {
                    Ok(Self::Inconnu) | Err(_) => {
                        Err(format!("invalid {}: {s}", stringify!($name)))
                    }
                    Ok(status) => Ok(status),
                }
            }
        }
    };
}

/// Order (commande) status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatutCommande {
    #[default]
    EnAttente,
    Confirmee,
    EnPreparation,
    Expediee,
    Livree,
    Annulee,
    Retournee,
    #[serde(other)]
    Inconnu,
}

impl StatutCommande {
    /// Whether the customer may still cancel the order.
    #[must_use]
    pub const fn est_annulable(self) -> bool {
        matches!(self, Self::EnAttente | Self::Confirmee)
    }
}

/// Delivery (livraison) status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatutLivraison {
    #[default]
    EnAttente,
    EnPreparation,
    Expediee,
    EnCours,
    Livree,
    Echouee,
    #[serde(other)]
    Inconnu,
}

impl StatutLivraison {
    /// Whether the parcel has left the warehouse but not yet arrived.
    #[must_use]
    pub const fn est_en_transit(self) -> bool {
        matches!(self, Self::Expediee | Self::EnCours)
    }
}

/// Payment (paiement) status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatutPaiement {
    #[default]
    EnAttente,
    Reussi,
    Echoue,
    Annule,
    Rembourse,
    #[serde(other)]
    Inconnu,
}

/// Return request (retour) status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatutRetour {
    #[default]
    EnAttente,
    Approuve,
    Refuse,
    Recu,
    Rembourse,
    #[serde(other)]
    Inconnu,
}

/// Review (avis) moderation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatutAvis {
    #[default]
    EnAttente,
    Approuve,
    Rejete,
    #[serde(other)]
    Inconnu,
}

/// Payment method offered at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodePaiement {
    Carte,
    MobileMoney,
    Virement,
    PaiementLivraison,
    #[serde(other)]
    Inconnu,
}

serde_label!(StatutCommande);
serde_label!(StatutLivraison);
serde_label!(StatutPaiement);
serde_label!(StatutRetour);
serde_label!(StatutAvis);
serde_label!(MethodePaiement);
