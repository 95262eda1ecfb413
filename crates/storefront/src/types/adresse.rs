//! Delivery addresses.

use serde::{Deserialize, Serialize};
use texpress_core::AdresseId;

use super::de::flexible_bool;

/// A saved delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adresse {
    pub id: AdresseId,
    #[serde(default)]
    pub libelle: Option<String>,
    #[serde(default)]
    pub nom_destinataire: Option<String>,
    #[serde(default)]
    pub telephone: Option<String>,
    pub adresse: String,
    pub ville: String,
    #[serde(default)]
    pub quartier: Option<String>,
    #[serde(default)]
    pub code_postal: Option<String>,
    #[serde(default)]
    pub pays: Option<String>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub est_defaut: bool,
}

impl Adresse {
    /// Single-line rendering for order summaries.
    #[must_use]
    pub fn une_ligne(&self) -> String {
        [
            Some(self.adresse.as_str()),
            self.quartier.as_deref(),
            Some(self.ville.as_str()),
            self.pays.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Create/update payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdresseInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub libelle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom_destinataire: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
    pub adresse: String,
    pub ville: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quartier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_postal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pays: Option<String>,
    pub est_defaut: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_une_ligne_skips_missing_parts() {
        let adresse = Adresse {
            id: AdresseId::new(1),
            libelle: None,
            nom_destinataire: None,
            telephone: None,
            adresse: "12 rue Carnot".to_string(),
            ville: "Dakar".to_string(),
            quartier: Some(String::new()),
            code_postal: None,
            pays: Some("Sénégal".to_string()),
            est_defaut: true,
        };
        assert_eq!(adresse.une_ligne(), "12 rue Carnot, Dakar, Sénégal");
    }
}
