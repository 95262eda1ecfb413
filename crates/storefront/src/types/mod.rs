//! Records exchanged with the T-Express API.
//!
//! These mirror the JSON the API produces. Field names stay in the API's
//! French vocabulary so that `serde` needs no renaming; the view adapters
//! translate them into UI-facing shapes.

pub mod adresse;
pub mod avis;
pub mod categorie;
pub mod client;
pub mod commande;
pub mod favori;
pub mod hero;
pub mod livraison;
pub mod paiement;
pub mod panier;
pub mod produit;
pub mod retour;
pub mod stock;

pub use adresse::{Adresse, AdresseInput};
pub use avis::{Avis, NouvelAvis};
pub use categorie::{Categorie, CategorieInput};
pub use client::{Client, Inscription, MiseAJourProfil};
pub use commande::{Commande, LigneCommande, PasserCommande};
pub use favori::Favori;
pub use hero::{HeroSection, HeroSectionInput};
pub use livraison::Livraison;
pub use paiement::Paiement;
pub use panier::{LignePanier, PanierContenu};
pub use produit::{Produit, ProduitInput};
pub use retour::{DemandeRetour, RetourCommande};
pub use stock::{AjustementStock, NiveauStock, Stock};

/// Lenient deserializers for values the API encodes inconsistently.
pub(crate) mod de {
    use serde::{Deserialize, Deserializer, de::Error};
    use serde_json::Value;

    /// Accept `true`/`false`, `0`/`1` and their string forms.
    ///
    /// MySQL-backed Laravel models return `tinyint` columns as integers
    /// unless the model casts them.
    pub fn flexible_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Bool(b) => Ok(b),
            Value::Null => Ok(false),
            Value::Number(n) => Ok(n.as_i64().is_some_and(|v| v != 0)),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "oui" => Ok(true),
                "0" | "false" | "non" | "" => Ok(false),
                other => Err(D::Error::custom(format!("invalid boolean: {other}"))),
            },
            other => Err(D::Error::custom(format!("invalid boolean: {other}"))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use rust_decimal::Decimal;
    use serde::Deserialize;
    use serde_json::json;
    use texpress_core::{ClientId, ProduitId};

    use super::*;

    pub(crate) fn client_fixture(id: i64) -> Client {
        Client {
            id: ClientId::new(id),
            nom: "Diop".to_string(),
            prenom: Some("Awa".to_string()),
            email: "awa.diop@t-express.sn".to_string(),
            telephone: None,
            role: None,
            created_at: None,
        }
    }

    pub(crate) fn produit_fixture(id: i64, prix: i64) -> Produit {
        Produit {
            id: ProduitId::new(id),
            nom: format!("Produit {id}"),
            slug: None,
            description: None,
            prix: Decimal::from(prix),
            prix_promo: None,
            images: Vec::new(),
            image_principale: None,
            note_moyenne: None,
            nombre_avis: 0,
            categorie_id: None,
            categorie: None,
            stock: None,
            en_vedette: false,
            est_nouveau: false,
        }
    }

    #[derive(Deserialize)]
    struct Flag {
        #[serde(deserialize_with = "de::flexible_bool")]
        actif: bool,
    }

    #[test]
    fn test_flexible_bool() {
        for (raw, expected) in [
            (json!(true), true),
            (json!(1), true),
            (json!("1"), true),
            (json!(0), false),
            (json!("false"), false),
            (json!(null), false),
        ] {
            let flag: Flag = serde_json::from_value(json!({ "actif": raw })).unwrap();
            assert_eq!(flag.actif, expected);
        }
        assert!(serde_json::from_value::<Flag>(json!({ "actif": "peut-etre" })).is_err());
    }
}
