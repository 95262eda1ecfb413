//! Product records.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, de::Error};
use serde_json::Value;
use texpress_core::{CategorieId, ProduitId};

use super::Categorie;
use super::de::flexible_bool;

/// A catalogue product as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Produit {
    pub id: ProduitId,
    pub nom: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub prix: Decimal,
    #[serde(default)]
    pub prix_promo: Option<Decimal>,
    /// Storage paths of the gallery, in display order.
    #[serde(default, deserialize_with = "image_list")]
    pub images: Vec<String>,
    #[serde(default)]
    pub image_principale: Option<String>,
    #[serde(default)]
    pub note_moyenne: Option<Decimal>,
    #[serde(default)]
    pub nombre_avis: u32,
    #[serde(default)]
    pub categorie_id: Option<CategorieId>,
    #[serde(default)]
    pub categorie: Option<Categorie>,
    /// Units on hand, when the endpoint includes it.
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub en_vedette: bool,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub est_nouveau: bool,
}

impl Produit {
    /// The price the customer pays: the promotional price when it is set
    /// and lower than the list price.
    #[must_use]
    pub fn prix_effectif(&self) -> Decimal {
        self.prix_promo
            .filter(|promo| *promo < self.prix)
            .unwrap_or(self.prix)
    }

    /// Whether a valid promotional price applies.
    #[must_use]
    pub fn est_en_promo(&self) -> bool {
        self.prix_effectif() < self.prix
    }

    /// Whether the product can be added to the cart. Unknown stock counts
    /// as available; the API enforces the real limit.
    #[must_use]
    pub fn est_disponible(&self) -> bool {
        self.stock.is_none_or(|units| units > 0)
    }
}

/// Admin create/update payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProduitInput {
    pub nom: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub prix: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prix_promo: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorie_id: Option<CategorieId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_principale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    pub en_vedette: bool,
}

/// Decode the `images` column.
///
/// The column is stored as serialized JSON, so depending on the model casts
/// it arrives as an array, as a JSON-encoded string, as a bare path, or null.
fn image_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(strings(items)),
        Value::String(raw) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return Ok(Vec::new());
            }
            if raw.starts_with('[') {
                let items: Vec<Value> = serde_json::from_str(raw)
                    .map_err(|e| D::Error::custom(format!("invalid images list: {e}")))?;
                return Ok(strings(items));
            }
            Ok(vec![raw.to_string()])
        }
        other => Err(D::Error::custom(format!("invalid images list: {other}"))),
    }
}

fn strings(items: Vec<Value>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::tests::produit_fixture;

    fn decode(images: Value) -> Vec<String> {
        let produit: Produit = serde_json::from_value(json!({
            "id": 1,
            "nom": "Boubou brodé",
            "prix": "25000.00",
            "images": images
        }))
        .unwrap();
        produit.images
    }

    #[test]
    fn test_images_accepts_array() {
        assert_eq!(decode(json!(["a.png", "b.png"])), vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_images_accepts_serialized_string() {
        assert_eq!(decode(json!("[\"a.png\",\"b.png\"]")), vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_images_accepts_bare_path_and_null() {
        assert_eq!(decode(json!("produits/a.png")), vec!["produits/a.png"]);
        assert!(decode(Value::Null).is_empty());
        assert!(decode(json!("")).is_empty());
    }

    #[test]
    fn test_images_skips_non_strings() {
        assert_eq!(decode(json!(["a.png", null, 3, ""])), vec!["a.png"]);
    }

    #[test]
    fn test_numeric_and_string_prices_decode() {
        let produit: Produit = serde_json::from_value(json!({
            "id": 2, "nom": "Pagne", "prix": 12000, "prix_promo": "9500.50",
            "en_vedette": 1
        }))
        .unwrap();
        assert_eq!(produit.prix, Decimal::from(12_000));
        assert_eq!(produit.prix_promo, Some(Decimal::new(950_050, 2)));
        assert!(produit.en_vedette);
    }

    #[test]
    fn test_prix_effectif_ignores_promo_not_lower() {
        let mut produit = produit_fixture(1, 10_000);
        produit.prix_promo = Some(Decimal::from(12_000));
        assert_eq!(produit.prix_effectif(), Decimal::from(10_000));
        assert!(!produit.est_en_promo());

        produit.prix_promo = Some(Decimal::from(8_000));
        assert_eq!(produit.prix_effectif(), Decimal::from(8_000));
        assert!(produit.est_en_promo());
    }

    #[test]
    fn test_unknown_stock_counts_as_available() {
        let mut produit = produit_fixture(1, 1);
        assert!(produit.est_disponible());
        produit.stock = Some(0);
        assert!(!produit.est_disponible());
    }
}
