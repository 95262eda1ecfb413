//! Catalogue search and product details.
//!
//! Every listing the storefront shows (featured, promotions, new arrivals,
//! category pages) is a parameterised call to [`CatalogueService::rechercher`]
//! so the API remains the single place where filtering happens.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use texpress_core::{CategorieId, ProduitId};
use tracing::instrument;

use crate::api::{ApiClient, ApiError, RequestOptions, envelope};
use crate::types::Produit;

/// Sort orders understood by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tri {
    Pertinence,
    PrixCroissant,
    PrixDecroissant,
    Recent,
    MieuxNotes,
}

/// Search filters. Unset fields are omitted from the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorie_id: Option<CategorieId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prix_min: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prix_max: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub en_vedette: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub en_promo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub est_nouveau: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tri: Option<Tri>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl SearchFilters {
    /// Featured products, `limit` per page.
    #[must_use]
    pub fn featured(limit: u32) -> Self {
        Self {
            en_vedette: Some(true),
            per_page: Some(limit),
            ..Self::default()
        }
    }

    /// Products with an active promotional price.
    #[must_use]
    pub fn promotions(limit: u32) -> Self {
        Self {
            en_promo: Some(true),
            per_page: Some(limit),
            ..Self::default()
        }
    }

    /// Newest products first.
    #[must_use]
    pub fn nouveautes(limit: u32) -> Self {
        Self {
            est_nouveau: Some(true),
            tri: Some(Tri::Recent),
            per_page: Some(limit),
            ..Self::default()
        }
    }

    /// One page of a category.
    #[must_use]
    pub fn categorie(categorie_id: CategorieId, page: u32, per_page: u32) -> Self {
        Self {
            categorie_id: Some(categorie_id),
            page: Some(page),
            per_page: Some(per_page),
            ..Self::default()
        }
    }

    /// Free-text search.
    #[must_use]
    pub fn texte(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Self::default()
        }
    }
}

/// Laravel paginator metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl Pagination {
    /// Whether another page follows this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq)]
pub struct CataloguePage {
    pub produits: Vec<Produit>,
    pub pagination: Option<Pagination>,
}

/// Catalogue service.
#[derive(Clone)]
pub struct CatalogueService {
    client: ApiClient,
}

impl CatalogueService {
    /// Create a new catalogue service.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Search the catalogue.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or the response does not
    /// decode.
    #[instrument(skip(self))]
    pub async fn rechercher(&self, filters: &SearchFilters) -> Result<CataloguePage, ApiError> {
        let mut body: Value = self
            .client
            .post("catalogue/rechercher", filters, RequestOptions::public())
            .await?;

        let pagination = match envelope::optional_field(&mut body, "pagination")? {
            Some(pagination) => Some(pagination),
            None => paginator_meta(&body),
        };
        let produits = envelope::list(&mut body, "produits")?;

        Ok(CataloguePage {
            produits,
            pagination,
        })
    }

    /// Full details of one product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 404 if the product does not exist.
    #[instrument(skip(self), fields(produit_id = %produit_id))]
    pub async fn produit(&self, produit_id: ProduitId) -> Result<Produit, ApiError> {
        let mut body: Value = self
            .client
            .post(
                "catalogue/produit",
                &json!({ "produit_id": produit_id }),
                RequestOptions::public(),
            )
            .await?;
        envelope::field(&mut body, "produit")
    }

    /// Featured products for the home page.
    ///
    /// # Errors
    ///
    /// See [`Self::rechercher`].
    pub async fn en_vedette(&self, limit: u32) -> Result<Vec<Produit>, ApiError> {
        Ok(self.rechercher(&SearchFilters::featured(limit)).await?.produits)
    }

    /// Products currently on promotion.
    ///
    /// # Errors
    ///
    /// See [`Self::rechercher`].
    pub async fn promotions(&self, limit: u32) -> Result<Vec<Produit>, ApiError> {
        Ok(self.rechercher(&SearchFilters::promotions(limit)).await?.produits)
    }

    /// New arrivals.
    ///
    /// # Errors
    ///
    /// See [`Self::rechercher`].
    pub async fn nouveautes(&self, limit: u32) -> Result<Vec<Produit>, ApiError> {
        Ok(self.rechercher(&SearchFilters::nouveautes(limit)).await?.produits)
    }

    /// One page of a category listing.
    ///
    /// # Errors
    ///
    /// See [`Self::rechercher`].
    pub async fn par_categorie(
        &self,
        categorie_id: CategorieId,
        page: u32,
        per_page: u32,
    ) -> Result<CataloguePage, ApiError> {
        self.rechercher(&SearchFilters::categorie(categorie_id, page, per_page))
            .await
    }

    /// Products from the same category, excluding `produit` itself.
    ///
    /// Returns an empty list for uncategorised products.
    ///
    /// # Errors
    ///
    /// See [`Self::rechercher`].
    pub async fn similaires(&self, produit: &Produit, limit: u32) -> Result<Vec<Produit>, ApiError> {
        let Some(categorie_id) = produit
            .categorie_id
            .or_else(|| produit.categorie.as_ref().map(|c| c.id))
        else {
            return Ok(Vec::new());
        };

        // One extra row so the limit still holds after removing the product
        let page = self
            .rechercher(&SearchFilters::categorie(categorie_id, 1, limit.saturating_add(1)))
            .await?;

        Ok(page
            .produits
            .into_iter()
            .filter(|p| p.id != produit.id)
            .take(limit as usize)
            .collect())
    }
}

/// Pagination fields Laravel puts next to `data` inside the collection.
fn paginator_meta(body: &Value) -> Option<Pagination> {
    let produits = body.get("produits")?;
    produits.get("data")?;
    serde_json::from_value(produits.clone()).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_featured_matches_explicit_filters() {
        let explicit = SearchFilters {
            en_vedette: Some(true),
            per_page: Some(10),
            ..SearchFilters::default()
        };
        assert_eq!(SearchFilters::featured(10), explicit);
        assert_eq!(
            serde_json::to_value(SearchFilters::featured(10)).unwrap(),
            json!({ "en_vedette": true, "per_page": 10 })
        );
    }

    #[test]
    fn test_default_filters_serialize_to_empty_object() {
        assert_eq!(
            serde_json::to_value(SearchFilters::default()).unwrap(),
            json!({})
        );
    }

    #[test]
    fn test_nouveautes_sorts_by_recent() {
        assert_eq!(
            serde_json::to_value(SearchFilters::nouveautes(4)).unwrap(),
            json!({ "est_nouveau": true, "tri": "recent", "per_page": 4 })
        );
    }

    #[test]
    fn test_paginator_meta_reads_nested_fields() {
        let body = json!({
            "produits": { "data": [], "current_page": 2, "last_page": 5, "per_page": 12, "total": 55 }
        });
        let meta = paginator_meta(&body).unwrap();
        assert_eq!(meta.current_page, 2);
        assert!(meta.has_next());
        assert!(paginator_meta(&json!({ "produits": [] })).is_none());
    }
}
