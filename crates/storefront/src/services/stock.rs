//! Inventory.

use serde_json::{Value, json};
use texpress_core::ProduitId;
use tracing::instrument;

use crate::api::{ApiClient, ApiError, RequestOptions, envelope};
use crate::types::{AjustementStock, Stock};

/// Stock service.
#[derive(Clone)]
pub struct StockService {
    client: ApiClient,
}

impl StockService {
    /// Create a new stock service.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Current stock of one product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(produit_id = %produit_id))]
    pub async fn verifier(&self, produit_id: ProduitId) -> Result<Stock, ApiError> {
        let mut body: Value = self
            .client
            .post(
                "stock/produit",
                &json!({ "produit_id": produit_id }),
                RequestOptions::public().fresh(),
            )
            .await?;
        envelope::field(&mut body, "stock")
    }

    /// Stock of every product (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn liste(&self) -> Result<Vec<Stock>, ApiError> {
        let mut body: Value = self
            .client
            .get("admin/stocks", RequestOptions::authenticated().fresh())
            .await?;
        envelope::list(&mut body, "stocks")
    }

    /// Products at or below their alert threshold (admin).
    ///
    /// # Errors
    ///
    /// See [`Self::liste`].
    pub async fn alertes(&self) -> Result<Vec<Stock>, ApiError> {
        Ok(alertes(self.liste().await?))
    }

    /// Apply a signed quantity delta (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the adjustment would go negative or the request
    /// fails.
    #[instrument(skip(self, ajustement), fields(produit_id = %ajustement.produit_id, delta = ajustement.quantite))]
    pub async fn ajuster(&self, ajustement: &AjustementStock) -> Result<Stock, ApiError> {
        let mut body: Value = self
            .client
            .post(
                "admin/stocks/ajuster",
                ajustement,
                RequestOptions::authenticated(),
            )
            .await?;
        envelope::field(&mut body, "stock")
    }
}

/// Keep stock at or below its alert threshold, lowest quantity first.
#[must_use]
pub fn alertes(stocks: Vec<Stock>) -> Vec<Stock> {
    let mut alertes: Vec<Stock> = stocks.into_iter().filter(Stock::est_en_alerte).collect();
    alertes.sort_by_key(|s| s.quantite);
    alertes
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_alertes_includes_threshold_and_sorts() {
        let stocks: Vec<Stock> = serde_json::from_value(json!([
            { "produit_id": 1, "quantite": 40, "seuil_alerte": 10 },
            { "produit_id": 2, "quantite": 10, "seuil_alerte": 10 },
            { "produit_id": 3, "quantite": 0 },
            { "produit_id": 4, "quantite": 6 }
        ]))
        .unwrap();
        let ids: Vec<i64> = alertes(stocks)
            .iter()
            .map(|s| s.produit_id.as_i64())
            .collect();
        assert_eq!(ids, vec![3, 2]);
    }
}
