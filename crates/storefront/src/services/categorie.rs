//! Categories, with an in-memory cache.
//!
//! The category tree changes rarely and is requested by every page, so the
//! public list is cached with `moka` (TTL from `TEXPRESS_CATEGORIES_TTL_SECS`).
//! Admin mutations invalidate the cache.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde_json::{Value, json};
use texpress_core::CategorieId;
use tracing::{debug, instrument};

use super::with_id;
use crate::api::{ApiClient, ApiError, RequestOptions, envelope};
use crate::types::{Categorie, CategorieInput};

const CACHE_KEY: &str = "categories";

/// Category service.
#[derive(Clone)]
pub struct CategorieService {
    inner: Arc<CategorieServiceInner>,
}

struct CategorieServiceInner {
    client: ApiClient,
    cache: Cache<&'static str, Arc<Vec<Categorie>>>,
}

impl CategorieService {
    /// Create a new category service caching the list for `ttl`.
    #[must_use]
    pub fn new(client: ApiClient, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();

        Self {
            inner: Arc::new(CategorieServiceInner { client, cache }),
        }
    }

    /// All categories, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache is cold and the API request fails.
    #[instrument(skip(self))]
    pub async fn liste(&self) -> Result<Vec<Categorie>, ApiError> {
        if let Some(categories) = self.inner.cache.get(CACHE_KEY).await {
            debug!("Cache hit for categories");
            return Ok(categories.as_ref().clone());
        }

        let mut body: Value = self
            .inner
            .client
            .post("categories", &json!({}), RequestOptions::public())
            .await?;
        let categories: Vec<Categorie> = envelope::list(&mut body, "categories")?;

        self.inner
            .cache
            .insert(CACHE_KEY, Arc::new(categories.clone()))
            .await;

        Ok(categories)
    }

    /// Look a category up by slug in the cached list.
    ///
    /// # Errors
    ///
    /// See [`Self::liste`].
    pub async fn par_slug(&self, slug: &str) -> Result<Option<Categorie>, ApiError> {
        Ok(self
            .liste()
            .await?
            .into_iter()
            .find(|c| c.slug.as_deref() == Some(slug)))
    }

    /// Create a category (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the category or the request fails.
    #[instrument(skip(self, categorie), fields(nom = %categorie.nom))]
    pub async fn ajouter(&self, categorie: &CategorieInput) -> Result<Categorie, ApiError> {
        let mut body: Value = self
            .inner
            .client
            .post(
                "admin/categories/ajouter",
                categorie,
                RequestOptions::authenticated(),
            )
            .await?;
        self.invalidate().await;
        envelope::field(&mut body, "categorie")
    }

    /// Update a category (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the category or the request fails.
    #[instrument(skip(self, categorie), fields(categorie_id = %categorie_id))]
    pub async fn modifier(
        &self,
        categorie_id: CategorieId,
        categorie: &CategorieInput,
    ) -> Result<Categorie, ApiError> {
        let payload = with_id(categorie, "categorie_id", categorie_id)?;
        let mut body: Value = self
            .inner
            .client
            .post(
                "admin/categories/modifier",
                &payload,
                RequestOptions::authenticated(),
            )
            .await?;
        self.invalidate().await;
        envelope::field(&mut body, "categorie")
    }

    /// Delete a category (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(categorie_id = %categorie_id))]
    pub async fn supprimer(&self, categorie_id: CategorieId) -> Result<Option<String>, ApiError> {
        let body: Value = self
            .inner
            .client
            .post(
                "admin/categories/supprimer",
                &json!({ "categorie_id": categorie_id }),
                RequestOptions::authenticated(),
            )
            .await?;
        self.invalidate().await;
        Ok(envelope::message(&body))
    }

    /// Drop the cached list.
    pub async fn invalidate(&self) {
        debug!("Invalidating category cache");
        self.inner.cache.invalidate(CACHE_KEY).await;
    }
}
