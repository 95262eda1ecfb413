//! Home page hero banners.

use serde::Serialize;
use serde_json::{Value, json};
use texpress_core::HeroSectionId;
use tracing::instrument;

use super::with_id;
use crate::api::{ApiClient, ApiError, RequestOptions, envelope};
use crate::types::{HeroSection, HeroSectionInput};

/// Hero banner service.
#[derive(Clone)]
pub struct HeroService {
    client: ApiClient,
}

impl HeroService {
    /// Create a new hero banner service.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Slides to show on the home page, in display order.
    ///
    /// The public endpoint already filters, but inactive rows are dropped
    /// again so a stale API cache never shows a disabled slide.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn actives(&self) -> Result<Vec<HeroSection>, ApiError> {
        let mut body: Value = self
            .client
            .post("hero-sections", &json!({}), RequestOptions::public())
            .await?;
        Ok(actives(envelope::list(&mut body, "hero_sections")?))
    }

    /// Every slide (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn liste(&self) -> Result<Vec<HeroSection>, ApiError> {
        let mut body: Value = self
            .client
            .get("admin/hero-sections", RequestOptions::authenticated().fresh())
            .await?;
        envelope::list(&mut body, "hero_sections")
    }

    /// Create a slide (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the slide or the request fails.
    #[instrument(skip(self, section), fields(titre = %section.titre))]
    pub async fn ajouter(&self, section: &HeroSectionInput) -> Result<HeroSection, ApiError> {
        self.call("admin/hero-sections/ajouter", section).await
    }

    /// Update a slide (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API rejects the slide or the request fails.
    #[instrument(skip(self, section), fields(hero_section_id = %id))]
    pub async fn modifier(
        &self,
        id: HeroSectionId,
        section: &HeroSectionInput,
    ) -> Result<HeroSection, ApiError> {
        let payload = with_id(section, "hero_section_id", id)?;
        self.call("admin/hero-sections/modifier", &payload).await
    }

    /// Delete a slide (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(hero_section_id = %id))]
    pub async fn supprimer(&self, id: HeroSectionId) -> Result<Option<String>, ApiError> {
        let body: Value = self
            .client
            .post(
                "admin/hero-sections/supprimer",
                &json!({ "hero_section_id": id }),
                RequestOptions::authenticated(),
            )
            .await?;
        Ok(envelope::message(&body))
    }

    async fn call<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        payload: &B,
    ) -> Result<HeroSection, ApiError> {
        let mut body: Value = self
            .client
            .post(endpoint, payload, RequestOptions::authenticated())
            .await?;
        envelope::field(&mut body, "hero_section")
    }
}

/// Keep active slides, sorted by `ordre`. Ties keep their API order.
#[must_use]
pub fn actives(sections: Vec<HeroSection>) -> Vec<HeroSection> {
    let mut actives: Vec<HeroSection> = sections.into_iter().filter(|s| s.actif).collect();
    actives.sort_by_key(|s| s.ordre);
    actives
}
