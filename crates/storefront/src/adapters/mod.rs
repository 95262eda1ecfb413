//! View adapters: API records to UI-facing shapes.
//!
//! Adapters are pure. They take the storage layout and currency as inputs
//! and never touch the network.

pub mod product;

pub use product::{Image, Product, ProductRating, adapt_produit_to_product};

use crate::config::StorageConfig;

/// Turns storage paths returned by the API into public URLs.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    base_url: String,
    default_image: String,
}

impl ImageResolver {
    #[must_use]
    pub fn new(storage: &StorageConfig) -> Self {
        Self {
            base_url: storage.base_url.trim_end_matches('/').to_string(),
            default_image: storage.default_image.clone(),
        }
    }

    /// Public URL for a stored file.
    ///
    /// Absolute and protocol-relative URLs are returned unchanged; anything
    /// else is treated as a path on the public `storage` disk. Blank input
    /// resolves to `None`.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<String> {
        let path = path.trim();
        if path.is_empty() {
            return None;
        }
        if is_absolute(path) {
            return Some(path.to_string());
        }

        let relative = path.trim_start_matches('/');
        let relative = relative.strip_prefix("storage/").unwrap_or(relative);
        Some(format!("{}/storage/{relative}", self.base_url))
    }

    /// The placeholder shown when a record has no image.
    #[must_use]
    pub fn default_image(&self) -> &str {
        &self.default_image
    }

    /// [`Self::resolve`], falling back to the placeholder.
    #[must_use]
    pub fn resolve_or_default(&self, path: Option<&str>) -> String {
        path.and_then(|p| self.resolve(p))
            .unwrap_or_else(|| self.default_image.clone())
    }
}

fn is_absolute(path: &str) -> bool {
    let lower = path.get(..8).unwrap_or(path).to_ascii_lowercase();
    lower.starts_with("http://")
        || lower.starts_with("https://")
        || lower.starts_with("data:")
        || path.starts_with("//")
}
