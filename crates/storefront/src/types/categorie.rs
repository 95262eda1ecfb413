//! Product categories.

use serde::{Deserialize, Serialize};
use texpress_core::CategorieId;

/// A catalogue category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categorie {
    pub id: CategorieId,
    pub nom: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub parent_id: Option<CategorieId>,
    #[serde(default)]
    pub produits_count: Option<u32>,
}

/// Admin create/update payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategorieInput {
    pub nom: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CategorieId>,
}
