//! Home page hero banners.

use serde::{Deserialize, Serialize};
use texpress_core::HeroSectionId;

use super::de::flexible_bool;

/// A hero banner slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroSection {
    pub id: HeroSectionId,
    pub titre: String,
    #[serde(default)]
    pub sous_titre: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub lien: Option<String>,
    #[serde(default)]
    pub texte_bouton: Option<String>,
    #[serde(default)]
    pub ordre: i32,
    #[serde(default, deserialize_with = "flexible_bool")]
    pub actif: bool,
}

/// Admin create/update payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeroSectionInput {
    pub titre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sous_titre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lien: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texte_bouton: Option<String>,
    pub ordre: i32,
    pub actif: bool,
}
