//! Domain services for the T-Express API.
//!
//! One service per resource. Each operation takes typed input, posts it
//! through the shared [`ApiClient`], unwraps the response envelope and
//! returns a typed record. Only [`AuthService`] has side effects (it owns
//! the session); the others are stateless apart from the category cache.

pub mod adresse;
pub mod auth;
pub mod avis;
pub mod catalogue;
pub mod categorie;
pub mod client;
pub mod commande;
pub mod favoris;
pub mod hero;
pub mod livraison;
pub mod paiement;
pub mod panier;
pub mod produit;
pub mod retour;
pub mod stock;

use serde::Serialize;
use serde_json::Value;

pub use adresse::AdresseService;
pub use auth::{AuthError, AuthService};
pub use avis::AvisService;
pub use catalogue::{CataloguePage, CatalogueService, Pagination, SearchFilters, Tri};
pub use categorie::CategorieService;
pub use client::ClientService;
pub use commande::CommandeService;
pub use favoris::{Bascule, FavorisService};
pub use hero::HeroService;
pub use livraison::LivraisonService;
pub use paiement::PaiementService;
pub use panier::PanierService;
pub use produit::ProduitService;
pub use retour::{RetourService, TraitementRetour};
pub use stock::StockService;

use crate::api::{ApiClient, ApiError};
use crate::config::Config;

/// Every service, sharing one API client.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub client: ClientService,
    pub catalogue: CatalogueService,
    pub panier: PanierService,
    pub favoris: FavorisService,
    pub adresse: AdresseService,
    pub produit: ProduitService,
    pub categorie: CategorieService,
    pub livraison: LivraisonService,
    pub paiement: PaiementService,
    pub retour: RetourService,
    pub stock: StockService,
    pub avis: AvisService,
    pub hero: HeroService,
    pub commande: CommandeService,
}

impl Services {
    /// Build all services on top of `api`.
    #[must_use]
    pub fn new(api: &ApiClient, config: &Config) -> Self {
        Self {
            auth: AuthService::new(api.clone()),
            client: ClientService::new(api.clone()),
            catalogue: CatalogueService::new(api.clone()),
            panier: PanierService::new(api.clone()),
            favoris: FavorisService::new(api.clone()),
            adresse: AdresseService::new(api.clone()),
            produit: ProduitService::new(api.clone()),
            categorie: CategorieService::new(api.clone(), config.categories_ttl),
            livraison: LivraisonService::new(api.clone()),
            paiement: PaiementService::new(api.clone()),
            retour: RetourService::new(api.clone()),
            stock: StockService::new(api.clone()),
            avis: AvisService::new(api.clone()),
            hero: HeroService::new(api.clone()),
            commande: CommandeService::new(api.clone()),
        }
    }
}

/// Serialize `payload` and add the target id under `key`.
///
/// Update endpoints take the record id next to the edited fields.
pub(crate) fn with_id<B, I>(payload: &B, key: &str, id: I) -> Result<Value, ApiError>
where
    B: Serialize + ?Sized,
    I: Serialize,
{
    let mut value = serde_json::to_value(payload)?;
    let Some(object) = value.as_object_mut() else {
        return Err(ApiError::Decode(format!(
            "cannot attach `{key}` to a non-object payload"
        )));
    };
    object.insert(key.to_string(), serde_json::to_value(id)?);
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use texpress_core::CategorieId;

    use super::*;
    use crate::types::CategorieInput;

    #[test]
    fn test_with_id_merges_key() {
        let input = CategorieInput {
            nom: "Pagnes".to_string(),
            ..CategorieInput::default()
        };
        let payload = with_id(&input, "categorie_id", CategorieId::new(9)).unwrap();
        assert_eq!(payload, json!({ "nom": "Pagnes", "categorie_id": 9 }));
    }

    #[test]
    fn test_with_id_rejects_non_object() {
        assert!(with_id(&[1, 2], "id", 1).is_err());
    }
}
