//! `tx-cli catalogue` - browse products.

use clap::Subcommand;
use rust_decimal::Decimal;
use texpress_core::{CategorieId, ProduitId};
use texpress_storefront::AppContext;
use texpress_storefront::adapters::{Product, adapt_produit_to_product};
use texpress_storefront::services::SearchFilters;
use texpress_storefront::types::Produit;

use crate::error::CliError;
use crate::output;

#[derive(Subcommand)]
pub enum CatalogueAction {
    /// Search products
    Search {
        #[arg(short, long)]
        q: Option<String>,
        #[arg(short, long)]
        categorie: Option<i64>,
        #[arg(long)]
        prix_min: Option<Decimal>,
        #[arg(long)]
        prix_max: Option<Decimal>,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 12)]
        per_page: u32,
    },
    /// Show one product with similar ones
    Show { id: i64 },
    /// Featured products
    Featured {
        #[arg(short, long, default_value_t = 8)]
        limit: u32,
    },
    /// Products on promotion
    Promotions {
        #[arg(short, long, default_value_t = 8)]
        limit: u32,
    },
    /// New arrivals
    New {
        #[arg(short, long, default_value_t = 8)]
        limit: u32,
    },
    /// List categories
    Categories,
    /// Active home page banners
    Banners,
}

pub async fn run(ctx: &AppContext, action: CatalogueAction) -> Result<(), CliError> {
    let catalogue = &ctx.services().catalogue;

    match action {
        CatalogueAction::Search {
            q,
            categorie,
            prix_min,
            prix_max,
            page,
            per_page,
        } => {
            let filters = SearchFilters {
                q,
                categorie_id: categorie.map(CategorieId::new),
                prix_min,
                prix_max,
                page: Some(page),
                per_page: Some(per_page),
                ..SearchFilters::default()
            };
            let result = catalogue.rechercher(&filters).await?;
            output::json(&adapt_all(ctx, &result.produits))?;
            if let Some(pagination) = result.pagination {
                output::line(format!(
                    "page {}/{} ({} produits)",
                    pagination.current_page, pagination.last_page, pagination.total
                ));
            }
        }
        CatalogueAction::Show { id } => {
            let produit = catalogue.produit(ProduitId::new(id)).await?;
            let similaires = catalogue.similaires(&produit, 4).await?;
            output::json(&adapt(ctx, &produit))?;
            output::line("Produits similaires :");
            output::json(&adapt_all(ctx, &similaires))?;
        }
        CatalogueAction::Featured { limit } => {
            output::json(&adapt_all(ctx, &catalogue.en_vedette(limit).await?))?;
        }
        CatalogueAction::Promotions { limit } => {
            output::json(&adapt_all(ctx, &catalogue.promotions(limit).await?))?;
        }
        CatalogueAction::New { limit } => {
            output::json(&adapt_all(ctx, &catalogue.nouveautes(limit).await?))?;
        }
        CatalogueAction::Categories => {
            output::json(&ctx.services().categorie.liste().await?)?;
        }
        CatalogueAction::Banners => {
            let mut sections = ctx.services().hero.actives().await?;
            for section in &mut sections {
                section.image = Some(ctx.images().resolve_or_default(section.image.as_deref()));
            }
            output::json(&sections)?;
        }
    }
    Ok(())
}

fn adapt(ctx: &AppContext, produit: &Produit) -> Product {
    adapt_produit_to_product(produit, ctx.images(), ctx.config().currency)
}

fn adapt_all(ctx: &AppContext, produits: &[Produit]) -> Vec<Product> {
    produits.iter().map(|p| adapt(ctx, p)).collect()
}
