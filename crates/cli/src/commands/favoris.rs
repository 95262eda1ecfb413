//! `tx-cli favoris` - wishlist operations through the wishlist store.

use clap::Subcommand;
use texpress_core::ProduitId;
use texpress_storefront::AppContext;

use super::require_session;
use crate::error::CliError;
use crate::output;

#[derive(Subcommand)]
pub enum FavorisAction {
    /// List the wishlist
    List,
    /// Add or remove a product
    Toggle { produit: i64 },
    /// Remove a product
    Remove { produit: i64 },
}

pub async fn run(ctx: &AppContext, action: FavorisAction) -> Result<(), CliError> {
    require_session(ctx)?;
    let favoris = ctx.favoris();

    match action {
        FavorisAction::List => output::json(&favoris.refresh().await?)?,
        FavorisAction::Toggle { produit } => {
            let produit_id = ProduitId::new(produit);
            if favoris.basculer(produit_id).await? {
                output::line(format!("Produit {produit_id} ajouté aux favoris"));
            } else {
                output::line(format!("Produit {produit_id} retiré des favoris"));
            }
        }
        FavorisAction::Remove { produit } => {
            let message = favoris.retirer(ProduitId::new(produit)).await?;
            output::line(message.unwrap_or_else(|| "Retiré des favoris".to_string()));
        }
    }
    Ok(())
}
