//! `tx-cli panier` - cart operations through the cart store.

use clap::Subcommand;
use texpress_core::{LignePanierId, ProduitId};
use texpress_storefront::AppContext;
use texpress_storefront::types::PanierContenu;

use super::require_session;
use crate::error::CliError;
use crate::output;

#[derive(Subcommand)]
pub enum PanierAction {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        produit: i64,
        #[arg(short, long, default_value_t = 1)]
        quantite: u32,
    },
    /// Change a line's quantity
    Update { ligne: i64, quantite: u32 },
    /// Remove a line
    Remove { ligne: i64 },
    /// Remove every line
    Clear,
}

pub async fn run(ctx: &AppContext, action: PanierAction) -> Result<(), CliError> {
    require_session(ctx)?;
    let panier = ctx.panier();

    let contenu = match action {
        PanierAction::Show => panier.refresh().await?,
        PanierAction::Add { produit, quantite } => {
            panier.ajouter(ProduitId::new(produit), quantite).await?
        }
        PanierAction::Update { ligne, quantite } => {
            panier.modifier(LignePanierId::new(ligne), quantite).await?
        }
        PanierAction::Remove { ligne } => panier.supprimer(LignePanierId::new(ligne)).await?,
        PanierAction::Clear => panier.vider().await?,
    };

    summary(ctx, &contenu);
    Ok(())
}

fn summary(ctx: &AppContext, contenu: &PanierContenu) {
    if contenu.est_vide() {
        output::line("Panier vide");
        return;
    }
    let currency = ctx.config().currency;
    for ligne in &contenu.lignes {
        let nom = ligne
            .produit
            .as_ref()
            .map_or_else(|| ligne.produit_id.to_string(), |p| p.nom.clone());
        output::line(format!(
            "#{} {nom} x{} = {}",
            ligne.id,
            ligne.quantite,
            texpress_core::Price::new(ligne.sous_total, currency)
        ));
    }
    output::line(format!(
        "{} article(s), total {}",
        contenu.nombre_articles,
        texpress_core::Price::new(contenu.total, currency)
    ));
}
