//! `tx-cli admin` - back-office listings and moderation.
//!
//! Every command needs a session whose client has the admin role; the API
//! answers 403 otherwise.

use clap::Subcommand;
use rust_decimal::Decimal;
use texpress_core::{AvisId, LivraisonId, ProduitId, RetourId, StatutAvis, StatutLivraison, StatutRetour};
use texpress_storefront::AppContext;
use texpress_storefront::services::{TraitementRetour, avis, commande, livraison, paiement, retour};
use texpress_storefront::types::AjustementStock;
use tracing::warn;

use super::require_session;
use crate::error::CliError;
use crate::output;

#[derive(Subcommand)]
pub enum AdminAction {
    /// Customer accounts
    Clients,
    /// Orders, optionally filtered by status
    Commandes {
        #[arg(short, long)]
        statut: Option<texpress_core::StatutCommande>,
    },
    /// Stock levels
    Stocks {
        /// Only products at or below their alert threshold
        #[arg(long)]
        alertes: bool,
    },
    /// Apply a signed stock delta
    AdjustStock {
        produit: i64,
        #[arg(allow_negative_numbers = true)]
        delta: i64,
        #[arg(short, long)]
        motif: Option<String>,
    },
    /// Return requests
    Retours {
        #[arg(long)]
        en_attente: bool,
    },
    /// Decide on a return request
    TraiterRetour {
        id: i64,
        #[arg(short, long)]
        statut: StatutRetour,
        #[arg(short, long)]
        commentaire: Option<String>,
        #[arg(long)]
        montant: Option<Decimal>,
    },
    /// Reviews
    Avis {
        #[arg(long)]
        en_attente: bool,
    },
    /// Approve or reject a review
    Moderer {
        id: i64,
        #[arg(short, long)]
        statut: StatutAvis,
    },
    /// Deliveries
    Livraisons {
        #[arg(long)]
        en_cours: bool,
    },
    /// Move a delivery to a new status
    Expedier {
        id: i64,
        #[arg(short, long)]
        statut: StatutLivraison,
        #[arg(short, long)]
        numero_suivi: Option<String>,
    },
    /// Payments
    Paiements {
        #[arg(long)]
        echoues: bool,
    },
    /// All products, including inactive ones
    Produits,
    /// Delete a product
    SupprimerProduit { id: i64 },
    /// Hero banners
    Banners,
}

pub async fn run(ctx: &AppContext, action: AdminAction) -> Result<(), CliError> {
    require_session(ctx)?;
    if !ctx.auth().client().is_some_and(|c| c.est_admin()) {
        warn!("Signed-in client is not an admin, the API will probably refuse");
    }
    let services = ctx.services();

    match action {
        AdminAction::Clients => output::json(&services.client.liste().await?)?,
        AdminAction::Commandes { statut } => {
            let commandes = services.commande.liste().await?;
            match statut {
                Some(statut) => output::json(&commande::par_statut(commandes, statut))?,
                None => output::json(&commandes)?,
            }
        }
        AdminAction::Stocks { alertes } => {
            if alertes {
                output::json(&services.stock.alertes().await?)?;
            } else {
                output::json(&services.stock.liste().await?)?;
            }
        }
        AdminAction::AdjustStock {
            produit,
            delta,
            motif,
        } => {
            let ajustement = AjustementStock {
                produit_id: ProduitId::new(produit),
                quantite: delta,
                motif,
            };
            output::json(&services.stock.ajuster(&ajustement).await?)?;
        }
        AdminAction::Retours { en_attente } => {
            let retours = services.retour.liste().await?;
            if en_attente {
                output::json(&retour::en_attente(retours))?;
            } else {
                output::json(&retours)?;
            }
        }
        AdminAction::TraiterRetour {
            id,
            statut,
            commentaire,
            montant,
        } => {
            let traitement = TraitementRetour {
                retour_id: RetourId::new(id),
                statut,
                commentaire_admin: commentaire,
                montant_rembourse: montant,
            };
            output::json(&services.retour.traiter(&traitement).await?)?;
        }
        AdminAction::Avis { en_attente } => {
            let liste = services.avis.liste().await?;
            if en_attente {
                output::json(&avis::en_attente(liste))?;
            } else {
                output::json(&liste)?;
            }
        }
        AdminAction::Moderer { id, statut } => {
            output::json(&services.avis.moderer(AvisId::new(id), statut).await?)?;
        }
        AdminAction::Livraisons { en_cours } => {
            let livraisons = services.livraison.liste().await?;
            if en_cours {
                output::json(&livraison::en_cours(livraisons))?;
            } else {
                output::json(&livraisons)?;
            }
        }
        AdminAction::Expedier {
            id,
            statut,
            numero_suivi,
        } => {
            let livraison = services
                .livraison
                .changer_statut(LivraisonId::new(id), statut, numero_suivi.as_deref())
                .await?;
            output::json(&livraison)?;
        }
        AdminAction::Paiements { echoues } => {
            let paiements = services.paiement.liste().await?;
            if echoues {
                output::json(&paiement::echoues(paiements))?;
            } else {
                output::json(&paiements)?;
            }
        }
        AdminAction::Produits => output::json(&services.produit.liste().await?)?,
        AdminAction::SupprimerProduit { id } => {
            let message = services.produit.supprimer(ProduitId::new(id)).await?;
            output::line(message.unwrap_or_else(|| format!("Produit {id} supprimé")));
        }
        AdminAction::Banners => output::json(&services.hero.liste().await?)?,
    }
    Ok(())
}
