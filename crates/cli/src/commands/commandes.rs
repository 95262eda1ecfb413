//! `tx-cli commandes` - checkout, history, tracking and returns.

use clap::Subcommand;
use texpress_core::{AdresseId, CommandeId, MethodePaiement, PaiementId};
use texpress_storefront::AppContext;
use texpress_storefront::types::{DemandeRetour, PasserCommande};
use tracing::info;

use super::require_session;
use crate::error::CliError;
use crate::output;

#[derive(Subcommand)]
pub enum CommandeAction {
    /// List my orders
    List,
    /// Show one order
    Show { id: i64 },
    /// Turn the cart into an order
    Checkout {
        #[arg(short, long)]
        adresse: i64,
        /// carte, mobile_money, virement or paiement_livraison
        #[arg(short, long, default_value = "mobile_money")]
        methode: MethodePaiement,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Cancel an order
    Cancel { id: i64 },
    /// Delivery tracking for an order
    Track { id: i64 },
    /// Start or check a payment
    Pay {
        id: i64,
        #[arg(short, long, default_value = "mobile_money")]
        methode: MethodePaiement,
    },
    /// Check a payment's status
    PaymentStatus { paiement: i64 },
    /// Ask to return an order
    Return {
        id: i64,
        #[arg(short, long)]
        motif: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List my return requests
    Returns,
    /// List my saved addresses
    Addresses,
}

pub async fn run(ctx: &AppContext, action: CommandeAction) -> Result<(), CliError> {
    require_session(ctx)?;
    let services = ctx.services();

    match action {
        CommandeAction::List => output::json(&services.commande.mes_commandes().await?)?,
        CommandeAction::Show { id } => {
            output::json(&services.commande.details(CommandeId::new(id)).await?)?;
        }
        CommandeAction::Checkout {
            adresse,
            methode,
            notes,
        } => {
            let commande = services
                .commande
                .passer(&PasserCommande {
                    adresse_id: AdresseId::new(adresse),
                    methode_paiement: methode,
                    mode_livraison: None,
                    notes,
                })
                .await?;
            // The API emptied the cart
            if let Err(e) = ctx.panier().refresh().await {
                tracing::warn!(error = %e, "Cart refresh after checkout failed");
            }
            info!(commande_id = %commande.id, "Order placed");
            output::json(&commande)?;
        }
        CommandeAction::Cancel { id } => {
            output::json(&services.commande.annuler(CommandeId::new(id)).await?)?;
        }
        CommandeAction::Track { id } => {
            output::json(&services.livraison.suivi(CommandeId::new(id)).await?)?;
        }
        CommandeAction::Pay { id, methode } => {
            let paiement = services
                .paiement
                .initier(CommandeId::new(id), methode)
                .await?;
            if let Some(url) = &paiement.url_paiement {
                output::line(format!("Finaliser le paiement : {url}"));
            }
            output::json(&paiement)?;
        }
        CommandeAction::PaymentStatus { paiement } => {
            output::json(&services.paiement.verifier(PaiementId::new(paiement)).await?)?;
        }
        CommandeAction::Return {
            id,
            motif,
            description,
        } => {
            let demande = DemandeRetour {
                commande_id: CommandeId::new(id),
                motif,
                description,
            };
            output::json(&services.retour.demander(&demande).await?)?;
        }
        CommandeAction::Returns => output::json(&services.retour.mes_retours().await?)?,
        CommandeAction::Addresses => {
            for adresse in services.adresse.liste().await? {
                let marque = if adresse.est_defaut { "*" } else { " " };
                output::line(format!("{marque} #{} {}", adresse.id, adresse.une_ligne()));
            }
        }
    }
    Ok(())
}
