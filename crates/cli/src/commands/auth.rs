//! `tx-cli auth` - sign in, sign out and profile.

use clap::Subcommand;
use texpress_core::Email;
use texpress_storefront::AppContext;
use texpress_storefront::types::{Inscription, MiseAJourProfil};
use tracing::info;

use super::{read_secret, require_session};
use crate::error::CliError;
use crate::output;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in; the password is read from stdin
    Login {
        #[arg(short, long)]
        email: String,
    },
    /// Create an account; the password is read from stdin
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        nom: String,
        #[arg(short, long)]
        prenom: Option<String>,
        #[arg(short, long)]
        telephone: Option<String>,
    },
    /// Sign out and forget the local session
    Logout,
    /// Show the signed-in client, refreshed from the API
    Whoami,
    /// Update profile fields
    Update {
        #[arg(long)]
        nom: Option<String>,
        #[arg(long)]
        prenom: Option<String>,
        #[arg(long)]
        telephone: Option<String>,
    },
    /// Change the password; reads the current then the new password from stdin
    Password,
}

pub async fn run(ctx: &AppContext, action: AuthAction) -> Result<(), CliError> {
    let auth = ctx.auth();

    match action {
        AuthAction::Login { email } => {
            let password = read_secret("password")?;
            let client = auth.connexion(&email, &password).await?;
            info!(client_id = %client.id, "Signed in");
            output::line(format!("Connecté en tant que {}", client.nom_complet()));
        }
        AuthAction::Register {
            email,
            nom,
            prenom,
            telephone,
        } => {
            let form = Inscription {
                nom,
                prenom,
                email: Email::parse(&email)?,
                telephone,
                password: read_secret("password")?,
            };
            let client = auth.inscription(&form).await?;
            output::line(format!("Compte créé pour {}", client.nom_complet()));
        }
        AuthAction::Logout => {
            auth.deconnexion().await;
            output::line("Déconnecté");
        }
        AuthAction::Whoami => {
            require_session(ctx)?;
            let client = auth.rafraichir_profil().await?;
            output::json(&client)?;
        }
        AuthAction::Update {
            nom,
            prenom,
            telephone,
        } => {
            require_session(ctx)?;
            let update = MiseAJourProfil {
                nom,
                prenom,
                telephone,
                ..MiseAJourProfil::default()
            };
            let client = auth.modifier_profil(&update).await?;
            output::json(&client)?;
        }
        AuthAction::Password => {
            require_session(ctx)?;
            let actuel = read_secret("current password")?;
            let nouveau = read_secret("new password")?;
            let message = ctx
                .services()
                .client
                .changer_mot_de_passe(&actuel, &nouveau)
                .await?;
            output::line(message.unwrap_or_else(|| "Mot de passe modifié".to_string()));
        }
    }
    Ok(())
}
