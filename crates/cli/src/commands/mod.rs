//! Subcommands.

pub mod admin;
pub mod auth;
pub mod catalogue;
pub mod commandes;
pub mod favoris;
pub mod panier;

use std::io::BufRead;

use secrecy::SecretString;
use texpress_storefront::AppContext;

pub use admin::AdminAction;
pub use auth::AuthAction;
pub use catalogue::CatalogueAction;
pub use commandes::CommandeAction;
pub use favoris::FavorisAction;
pub use panier::PanierAction;

use crate::error::CliError;

/// Read a secret from the first line of stdin.
fn read_secret(what: &str) -> Result<SecretString, CliError> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let secret = line.trim_end_matches(['\r', '\n']);
    if secret.is_empty() {
        return Err(CliError::Input(format!("{what} expected on stdin")));
    }
    Ok(SecretString::from(secret.to_string()))
}

/// Fail early when the command needs a session.
fn require_session(ctx: &AppContext) -> Result<(), CliError> {
    if ctx.auth().is_authenticated() {
        Ok(())
    } else {
        Err(CliError::NotSignedIn)
    }
}
