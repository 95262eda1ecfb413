//! CLI error type.

use texpress_core::EmailError;
use texpress_storefront::ApiError;
use texpress_storefront::config::ConfigError;
use texpress_storefront::services::AuthError;
use thiserror::Error;

/// Errors surfaced by `tx-cli` commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Bad command input caught before any request.
    #[error("{0}")]
    Input(String),

    /// The command needs a signed-in client.
    #[error("not signed in, run `tx-cli auth login` first")]
    NotSignedIn,
}
