//! T-Express CLI - storefront and back-office operations from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (password read from stdin)
//! echo "$PASSWORD" | tx-cli auth login -e awa@t-express.sn
//!
//! # Browse the catalogue
//! tx-cli catalogue search -q boubou --per-page 12
//! tx-cli catalogue featured --limit 8
//!
//! # Cart and wishlist
//! tx-cli panier add 12 --quantite 2
//! tx-cli panier clear
//! tx-cli favoris toggle 12
//!
//! # Back office
//! tx-cli admin stocks --alertes
//! tx-cli admin retours --en-attente
//! ```
//!
//! # Environment Variables
//!
//! - `TEXPRESS_API_URL` - API base URL (required)
//! - `TEXPRESS_SESSION_FILE` - where the session is persisted
//! - `SENTRY_DSN` - enables error reporting
//! - `RUST_LOG` - log filter (default `texpress_storefront=info,texpress_cli=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use texpress_storefront::{AppContext, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;
mod output;

use commands::{
    AdminAction, AuthAction, CatalogueAction, CommandeAction, FavorisAction, PanierAction,
};
use error::CliError;

#[derive(Parser)]
#[command(name = "tx-cli")]
#[command(author, version, about = "T-Express command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, sign out, manage the profile
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Search and browse products
    Catalogue {
        #[command(subcommand)]
        action: CatalogueAction,
    },
    /// Manage the cart
    Panier {
        #[command(subcommand)]
        action: PanierAction,
    },
    /// Manage the wishlist
    Favoris {
        #[command(subcommand)]
        action: FavorisAction,
    },
    /// Place and follow orders
    Commandes {
        #[command(subcommand)]
        action: CommandeAction,
    },
    /// Back-office listings and moderation
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &Config) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Map tracing levels to Sentry events (errors, warnings) or breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "texpress_storefront=info,texpress_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            config
                .sentry_dsn
                .is_some()
                .then(|| sentry_tracing::layer().event_filter(sentry_event_filter)),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: Config) -> Result<(), CliError> {
    let ctx = AppContext::with_session_file(config)?.with_all_stores();
    ctx.start().await;

    let result = match cli.command {
        Commands::Auth { action } => commands::auth::run(&ctx, action).await,
        Commands::Catalogue { action } => commands::catalogue::run(&ctx, action).await,
        Commands::Panier { action } => commands::panier::run(&ctx, action).await,
        Commands::Favoris { action } => commands::favoris::run(&ctx, action).await,
        Commands::Commandes { action } => commands::commandes::run(&ctx, action).await,
        Commands::Admin { action } => commands::admin::run(&ctx, action).await,
    };

    ctx.shutdown().await;
    result
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
