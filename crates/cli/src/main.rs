//! StayHub CLI - Inspect and edit comparison lists against a live API.
//!
//! # Usage
//!
//! ```bash
//! # Show an anonymous visitor's comparison list
//! stayhub-cli --anonymous anon_1699999999 list
//!
//! # Add a property to a signed-in user's list
//! stayhub-cli --user 6f1c2a4e-8a7b-4c1d-9e2f-3a4b5c6d7e8f add 0b8e...
//!
//! # Remove one property, or everything
//! stayhub-cli --user 6f1c2a4e-... remove 0b8e...
//! stayhub-cli --user 6f1c2a4e-... clear
//!
//! # Show what the floating comparison bar would display
//! stayhub-cli --anonymous anon_1699999999 summary
//! ```
//!
//! # Commands
//!
//! - `list` - Print the comparison list
//! - `add` - Add a property (rejected when already selected or the list is full)
//! - `remove` - Remove a property
//! - `clear` - Remove every property
//! - `summary` - Print thumbnails, overflow count, and highlights

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use stayhub_core::{AnonymousId, Identity, PropertyId, UserId};
use stayhub_storefront::TracingNotifier;
use stayhub_storefront::config::StorefrontConfig;
use stayhub_storefront::error::AppError;
use stayhub_storefront::state::Services;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "stayhub-cli")]
#[command(author, version, about = "StayHub comparison list tools")]
struct Cli {
    /// Act as this signed-in user
    #[arg(long, global = true, conflicts_with = "anonymous")]
    user: Option<UserId>,

    /// Act as this anonymous session
    #[arg(long, global = true)]
    anonymous: Option<AnonymousId>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the comparison list
    List,
    /// Add a property to the comparison list
    Add {
        /// Property ID
        property_id: PropertyId,
    },
    /// Remove a property from the comparison list
    Remove {
        /// Property ID
        property_id: PropertyId,
    },
    /// Remove every property from the comparison list
    Clear,
    /// Print what the comparison bar would show
    Summary,
}

impl Cli {
    fn identity(&self) -> Result<Identity, AppError> {
        match (&self.user, &self.anonymous) {
            (Some(user), _) => Ok(Identity::User(*user)),
            (None, Some(anonymous)) => Ok(Identity::Anonymous(anonymous.clone())),
            (None, None) => Err(AppError::BadRequest(
                "one of --user or --anonymous is required".to_string(),
            )),
        }
    }
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = StorefrontConfig::from_env();

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stayhub_cli=info,stayhub_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(AppError::from(e)),
    };

    if let Err(e) = result {
        e.capture();
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), AppError> {
    let identity = cli.identity()?;
    let services = Services::new(config, Arc::new(TracingNotifier), identity)?;

    match cli.command {
        Commands::List => commands::comparison::list(&services).await,
        Commands::Add { property_id } => commands::comparison::add(&services, property_id).await,
        Commands::Remove { property_id } => {
            commands::comparison::remove(&services, property_id).await
        }
        Commands::Clear => commands::comparison::clear(&services).await,
        Commands::Summary => commands::comparison::summary(&services).await,
    }
}
