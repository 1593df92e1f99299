//! Quire
//!
//! Command-line entry point: manages content types and entries and
//! resolves entries through their providers.

mod cli;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use quire_kernel::{AppState, Config, db};

#[derive(Debug, Parser)]
#[command(name = "quire", version, about = "Pluggable content resolution")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply database migrations.
    Migrate,

    /// List content types.
    Types,

    /// Create a content type bound to a provider.
    CreateType {
        #[arg(long)]
        name: String,
        #[arg(long)]
        provider: String,
        /// Type-level options as a JSON object.
        #[arg(long)]
        options: Option<String>,
    },

    /// Create an entry of a content type.
    CreateEntry {
        /// Content type name.
        #[arg(long = "type")]
        type_name: String,
        #[arg(long)]
        slug: String,
        /// Entry-level options as a JSON object.
        #[arg(long)]
        options: Option<String>,
    },

    /// Resolve an entry and print the provider response.
    Resolve {
        /// Content type name.
        #[arg(long = "type")]
        type_name: String,
        #[arg(long)]
        slug: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;
    info!(providers = ?config.providers, "configuration loaded");

    if let Command::Migrate = cli.command {
        let pool = db::create_pool(&config).await?;
        db::run_migrations(&pool).await?;
        info!("migrations applied");
        return Ok(());
    }

    let state = AppState::new(&config)
        .await
        .context("failed to initialize application state")?;

    match cli.command {
        Command::Migrate => Ok(()),
        Command::Types => cli::cmd_types(&state).await,
        Command::CreateType {
            name,
            provider,
            options,
        } => cli::cmd_create_type(&state, &name, &provider, options.as_deref()).await,
        Command::CreateEntry {
            type_name,
            slug,
            options,
        } => cli::cmd_create_entry(&state, &type_name, &slug, options.as_deref()).await,
        Command::Resolve { type_name, slug } => cli::cmd_resolve(&state, &type_name, &slug).await,
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
