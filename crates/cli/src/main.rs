//! Management CLI for the Arcadia storefront.
//!
//! ```bash
//! arcadia migrate    # run pending database migrations
//! arcadia bootstrap  # create the built-in groups
//! arcadia seed       # load the demo catalog
//! ```
//!
//! The database is taken from `STOREFRONT_DATABASE_URL` (or the generic
//! `DATABASE_URL`), via `.env` when present.

mod commands;

use clap::{Parser, Subcommand};
use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "arcadia", version, about = "Arcadia storefront management tasks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run pending database migrations.
    Migrate,
    /// Create the built-in `client` and `manager` groups.
    Bootstrap,
    /// Populate the database with the demo catalog, accounts and
    /// community content. Idempotent; safe to re-run.
    Seed,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let pool = connect().await?;

    match cli.command {
        Command::Migrate => commands::migrate::run(&pool).await?,
        Command::Bootstrap => commands::bootstrap::run(&pool).await?,
        Command::Seed => {
            commands::migrate::run(&pool).await?;
            commands::bootstrap::run(&pool).await?;
            commands::seed::run(&pool).await?;
        }
    }

    Ok(())
}

async fn connect() -> Result<PgPool, Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let url: SecretString = std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| "STOREFRONT_DATABASE_URL or DATABASE_URL must be set")?
        .into();

    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(url.expose_secret())
        .await?;
    Ok(pool)
}
