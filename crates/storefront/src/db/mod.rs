//! Database operations for the storefront `PostgreSQL` instance.
//!
//! # Tables
//!
//! - `users`, `groups`, `user_groups` - accounts and group membership
//! - `genres`, `platforms`, `tags`, `publishers`, `developers` - slugged
//!   name records
//! - `games` + `game_genres`/`game_platforms`/`game_tags` - catalog
//! - `reviews`, `favorites`, `news` - community content
//! - `carts`, `cart_items`, `orders`, `order_items`, `payments` - commerce
//!
//! # Migrations
//!
//! Migrations live in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p arcadia-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod cart;
pub mod favorites;
pub mod games;
pub mod news;
pub mod orders;
pub mod reviews;
pub mod slugs;
pub mod taxonomy;
pub mod users;

/// Errors from the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The targeted row does not exist.
    #[error("not found")]
    NotFound,

    /// A stored value failed domain parsing (e.g. an unknown order
    /// status string).
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl RepositoryError {
    /// Map an insert/update error, turning unique violations into
    /// `Conflict` with the given message.
    pub(crate) fn from_write(e: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict_message.to_owned());
        }
        Self::Database(e)
    }

    /// Whether this error is a unique violation on a slug column.
    ///
    /// Callers creating slugged entities use this to retry allocation;
    /// the storage constraint is the authoritative uniqueness guard.
    #[must_use]
    pub fn is_slug_conflict(&self) -> bool {
        matches!(self, Self::Conflict(msg) if msg.contains("slug"))
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
