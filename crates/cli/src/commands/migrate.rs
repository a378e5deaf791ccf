//! Database migrations, embedded from the storefront crate at build
//! time so the CLI binary is self-contained.

use sqlx::PgPool;

/// Apply pending migrations.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running migrations");
    sqlx::migrate!("../storefront/migrations").run(pool).await?;
    tracing::info!("Migrations up to date");
    Ok(())
}
