//! Built-in group creation.

use sqlx::PgPool;

const GROUPS: [&str; 2] = ["client", "manager"];

/// Create the built-in groups if they are missing.
///
/// # Errors
///
/// Returns an error if a query fails.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    for group in GROUPS {
        sqlx::query("INSERT INTO groups (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(group)
            .execute(pool)
            .await?;
        tracing::info!(group, "Group present");
    }
    Ok(())
}
