//! Idempotent startup fixtures.

use sqlx::PgPool;

use crate::db::users::UserRepository;
use crate::db::RepositoryError;
use crate::models::user::{GROUP_CLIENT, GROUP_MANAGER};

/// Ensure the built-in groups exist. Safe to run on every startup.
///
/// # Errors
///
/// Returns an error if a query fails.
pub async fn ensure_default_groups(pool: &PgPool) -> Result<(), RepositoryError> {
    let repo = UserRepository::new(pool);
    for group in [GROUP_CLIENT, GROUP_MANAGER] {
        repo.ensure_group(group).await?;
    }
    tracing::debug!("Default groups present");
    Ok(())
}
