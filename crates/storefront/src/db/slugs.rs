//! Slug allocation against live table state.
//!
//! The pure candidate sequence lives in `arcadia_core::slug`; this module
//! drives it with existence queries so allocation reflects what is
//! actually stored. Uniqueness is still ultimately enforced by the
//! per-table unique indexes; callers retry on `is_slug_conflict` when a
//! concurrent writer wins the race.

use sqlx::PgPool;
use thiserror::Error;

use arcadia_core::CoreError;
use arcadia_core::slug::SlugCandidates;

use super::RepositoryError;

/// Upper bound on insert attempts when a concurrent writer claims the
/// allocated slug between the existence check and the insert.
pub const MAX_SAVE_ATTEMPTS: u32 = 5;

/// Tables with a unique `slug` column.
///
/// Closed enum so the table name interpolated into queries is always one
/// of these literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugNamespace {
    Games,
    Genres,
    Platforms,
    Tags,
    Publishers,
    Developers,
    News,
}

impl SlugNamespace {
    pub(crate) const fn table(self) -> &'static str {
        match self {
            Self::Games => "games",
            Self::Genres => "genres",
            Self::Platforms => "platforms",
            Self::Tags => "tags",
            Self::Publishers => "publishers",
            Self::Developers => "developers",
            Self::News => "news",
        }
    }
}

/// Errors from slug allocation.
#[derive(Debug, Error)]
pub enum SlugAllocationError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The bounded candidate sequence ran out without finding a free
    /// slug.
    #[error(transparent)]
    Exhausted(#[from] CoreError),
}

impl From<sqlx::Error> for SlugAllocationError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Whether `slug` is already taken in the namespace, optionally ignoring
/// one row (so re-saving an entity never collides with itself).
///
/// # Errors
///
/// Returns an error if the query fails.
pub async fn exists(
    pool: &PgPool,
    namespace: SlugNamespace,
    slug: &str,
    exclude_id: Option<i32>,
) -> Result<bool, sqlx::Error> {
    let query = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE slug = $1 AND ($2::int4 IS NULL OR id <> $2))",
        namespace.table()
    );
    let (taken,): (bool,) = sqlx::query_as(&query)
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
    Ok(taken)
}

/// Allocate a free slug for `base_text` in the namespace.
///
/// Walks the candidate sequence (`base`, `base-2`, `base-3`, ...) until a
/// slug no existing row holds, excluding `exclude_id` when updating an
/// existing entity.
///
/// # Errors
///
/// Returns `Exhausted` if every candidate is taken, or `Repository` on a
/// query failure.
pub async fn allocate(
    pool: &PgPool,
    namespace: SlugNamespace,
    base_text: &str,
    exclude_id: Option<i32>,
) -> Result<String, SlugAllocationError> {
    let mut candidates = SlugCandidates::for_text(base_text);
    for candidate in &mut candidates {
        if !exists(pool, namespace, &candidate, exclude_id).await? {
            return Ok(candidate);
        }
    }
    Err(candidates.exhausted().into())
}
