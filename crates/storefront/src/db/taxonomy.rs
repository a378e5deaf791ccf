//! Repository for the slugged name tables.
//!
//! Genres, platforms, tags, publishers and developers all share the same
//! `(id, name UNIQUE, slug UNIQUE)` layout, so one repository serves all
//! five, dispatching on [`SlugNamespace`].

use sqlx::PgPool;

use crate::models::taxonomy::NamedRow;

use super::slugs::SlugNamespace;
use super::RepositoryError;

/// Repository over one of the slugged name tables.
pub struct NamedRepository<'a> {
    pool: &'a PgPool,
    namespace: SlugNamespace,
}

impl<'a> NamedRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool, namespace: SlugNamespace) -> Self {
        Self { pool, namespace }
    }

    #[must_use]
    pub const fn genres(pool: &'a PgPool) -> Self {
        Self::new(pool, SlugNamespace::Genres)
    }

    #[must_use]
    pub const fn platforms(pool: &'a PgPool) -> Self {
        Self::new(pool, SlugNamespace::Platforms)
    }

    #[must_use]
    pub const fn tags(pool: &'a PgPool) -> Self {
        Self::new(pool, SlugNamespace::Tags)
    }

    #[must_use]
    pub const fn publishers(pool: &'a PgPool) -> Self {
        Self::new(pool, SlugNamespace::Publishers)
    }

    #[must_use]
    pub const fn developers(pool: &'a PgPool) -> Self {
        Self::new(pool, SlugNamespace::Developers)
    }

    /// All rows, ordered by name.
    ///
    /// These tables are small (tens of rows); no pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self) -> Result<Vec<NamedRow>, RepositoryError> {
        let query = format!(
            "SELECT id, name, slug FROM {} ORDER BY name",
            self.namespace.table()
        );
        let rows = sqlx::query_as::<_, NamedRow>(&query)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Look up a row by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<NamedRow>, RepositoryError> {
        let query = format!(
            "SELECT id, name, slug FROM {} WHERE slug = $1",
            self.namespace.table()
        );
        let row = sqlx::query_as::<_, NamedRow>(&query)
            .bind(slug)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Look up a row by exact name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<NamedRow>, RepositoryError> {
        let query = format!(
            "SELECT id, name, slug FROM {} WHERE name = $1",
            self.namespace.table()
        );
        let row = sqlx::query_as::<_, NamedRow>(&query)
            .bind(name)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Look up a row by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_by_id(&self, id: i32) -> Result<Option<NamedRow>, RepositoryError> {
        let query = format!(
            "SELECT id, name, slug FROM {} WHERE id = $1",
            self.namespace.table()
        );
        let row = sqlx::query_as::<_, NamedRow>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Insert a row with a pre-allocated slug.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` when the name or slug is already taken.
    pub async fn create(&self, name: &str, slug: &str) -> Result<NamedRow, RepositoryError> {
        let query = format!(
            "INSERT INTO {} (name, slug) VALUES ($1, $2) RETURNING id, name, slug",
            self.namespace.table()
        );
        let row = sqlx::query_as::<_, NamedRow>(&query)
            .bind(name)
            .bind(slug)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                // Distinguish the two unique columns so slug conflicts
                // trigger re-allocation and name conflicts do not.
                let on_slug = matches!(
                    &e,
                    sqlx::Error::Database(db_err)
                        if db_err.constraint().is_some_and(|c| c.contains("slug"))
                );
                let message = if on_slug {
                    "slug already taken"
                } else {
                    "name already taken"
                };
                RepositoryError::from_write(e, message)
            })?;
        Ok(row)
    }
}
