//! News repository.

use sqlx::PgPool;

use crate::models::news::NewsPost;

use super::RepositoryError;

const NEWS_COLUMNS: &str = "id, title, slug, content, created_at";

/// Repository for news posts.
pub struct NewsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> NewsRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One page of posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<NewsPost>, RepositoryError> {
        let posts = sqlx::query_as::<_, NewsPost>(&format!(
            "SELECT {NEWS_COLUMNS} FROM news \
             ORDER BY created_at DESC, id DESC \
             LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;
        Ok(posts)
    }

    /// Total number of posts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count(&self) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM news")
            .fetch_one(self.pool)
            .await?;
        Ok(count.unsigned_abs())
    }

    /// A post by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<NewsPost>, RepositoryError> {
        let post = sqlx::query_as::<_, NewsPost>(&format!(
            "SELECT {NEWS_COLUMNS} FROM news WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;
        Ok(post)
    }

    /// Insert a post with a pre-allocated slug.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` when the slug is already taken.
    pub async fn create(
        &self,
        title: &str,
        slug: &str,
        content: &str,
    ) -> Result<NewsPost, RepositoryError> {
        let post = sqlx::query_as::<_, NewsPost>(&format!(
            "INSERT INTO news (title, slug, content) \
             VALUES ($1, $2, $3) RETURNING {NEWS_COLUMNS}"
        ))
        .bind(title)
        .bind(slug)
        .bind(content)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "news slug already taken"))?;
        Ok(post)
    }
}
