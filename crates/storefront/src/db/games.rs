//! Game catalog repository.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use arcadia_core::{DeveloperId, GameId, PublisherId};

use crate::models::game::{Game, GameListRow};
use crate::models::taxonomy::NamedRow;

use super::RepositoryError;

/// Sort orders accepted by the shop listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameSort {
    /// Newest first. The default, and what unknown sort keys fall back to.
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

impl GameSort {
    /// Parse the `sort` query parameter, falling back to newest-first.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("price_asc") => Self::PriceAsc,
            Some("price_desc") => Self::PriceDesc,
            _ => Self::Newest,
        }
    }

    /// Secondary `id` key keeps pagination stable across equal values.
    const fn order_clause(self) -> &'static str {
        match self {
            Self::Newest => " ORDER BY g.created_at DESC, g.id DESC",
            Self::PriceAsc => " ORDER BY g.price ASC, g.id ASC",
            Self::PriceDesc => " ORDER BY g.price DESC, g.id ASC",
        }
    }
}

/// Filters for the shop listing. All independent and combinable.
#[derive(Debug, Clone, Default)]
pub struct GameListFilter {
    /// Case-insensitive substring match on the title.
    pub q: Option<String>,
    /// Genre slug.
    pub genre: Option<String>,
    /// Platform slug.
    pub platform: Option<String>,
    pub sort: GameSort,
}

/// Field values for creating or updating a game. The slug is allocated
/// separately and relation links are passed alongside.
#[derive(Debug, Clone)]
pub struct GameWrite {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub discount_percent: i32,
    pub release_year: i32,
    pub is_active: bool,
    pub publisher_id: PublisherId,
    pub developer_id: Option<DeveloperId>,
}

/// Many-to-many link tables hanging off `games`.
#[derive(Debug, Clone, Copy)]
enum GameLink {
    Genres,
    Platforms,
    Tags,
}

impl GameLink {
    const fn delete_sql(self) -> &'static str {
        match self {
            Self::Genres => "DELETE FROM game_genres WHERE game_id = $1",
            Self::Platforms => "DELETE FROM game_platforms WHERE game_id = $1",
            Self::Tags => "DELETE FROM game_tags WHERE game_id = $1",
        }
    }

    /// Resolves slugs to ids in one statement; unknown slugs are
    /// silently skipped.
    const fn insert_sql(self) -> &'static str {
        match self {
            Self::Genres => {
                "INSERT INTO game_genres (game_id, genre_id) \
                 SELECT $1, id FROM genres WHERE slug = ANY($2)"
            }
            Self::Platforms => {
                "INSERT INTO game_platforms (game_id, platform_id) \
                 SELECT $1, id FROM platforms WHERE slug = ANY($2)"
            }
            Self::Tags => {
                "INSERT INTO game_tags (game_id, tag_id) \
                 SELECT $1, id FROM tags WHERE slug = ANY($2)"
            }
        }
    }

    const fn select_sql(self) -> &'static str {
        match self {
            Self::Genres => {
                "SELECT t.id, t.name, t.slug FROM genres t \
                 JOIN game_genres l ON l.genre_id = t.id \
                 WHERE l.game_id = $1 ORDER BY t.name"
            }
            Self::Platforms => {
                "SELECT t.id, t.name, t.slug FROM platforms t \
                 JOIN game_platforms l ON l.platform_id = t.id \
                 WHERE l.game_id = $1 ORDER BY t.name"
            }
            Self::Tags => {
                "SELECT t.id, t.name, t.slug FROM tags t \
                 JOIN game_tags l ON l.tag_id = t.id \
                 WHERE l.game_id = $1 ORDER BY t.name"
            }
        }
    }
}

/// Escape LIKE metacharacters so user input matches literally.
fn like_pattern(q: &str) -> String {
    let escaped = q
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

const LIST_COLUMNS: &str = "SELECT g.id, g.title, g.slug, g.price, g.discount_percent, \
     AVG(r.rating)::float8 AS average_rating, COUNT(r.id) AS reviews_count \
     FROM games g LEFT JOIN reviews r ON r.game_id = g.id";

/// Repository for game catalog operations.
pub struct GameRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> GameRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &GameListFilter) {
        qb.push(" WHERE g.is_active = TRUE");
        if let Some(q) = &filter.q {
            qb.push(" AND g.title ILIKE ").push_bind(like_pattern(q));
        }
        if let Some(genre) = &filter.genre {
            qb.push(
                " AND EXISTS (SELECT 1 FROM game_genres gg \
                 JOIN genres ge ON ge.id = gg.genre_id \
                 WHERE gg.game_id = g.id AND ge.slug = ",
            )
            .push_bind(genre.clone())
            .push(")");
        }
        if let Some(platform) = &filter.platform {
            qb.push(
                " AND EXISTS (SELECT 1 FROM game_platforms gp \
                 JOIN platforms pl ON pl.id = gp.platform_id \
                 WHERE gp.game_id = g.id AND pl.slug = ",
            )
            .push_bind(platform.clone())
            .push(")");
        }
    }

    /// One page of active games matching the filter, with review
    /// aggregates.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(
        &self,
        filter: &GameListFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<GameListRow>, RepositoryError> {
        let mut qb = QueryBuilder::new(LIST_COLUMNS);
        Self::push_filters(&mut qb, filter);
        qb.push(" GROUP BY g.id");
        qb.push(filter.sort.order_clause());
        qb.push(" LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        let rows = qb
            .build_query_as::<GameListRow>()
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Total active games matching the filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count(&self, filter: &GameListFilter) -> Result<u64, RepositoryError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM games g");
        Self::push_filters(&mut qb, filter);

        let (count,): (i64,) = qb.build_query_as().fetch_one(self.pool).await?;
        Ok(count.unsigned_abs())
    }

    /// An active game by slug, for the public detail page.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_active_by_slug(&self, slug: &str) -> Result<Option<Game>, RepositoryError> {
        let game = sqlx::query_as::<_, Game>(
            "SELECT * FROM games WHERE slug = $1 AND is_active = TRUE",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;
        Ok(game)
    }

    /// A game by slug regardless of active state, for manager edits.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Game>, RepositoryError> {
        let game = sqlx::query_as::<_, Game>("SELECT * FROM games WHERE slug = $1")
            .bind(slug)
            .fetch_optional(self.pool)
            .await?;
        Ok(game)
    }

    /// Genres linked to a game, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn genres_of(&self, game_id: GameId) -> Result<Vec<NamedRow>, RepositoryError> {
        self.linked(GameLink::Genres, game_id).await
    }

    /// Platforms linked to a game, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn platforms_of(&self, game_id: GameId) -> Result<Vec<NamedRow>, RepositoryError> {
        self.linked(GameLink::Platforms, game_id).await
    }

    /// Tags linked to a game, by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn tags_of(&self, game_id: GameId) -> Result<Vec<NamedRow>, RepositoryError> {
        self.linked(GameLink::Tags, game_id).await
    }

    async fn linked(
        &self,
        link: GameLink,
        game_id: GameId,
    ) -> Result<Vec<NamedRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, NamedRow>(link.select_sql())
            .bind(game_id)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Insert a game with a pre-allocated slug and link its relations.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` (slug) when a concurrent writer claimed the
    /// slug first; callers re-allocate and retry.
    pub async fn create(
        &self,
        write: &GameWrite,
        slug: &str,
        genres: &[String],
        platforms: &[String],
        tags: &[String],
    ) -> Result<Game, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let game = sqlx::query_as::<_, Game>(
            "INSERT INTO games \
             (title, slug, description, price, discount_percent, release_year, \
              is_active, publisher_id, developer_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING *",
        )
        .bind(&write.title)
        .bind(slug)
        .bind(&write.description)
        .bind(write.price)
        .bind(write.discount_percent)
        .bind(write.release_year)
        .bind(write.is_active)
        .bind(write.publisher_id)
        .bind(write.developer_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RepositoryError::from_write(e, "game slug already taken"))?;

        Self::replace_links(&mut tx, GameLink::Genres, game.id, genres).await?;
        Self::replace_links(&mut tx, GameLink::Platforms, game.id, platforms).await?;
        Self::replace_links(&mut tx, GameLink::Tags, game.id, tags).await?;

        tx.commit().await?;
        Ok(game)
    }

    /// Update a game's fields and, where given, replace relation links.
    ///
    /// The slug is never regenerated on update; renames keep existing
    /// URLs valid.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the game no longer exists.
    pub async fn update(
        &self,
        id: GameId,
        write: &GameWrite,
        genres: Option<&[String]>,
        platforms: Option<&[String]>,
        tags: Option<&[String]>,
    ) -> Result<Game, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let game = sqlx::query_as::<_, Game>(
            "UPDATE games SET \
             title = $2, description = $3, price = $4, discount_percent = $5, \
             release_year = $6, is_active = $7, publisher_id = $8, \
             developer_id = $9, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(id)
        .bind(&write.title)
        .bind(&write.description)
        .bind(write.price)
        .bind(write.discount_percent)
        .bind(write.release_year)
        .bind(write.is_active)
        .bind(write.publisher_id)
        .bind(write.developer_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if let Some(genres) = genres {
            Self::replace_links(&mut tx, GameLink::Genres, game.id, genres).await?;
        }
        if let Some(platforms) = platforms {
            Self::replace_links(&mut tx, GameLink::Platforms, game.id, platforms).await?;
        }
        if let Some(tags) = tags {
            Self::replace_links(&mut tx, GameLink::Tags, game.id, tags).await?;
        }

        tx.commit().await?;
        Ok(game)
    }

    /// Delete a game by slug.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no game has the slug, or `Conflict` if the
    /// game is referenced by order lines (those are kept forever).
    pub async fn delete_by_slug(&self, slug: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM games WHERE slug = $1")
            .bind(slug)
            .execute(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::Conflict("game is referenced by orders".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn replace_links(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        link: GameLink,
        game_id: GameId,
        slugs: &[String],
    ) -> Result<(), RepositoryError> {
        sqlx::query(link.delete_sql())
            .bind(game_id)
            .execute(&mut **tx)
            .await?;
        if !slugs.is_empty() {
            sqlx::query(link.insert_sql())
                .bind(game_id)
                .bind(slugs)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parsing() {
        assert_eq!(GameSort::parse(Some("price_asc")), GameSort::PriceAsc);
        assert_eq!(GameSort::parse(Some("price_desc")), GameSort::PriceDesc);
        assert_eq!(GameSort::parse(Some("bogus")), GameSort::Newest);
        assert_eq!(GameSort::parse(None), GameSort::Newest);
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("50% off"), "%50\\% off%");
        assert_eq!(like_pattern("snake_case"), "%snake\\_case%");
        assert_eq!(like_pattern("plain"), "%plain%");
    }
}
