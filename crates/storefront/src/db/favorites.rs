//! Favorites repository.

use sqlx::PgPool;

use arcadia_core::{GameId, UserId};

use crate::models::review::FavoriteGame;

use super::RepositoryError;

/// Result of a favorite toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

impl ToggleOutcome {
    /// Whether the game is a favorite after the toggle.
    #[must_use]
    pub const fn is_favorite(self) -> bool {
        matches!(self, Self::Added)
    }
}

/// Repository for per-user game favorites.
pub struct FavoriteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> FavoriteRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Toggle a game in the user's favorites.
    ///
    /// The insert relies on the (user, game) unique constraint: if the
    /// row already existed nothing is inserted and the favorite is
    /// removed instead.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn toggle(
        &self,
        user_id: UserId,
        game_id: GameId,
    ) -> Result<ToggleOutcome, RepositoryError> {
        let inserted = sqlx::query(
            "INSERT INTO favorites (user_id, game_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, game_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(game_id)
        .execute(self.pool)
        .await?
        .rows_affected();

        if inserted > 0 {
            return Ok(ToggleOutcome::Added);
        }

        sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND game_id = $2")
            .bind(user_id)
            .bind(game_id)
            .execute(self.pool)
            .await?;
        Ok(ToggleOutcome::Removed)
    }

    /// The user's favorited games, most recently added first, with each
    /// game's average rating.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<FavoriteGame>, RepositoryError> {
        let games = sqlx::query_as::<_, FavoriteGame>(
            "SELECT g.id AS game_id, g.title, g.slug, \
             (SELECT AVG(r.rating)::float8 FROM reviews r WHERE r.game_id = g.id) \
                 AS average_rating, \
             f.created_at AS favorited_at \
             FROM favorites f JOIN games g ON g.id = f.game_id \
             WHERE f.user_id = $1 \
             ORDER BY f.created_at DESC, f.id DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(games)
    }

    /// Whether the user has favorited the game.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn contains(&self, user_id: UserId, game_id: GameId) -> Result<bool, RepositoryError> {
        let (favorited,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE user_id = $1 AND game_id = $2)",
        )
        .bind(user_id)
        .bind(game_id)
        .fetch_one(self.pool)
        .await?;
        Ok(favorited)
    }
}
