//! Review repository.

use sqlx::PgPool;

use arcadia_core::{GameId, UserId};

use crate::models::review::{Review, ReviewAggregates, ReviewWithUser};

use super::RepositoryError;

/// Repository for game reviews.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Write a user's review of a game, replacing any existing one.
    ///
    /// One review per (user, game); a second submission updates the
    /// rating and text in place, keeping the original timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn upsert(
        &self,
        user_id: UserId,
        game_id: GameId,
        rating: i32,
        text: &str,
    ) -> Result<Review, RepositoryError> {
        let review = sqlx::query_as::<_, Review>(
            "INSERT INTO reviews (user_id, game_id, rating, text) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, game_id) \
             DO UPDATE SET rating = EXCLUDED.rating, text = EXCLUDED.text \
             RETURNING id, user_id, game_id, rating, text, created_at",
        )
        .bind(user_id)
        .bind(game_id)
        .bind(rating)
        .bind(text)
        .fetch_one(self.pool)
        .await?;
        Ok(review)
    }

    /// Delete a user's review of a game.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user never reviewed the game.
    pub async fn delete(&self, user_id: UserId, game_id: GameId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM reviews WHERE user_id = $1 AND game_id = $2")
            .bind(user_id)
            .bind(game_id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Average rating and review count for a game.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn aggregates(&self, game_id: GameId) -> Result<ReviewAggregates, RepositoryError> {
        let aggregates = sqlx::query_as::<_, ReviewAggregates>(
            "SELECT AVG(rating)::float8 AS average_rating, \
             COUNT(*) AS reviews_count \
             FROM reviews WHERE game_id = $1",
        )
        .bind(game_id)
        .fetch_one(self.pool)
        .await?;
        Ok(aggregates)
    }

    /// The most recent reviews of a game, joined with usernames.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn latest_for_game(
        &self,
        game_id: GameId,
        limit: i64,
    ) -> Result<Vec<ReviewWithUser>, RepositoryError> {
        let reviews = sqlx::query_as::<_, ReviewWithUser>(
            "SELECT u.username, r.rating, r.text, r.created_at \
             FROM reviews r JOIN users u ON u.id = r.user_id \
             WHERE r.game_id = $1 \
             ORDER BY r.created_at DESC, r.id DESC \
             LIMIT $2",
        )
        .bind(game_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(reviews)
    }
}
