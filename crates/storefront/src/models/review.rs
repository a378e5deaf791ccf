//! Review and favorite models.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use arcadia_core::{GameId, ReviewId, UserId};

/// A user's review of a game. Unique per (user, game); writes upsert.
#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub game_id: GameId,
    pub rating: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A review joined with the reviewer's username, for detail payloads.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewWithUser {
    pub username: String,
    pub rating: i32,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Aggregates over a game's reviews, computed by the query layer and
/// returned as plain values.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct ReviewAggregates {
    pub average_rating: Option<f64>,
    pub reviews_count: i64,
}

impl ReviewAggregates {
    /// Average rating with the original API's `0` fallback for games
    /// without reviews.
    #[must_use]
    pub fn average_or_zero(&self) -> f64 {
        self.average_rating.unwrap_or(0.0)
    }
}

/// A favorited game in a user's favorites listing.
#[derive(Debug, Clone, FromRow)]
pub struct FavoriteGame {
    pub game_id: GameId,
    pub title: String,
    pub slug: String,
    pub average_rating: Option<f64>,
    pub favorited_at: DateTime<Utc>,
}
