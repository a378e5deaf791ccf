//! Game catalog models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use arcadia_core::{DeveloperId, GameId, PublisherId};

/// A full game row.
#[derive(Debug, Clone, FromRow)]
pub struct Game {
    pub id: GameId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub price: Decimal,
    pub discount_percent: i32,
    pub release_year: i32,
    pub is_active: bool,
    pub publisher_id: PublisherId,
    pub developer_id: Option<DeveloperId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A game row for shop listings, with review aggregates computed by the
/// query (average rating and distinct review count).
#[derive(Debug, Clone, FromRow)]
pub struct GameListRow {
    pub id: GameId,
    pub title: String,
    pub slug: String,
    pub price: Decimal,
    pub discount_percent: i32,
    pub average_rating: Option<f64>,
    pub reviews_count: i64,
}
