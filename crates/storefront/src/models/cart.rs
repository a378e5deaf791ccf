//! Cart models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use arcadia_core::pricing::PricedLine;
use arcadia_core::{CartId, GameId, UserId};

/// A user's cart. One per user, created lazily on first use.
#[derive(Debug, Clone, FromRow)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub updated_at: DateTime<Utc>,
}

/// A cart line joined with its game, as returned by the cart repository.
#[derive(Debug, Clone, FromRow)]
pub struct CartItem {
    pub game_id: GameId,
    pub title: String,
    pub slug: String,
    pub quantity: i32,
    /// Unit price frozen at cart-add time; never refreshed from the
    /// live catalog price.
    pub price_snapshot: Decimal,
}

impl CartItem {
    /// View of this line for total computation.
    #[must_use]
    pub fn priced_line(&self) -> PricedLine {
        PricedLine::new(self.quantity.max(0).unsigned_abs(), self.price_snapshot)
    }
}
