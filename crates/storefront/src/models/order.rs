//! Order and payment models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use arcadia_core::pricing::PricedLine;
use arcadia_core::{GameId, OrderId, OrderStatus, PaymentId, PaymentStatus, UserId};

/// An order header.
///
/// `status` is stored as text in the database; the repository parses it
/// into the state-machine enum when loading, so invalid stored values
/// surface as data corruption instead of propagating silently.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    /// Total computed once at checkout from the line snapshots.
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// An order header joined with the owning username (manager listings).
#[derive(Debug, Clone)]
pub struct OrderWithUser {
    pub order: Order,
    pub username: String,
}

/// An order line joined with its game.
#[derive(Debug, Clone, FromRow)]
pub struct OrderItem {
    pub game_id: GameId,
    pub title: String,
    pub slug: String,
    pub quantity: i32,
    /// Copied verbatim from the cart line at checkout.
    pub price_snapshot: Decimal,
}

impl OrderItem {
    /// View of this line for total computation.
    #[must_use]
    pub fn priced_line(&self) -> PricedLine {
        PricedLine::new(self.quantity.max(0).unsigned_abs(), self.price_snapshot)
    }
}

/// The payment record attached to an order at checkout.
#[derive(Debug, Clone)]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub provider: String,
    pub status: PaymentStatus,
    pub paid_at: Option<DateTime<Utc>>,
}
