//! Order repository: checkout, listings and status management.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use arcadia_core::pricing;
use arcadia_core::{OrderId, OrderStatus, PaymentStatus, UserId};

use crate::models::order::{Order, OrderItem, OrderWithUser, Payment};

use super::RepositoryError;

/// Payment provider recorded at checkout. The storefront runs a demo
/// payment flow; the record exists so the schema matches a real one.
const PAYMENT_PROVIDER: &str = "demo";

type OrderRow = (OrderId, UserId, String, Decimal, DateTime<Utc>);

fn parse_status(raw: &str) -> Result<OrderStatus, RepositoryError> {
    raw.parse()
        .map_err(|_| RepositoryError::DataCorruption(format!("unknown order status '{raw}'")))
}

fn parse_payment_status(raw: &str) -> Result<PaymentStatus, RepositoryError> {
    raw.parse()
        .map_err(|_| RepositoryError::DataCorruption(format!("unknown payment status '{raw}'")))
}

fn row_to_order(row: OrderRow) -> Result<Order, RepositoryError> {
    let (id, user_id, status, total_price, created_at) = row;
    Ok(Order {
        id,
        user_id,
        status: parse_status(&status)?,
        total_price,
        created_at,
    })
}

/// Repository for orders and their payments.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Convert the user's cart into an order.
    ///
    /// In one transaction: reads the cart lines, creates the order with
    /// the total computed from the frozen snapshots, copies every line
    /// into order items, attaches a pending demo payment and clears the
    /// cart. Returns `None` when the cart is empty; nothing is written
    /// in that case.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement in the transaction fails.
    pub async fn checkout(&self, user_id: UserId) -> Result<Option<Order>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let cart_id: Option<(i32,)> = sqlx::query_as("SELECT id FROM carts WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some((cart_id,)) = cart_id else {
            return Ok(None);
        };

        let lines: Vec<(i32, i32, Decimal)> = sqlx::query_as(
            "SELECT game_id, quantity, price_snapshot \
             FROM cart_items WHERE cart_id = $1 ORDER BY id",
        )
        .bind(cart_id)
        .fetch_all(&mut *tx)
        .await?;
        if lines.is_empty() {
            return Ok(None);
        }

        let priced: Vec<pricing::PricedLine> = lines
            .iter()
            .map(|&(_, quantity, snapshot)| {
                pricing::PricedLine::new(quantity.max(0).unsigned_abs(), snapshot)
            })
            .collect();
        let total = pricing::order_total(&priced);

        let row = sqlx::query_as::<_, OrderRow>(
            "INSERT INTO orders (user_id, status, total_price) \
             VALUES ($1, $2, $3) \
             RETURNING id, user_id, status, total_price, created_at",
        )
        .bind(user_id)
        .bind(OrderStatus::New.as_str())
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;
        let order = row_to_order(row)?;

        for (game_id, quantity, snapshot) in &lines {
            sqlx::query(
                "INSERT INTO order_items (order_id, game_id, quantity, price_snapshot) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(order.id)
            .bind(game_id)
            .bind(quantity)
            .bind(snapshot)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("INSERT INTO payments (order_id, provider, status) VALUES ($1, $2, $3)")
            .bind(order.id)
            .bind(PAYMENT_PROVIDER)
            .bind(PaymentStatus::Pending.as_str())
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(order))
    }

    /// An order by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored status is
    /// unparseable.
    pub async fn get(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, status, total_price, created_at FROM orders WHERE id = $1",
        )
        .bind(order_id)
        .fetch_optional(self.pool)
        .await?;
        row.map(row_to_order).transpose()
    }

    /// All of a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored status is
    /// unparseable.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, status, total_price, created_at \
             FROM orders WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        rows.into_iter().map(row_to_order).collect()
    }

    /// An order's lines joined with their games.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(
            "SELECT oi.game_id, g.title, g.slug, oi.quantity, oi.price_snapshot \
             FROM order_items oi JOIN games g ON g.id = oi.game_id \
             WHERE oi.order_id = $1 \
             ORDER BY oi.id",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;
        Ok(items)
    }

    /// The payment attached to an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored status is
    /// unparseable.
    pub async fn payment(&self, order_id: OrderId) -> Result<Option<Payment>, RepositoryError> {
        let row: Option<(arcadia_core::PaymentId, OrderId, String, String, Option<DateTime<Utc>>)> =
            sqlx::query_as(
                "SELECT id, order_id, provider, status, paid_at \
                 FROM payments WHERE order_id = $1",
            )
            .bind(order_id)
            .fetch_optional(self.pool)
            .await?;
        row.map(|(id, order_id, provider, status, paid_at)| {
            Ok(Payment {
                id,
                order_id,
                provider,
                status: parse_payment_status(&status)?,
                paid_at,
            })
        })
        .transpose()
    }

    /// One page of all orders, optionally filtered by status, for the
    /// management listing. Newest first, joined with usernames.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored status is
    /// unparseable.
    pub async fn list_managed(
        &self,
        status: Option<OrderStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderWithUser>, RepositoryError> {
        let rows: Vec<(OrderId, UserId, String, Decimal, DateTime<Utc>, String)> = sqlx::query_as(
            "SELECT o.id, o.user_id, o.status, o.total_price, o.created_at, u.username \
             FROM orders o JOIN users u ON u.id = o.user_id \
             WHERE ($1::text IS NULL OR o.status = $1) \
             ORDER BY o.created_at DESC, o.id DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(status.map(OrderStatus::as_str))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, user_id, status, total_price, created_at, username)| {
                Ok(OrderWithUser {
                    order: row_to_order((id, user_id, status, total_price, created_at))?,
                    username,
                })
            })
            .collect()
    }

    /// Total orders matching the management filter.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn count_managed(
        &self,
        status: Option<OrderStatus>,
    ) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM orders WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status.map(OrderStatus::as_str))
        .fetch_one(self.pool)
        .await?;
        Ok(count.unsigned_abs())
    }

    /// Move an order from `current` to `next`.
    ///
    /// The caller validates the transition against the state machine
    /// first; the `status = current` guard here makes the write
    /// optimistic, so two managers racing on the same order cannot both
    /// win.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the stored status is no longer `current`,
    /// `NotFound` if the order does not exist.
    pub async fn update_status(
        &self,
        order_id: OrderId,
        current: OrderStatus,
        next: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "UPDATE orders SET status = $3 \
             WHERE id = $1 AND status = $2 \
             RETURNING id, user_id, status, total_price, created_at",
        )
        .bind(order_id)
        .bind(current.as_str())
        .bind(next.as_str())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => row_to_order(row),
            None => {
                if self.get(order_id).await?.is_some() {
                    Err(RepositoryError::Conflict(
                        "order status changed concurrently".to_owned(),
                    ))
                } else {
                    Err(RepositoryError::NotFound)
                }
            }
        }
    }
}
