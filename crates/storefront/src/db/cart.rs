//! Cart repository.

use rust_decimal::Decimal;
use sqlx::PgPool;

use arcadia_core::{CartId, GameId, UserId};

use crate::models::cart::{Cart, CartItem};

use super::RepositoryError;

/// Repository for the per-user cart.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The user's cart, created on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        // The upsert always returns the row, created or pre-existing.
        let cart = sqlx::query_as::<_, Cart>(
            "INSERT INTO carts (user_id) VALUES ($1) \
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id \
             RETURNING id, user_id, updated_at",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;
        Ok(cart)
    }

    /// The cart's lines joined with their games, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn items(&self, cart_id: CartId) -> Result<Vec<CartItem>, RepositoryError> {
        let items = sqlx::query_as::<_, CartItem>(
            "SELECT ci.game_id, g.title, g.slug, ci.quantity, ci.price_snapshot \
             FROM cart_items ci JOIN games g ON g.id = ci.game_id \
             WHERE ci.cart_id = $1 \
             ORDER BY ci.id",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;
        Ok(items)
    }

    /// Add one unit of a game to the cart.
    ///
    /// A new line freezes `price_snapshot` at the given unit price; a
    /// line that already exists has its quantity bumped by one and keeps
    /// the snapshot from when it was first added.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn add(
        &self,
        cart_id: CartId,
        game_id: GameId,
        price_snapshot: Decimal,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO cart_items (cart_id, game_id, quantity, price_snapshot) \
             VALUES ($1, $2, 1, $3) \
             ON CONFLICT (cart_id, game_id) \
             DO UPDATE SET quantity = cart_items.quantity + 1",
        )
        .bind(cart_id)
        .bind(game_id)
        .bind(price_snapshot)
        .execute(self.pool)
        .await?;
        self.touch(cart_id).await
    }

    /// Set a line's quantity. Zero or negative removes the line.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the game is not in the cart.
    pub async fn set_quantity(
        &self,
        cart_id: CartId,
        game_id: GameId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        if quantity <= 0 {
            return self.remove(cart_id, game_id).await;
        }

        let result = sqlx::query(
            "UPDATE cart_items SET quantity = $3 WHERE cart_id = $1 AND game_id = $2",
        )
        .bind(cart_id)
        .bind(game_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.touch(cart_id).await
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the game is not in the cart.
    pub async fn remove(&self, cart_id: CartId, game_id: GameId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1 AND game_id = $2")
            .bind(cart_id)
            .bind(game_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.touch(cart_id).await
    }

    /// Remove every line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn clear(&self, cart_id: CartId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(self.pool)
            .await?;
        self.touch(cart_id).await
    }

    async fn touch(&self, cart_id: CartId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE carts SET updated_at = now() WHERE id = $1")
            .bind(cart_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
