//! Cart endpoints: view, mutate and checkout.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use arcadia_core::pricing;

use crate::db::cart::CartRepository;
use crate::db::games::GameRepository;
use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireUser;
use crate::models::cart::CartItem;
use crate::response::{json_created, json_ok};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddPayload {
    /// Slug of the game to add.
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct QuantityPayload {
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
struct CartLineView {
    title: String,
    slug: String,
    quantity: i32,
    price_snapshot: Decimal,
    line_total: Decimal,
}

#[derive(Debug, Serialize)]
struct CartView {
    items: Vec<CartLineView>,
    total: Decimal,
}

fn cart_view(items: Vec<CartItem>) -> CartView {
    let priced: Vec<pricing::PricedLine> = items.iter().map(CartItem::priced_line).collect();
    let total = pricing::order_total(&priced);

    let items = items
        .into_iter()
        .map(|item| {
            let line_total = pricing::line_total(&item.priced_line());
            CartLineView {
                title: item.title,
                slug: item.slug,
                quantity: item.quantity,
                price_snapshot: item.price_snapshot,
                line_total,
            }
        })
        .collect();
    CartView { items, total }
}

/// GET /api/cart - the caller's cart with per-line and overall totals.
pub async fn show(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Response> {
    let repo = CartRepository::new(state.pool());
    let cart = repo.get_or_create(current.id()).await?;
    let items = repo.items(cart.id).await?;
    Ok(json_ok(cart_view(items)))
}

/// POST /api/cart/items - add one unit of a game.
///
/// The discounted unit price is frozen into the line on first add;
/// adding the same game again only bumps the quantity.
pub async fn add(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(payload): Json<AddPayload>,
) -> Result<Response> {
    let game = GameRepository::new(state.pool())
        .get_active_by_slug(&payload.slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Game".to_string()))?;

    let percent = game.discount_percent.max(0).unsigned_abs();
    let unit_price = pricing::discounted_price(game.price, percent)?;

    let repo = CartRepository::new(state.pool());
    let cart = repo.get_or_create(current.id()).await?;
    repo.add(cart.id, game.id, unit_price).await?;

    let items = repo.items(cart.id).await?;
    Ok(json_ok(cart_view(items)))
}

/// PATCH /api/cart/items/{slug} - set a line's quantity.
///
/// A quantity of zero (or less) removes the line.
pub async fn set_quantity(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Path(slug): Path<String>,
    Json(payload): Json<QuantityPayload>,
) -> Result<Response> {
    let game = GameRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Game".to_string()))?;

    let repo = CartRepository::new(state.pool());
    let cart = repo.get_or_create(current.id()).await?;
    repo.set_quantity(cart.id, game.id, payload.quantity).await?;

    let items = repo.items(cart.id).await?;
    Ok(json_ok(cart_view(items)))
}

/// DELETE /api/cart/items/{slug} - remove a line.
pub async fn remove(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Path(slug): Path<String>,
) -> Result<Response> {
    let game = GameRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Game".to_string()))?;

    let repo = CartRepository::new(state.pool());
    let cart = repo.get_or_create(current.id()).await?;
    repo.remove(cart.id, game.id).await?;

    let items = repo.items(cart.id).await?;
    Ok(json_ok(cart_view(items)))
}

#[derive(Debug, Serialize)]
struct CheckoutView {
    order_id: i32,
    status: &'static str,
    total_price: Decimal,
}

/// POST /api/cart/checkout - turn the cart into an order.
pub async fn checkout(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Response> {
    let order = OrderRepository::new(state.pool())
        .checkout(current.id())
        .await?
        .ok_or_else(|| AppError::BadRequest("Cart is empty.".to_string()))?;

    Ok(json_created(CheckoutView {
        order_id: order.id.as_i32(),
        status: order.status.as_str(),
        total_price: order.total_price,
    }))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use arcadia_core::GameId;

    use super::*;

    fn item(quantity: i32, price: rust_decimal::Decimal) -> CartItem {
        CartItem {
            game_id: GameId::new(1),
            title: "Hollow Depths".to_string(),
            slug: "hollow-depths".to_string(),
            quantity,
            price_snapshot: price,
        }
    }

    #[test]
    fn test_cart_view_totals_from_snapshots() {
        let view = cart_view(vec![item(2, dec!(9.99)), item(1, dec!(5.00))]);
        assert_eq!(view.total, dec!(24.98));
        assert_eq!(view.items[0].line_total, dec!(19.98));
        assert_eq!(view.items[1].line_total, dec!(5.00));
    }

    #[test]
    fn test_empty_cart_view() {
        let view = cart_view(vec![]);
        assert!(view.items.is_empty());
        assert_eq!(view.total, rust_decimal::Decimal::ZERO);
    }
}
