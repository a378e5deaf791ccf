//! HTTP route handlers and router assembly.
//!
//! # Route table
//!
//! | Method | Path | Auth | Handler |
//! |--------|------|------|---------|
//! | GET | `/api/health` | - | liveness |
//! | GET | `/api/ready` | - | readiness (checks the database) |
//! | POST | `/api/auth/register` | - | create an account |
//! | POST | `/api/auth/login` | - | start a session |
//! | POST | `/api/auth/logout` | session | end the session |
//! | GET | `/api/auth/me` | session | current account |
//! | GET | `/api/games` | - | shop listing (q, genre, platform, sort, page) |
//! | POST | `/api/games` | manager | create a game |
//! | GET | `/api/games/{slug}` | - | game detail |
//! | PATCH | `/api/games/{slug}` | manager | update a game |
//! | DELETE | `/api/games/{slug}` | manager | delete a game |
//! | POST | `/api/games/{slug}/reviews` | session | write/replace own review |
//! | DELETE | `/api/games/{slug}/reviews` | session | delete own review |
//! | POST | `/api/games/{slug}/favorite` | session | toggle favorite |
//! | GET | `/api/favorites` | session | own favorites |
//! | GET | `/api/genres` (platforms, tags, publishers, developers) | - | name lists |
//! | GET | `/api/news` | - | news listing (page) |
//! | GET | `/api/news/{slug}` | - | news detail |
//! | GET | `/api/cart` | session | own cart |
//! | POST | `/api/cart/items` | session | add a game |
//! | PATCH | `/api/cart/items/{slug}` | session | set quantity |
//! | DELETE | `/api/cart/items/{slug}` | session | remove a line |
//! | POST | `/api/cart/checkout` | session | place an order |
//! | GET | `/api/orders` | session | own orders |
//! | GET | `/api/orders/{id}` | session | own order detail |
//! | GET | `/api/manage/orders` | manager | all orders (status, page) |
//! | POST | `/api/manage/orders/{id}/status` | manager | advance an order |

use axum::routing::{get, patch, post};
use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod cart;
pub mod favorites;
pub mod games;
pub mod health;
pub mod news;
pub mod orders;
pub mod reviews;
pub mod taxonomy;

/// Assemble the full application router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/games", get(games::list).post(games::create))
        .route(
            "/games/{slug}",
            get(games::detail)
                .patch(games::update)
                .delete(games::remove),
        )
        .route(
            "/games/{slug}/reviews",
            post(reviews::upsert).delete(reviews::remove),
        )
        .route("/games/{slug}/favorite", post(favorites::toggle))
        .route("/favorites", get(favorites::list))
        .route("/genres", get(taxonomy::genres))
        .route("/platforms", get(taxonomy::platforms))
        .route("/tags", get(taxonomy::tags))
        .route("/publishers", get(taxonomy::publishers))
        .route("/developers", get(taxonomy::developers))
        .route("/news", get(news::list))
        .route("/news/{slug}", get(news::detail))
        .route("/cart", get(cart::show))
        .route("/cart/items", post(cart::add))
        .route(
            "/cart/items/{slug}",
            patch(cart::set_quantity).delete(cart::remove),
        )
        .route("/cart/checkout", post(cart::checkout))
        .route("/orders", get(orders::list))
        .route("/orders/{id}", get(orders::detail))
        .route("/manage/orders", get(orders::manage_list))
        .route("/manage/orders/{id}/status", post(orders::manage_status));

    Router::new().nest("/api", api).with_state(state)
}
