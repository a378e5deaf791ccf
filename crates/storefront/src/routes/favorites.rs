//! Favorite toggling and listing.

use axum::extract::{Path, State};
use axum::response::Response;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::db::favorites::FavoriteRepository;
use crate::db::games::GameRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireUser;
use crate::response::json_ok;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct FavoriteView {
    title: String,
    slug: String,
    average_rating: f64,
    favorited_at: DateTime<Utc>,
}

/// POST /api/games/{slug}/favorite - add or remove the game from the
/// caller's favorites, reporting which happened.
pub async fn toggle(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Path(slug): Path<String>,
) -> Result<Response> {
    let game = GameRepository::new(state.pool())
        .get_active_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Game".to_string()))?;

    let outcome = FavoriteRepository::new(state.pool())
        .toggle(current.id(), game.id)
        .await?;
    Ok(json_ok(json!({ "is_favorite": outcome.is_favorite() })))
}

/// GET /api/favorites - the caller's favorites, newest first.
pub async fn list(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Response> {
    let items: Vec<FavoriteView> = FavoriteRepository::new(state.pool())
        .list(current.id())
        .await?
        .into_iter()
        .map(|f| FavoriteView {
            title: f.title,
            slug: f.slug,
            average_rating: f.average_rating.unwrap_or(0.0),
            favorited_at: f.favorited_at,
        })
        .collect();
    Ok(json_ok(items))
}
