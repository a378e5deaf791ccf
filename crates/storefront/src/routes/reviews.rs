//! Review endpoints, keyed by game slug.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use arcadia_core::types::Rating;
use arcadia_core::GameId;

use crate::db::games::GameRepository;
use crate::db::reviews::ReviewRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::RequireUser;
use crate::response::{json_ok, json_ok_empty};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReviewPayload {
    /// Stars, 1 through 5. Deserialization rejects anything else.
    pub rating: Rating,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
struct ReviewWritten {
    rating: i32,
    text: String,
    average_rating: f64,
    reviews_count: i64,
}

async fn game_id_by_slug(state: &AppState, slug: &str) -> Result<GameId> {
    GameRepository::new(state.pool())
        .get_active_by_slug(slug)
        .await?
        .map(|g| g.id)
        .ok_or_else(|| AppError::NotFound("Game".to_string()))
}

/// POST /api/games/{slug}/reviews - write or replace the caller's review.
pub async fn upsert(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Path(slug): Path<String>,
    Json(payload): Json<ReviewPayload>,
) -> Result<Response> {
    let game_id = game_id_by_slug(&state, &slug).await?;

    let repo = ReviewRepository::new(state.pool());
    let review = repo
        .upsert(current.id(), game_id, payload.rating.as_i32(), &payload.text)
        .await?;
    let aggregates = repo.aggregates(game_id).await?;

    Ok(json_ok(ReviewWritten {
        rating: review.rating,
        text: review.text,
        average_rating: aggregates.average_or_zero(),
        reviews_count: aggregates.reviews_count,
    }))
}

/// DELETE /api/games/{slug}/reviews - remove the caller's review.
pub async fn remove(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Path(slug): Path<String>,
) -> Result<Response> {
    let game_id = game_id_by_slug(&state, &slug).await?;
    ReviewRepository::new(state.pool())
        .delete(current.id(), game_id)
        .await?;
    Ok(json_ok_empty())
}
