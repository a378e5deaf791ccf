//! Name-table listing endpoints for filter dropdowns.

use axum::extract::State;
use axum::response::Response;
use serde::Serialize;

use crate::db::taxonomy::NamedRepository;
use crate::error::Result;
use crate::response::json_ok;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct NamedView {
    name: String,
    slug: String,
}

async fn list(repo: NamedRepository<'_>) -> Result<Response> {
    let items: Vec<NamedView> = repo
        .list()
        .await?
        .into_iter()
        .map(|r| NamedView {
            name: r.name,
            slug: r.slug,
        })
        .collect();
    Ok(json_ok(items))
}

/// GET /api/genres
pub async fn genres(State(state): State<AppState>) -> Result<Response> {
    list(NamedRepository::genres(state.pool())).await
}

/// GET /api/platforms
pub async fn platforms(State(state): State<AppState>) -> Result<Response> {
    list(NamedRepository::platforms(state.pool())).await
}

/// GET /api/tags
pub async fn tags(State(state): State<AppState>) -> Result<Response> {
    list(NamedRepository::tags(state.pool())).await
}

/// GET /api/publishers
pub async fn publishers(State(state): State<AppState>) -> Result<Response> {
    list(NamedRepository::publishers(state.pool())).await
}

/// GET /api/developers
pub async fn developers(State(state): State<AppState>) -> Result<Response> {
    list(NamedRepository::developers(state.pool())).await
}
