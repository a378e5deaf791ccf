//! News listing and detail endpoints.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::news::NewsRepository;
use crate::error::{AppError, Result};
use crate::models::news::NewsPost;
use crate::pagination::{parse_page, PageInfo, Paginated};
use crate::response::json_ok;
use crate::state::AppState;

const NEWS_PER_PAGE: u32 = 10;

#[derive(Debug, Deserialize)]
pub struct NewsQuery {
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
struct NewsSummary {
    title: String,
    slug: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct NewsDetail {
    title: String,
    slug: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<NewsPost> for NewsDetail {
    fn from(post: NewsPost) -> Self {
        Self {
            title: post.title,
            slug: post.slug,
            content: post.content,
            created_at: post.created_at,
        }
    }
}

/// GET /api/news - newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> Result<Response> {
    let repo = NewsRepository::new(state.pool());

    let total = repo.count().await?;
    let info = PageInfo::resolve(parse_page(query.page.as_deref()), total, NEWS_PER_PAGE);
    let items: Vec<NewsSummary> = repo
        .list(i64::from(NEWS_PER_PAGE), info.offset(NEWS_PER_PAGE))
        .await?
        .into_iter()
        .map(|p| NewsSummary {
            title: p.title,
            slug: p.slug,
            created_at: p.created_at,
        })
        .collect();

    Ok(json_ok(Paginated {
        items,
        pagination: info,
    }))
}

/// GET /api/news/{slug}
pub async fn detail(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Response> {
    let post = NewsRepository::new(state.pool())
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("News post".to_string()))?;
    Ok(json_ok(NewsDetail::from(post)))
}
