//! News post model.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use arcadia_core::NewsId;

/// A news post on the storefront home page.
#[derive(Debug, Clone, FromRow)]
pub struct NewsPost {
    pub id: NewsId,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
