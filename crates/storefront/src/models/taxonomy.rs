//! Slugged name records: genres, platforms, tags, publishers, developers.

use sqlx::FromRow;

/// A named record with a unique slug.
///
/// All five taxonomy-style tables share this shape; the repository picks
/// the table, the row layout is identical.
#[derive(Debug, Clone, FromRow)]
pub struct NamedRow {
    pub id: i32,
    pub name: String,
    pub slug: String,
}
