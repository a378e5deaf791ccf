//! Shop listing, game detail and manager catalog endpoints.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use arcadia_core::pricing::{self, MAX_DISCOUNT_PERCENT};
use arcadia_core::types::validate_release_year;
use arcadia_core::CoreError;

use crate::db::games::{GameListFilter, GameRepository, GameSort, GameWrite};
use crate::db::reviews::ReviewRepository;
use crate::db::slugs::{self, SlugNamespace, MAX_SAVE_ATTEMPTS};
use crate::db::taxonomy::NamedRepository;
use crate::error::{AppError, Result};
use crate::middleware::auth::{OptionalUser, RequireManager};
use crate::models::game::{Game, GameListRow};
use crate::pagination::{parse_page, PageInfo, Paginated};
use crate::response::{json_created, json_ok, json_ok_empty};
use crate::state::AppState;

const GAMES_PER_PAGE: u32 = 10;
const DETAIL_REVIEWS: i64 = 5;

#[derive(Debug, Deserialize)]
pub struct GamesQuery {
    pub q: Option<String>,
    pub genre: Option<String>,
    pub platform: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

impl GamesQuery {
    fn filter(&self) -> GameListFilter {
        let clean = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        GameListFilter {
            q: clean(&self.q),
            genre: clean(&self.genre),
            platform: clean(&self.platform),
            sort: GameSort::parse(self.sort.as_deref()),
        }
    }
}

#[derive(Debug, Serialize)]
struct GameSummary {
    id: i32,
    title: String,
    slug: String,
    price: Decimal,
    discount_percent: i32,
    final_price: Decimal,
    average_rating: f64,
    reviews_count: i64,
}

impl GameSummary {
    fn from_row(row: GameListRow) -> Result<Self> {
        let final_price = final_price(row.price, row.discount_percent)?;
        Ok(Self {
            id: row.id.as_i32(),
            title: row.title,
            slug: row.slug,
            price: row.price,
            discount_percent: row.discount_percent,
            final_price,
            average_rating: row.average_rating.unwrap_or(0.0),
            reviews_count: row.reviews_count,
        })
    }
}

#[derive(Debug, Serialize)]
struct NamedView {
    name: String,
    slug: String,
}

#[derive(Debug, Serialize)]
struct ReviewView {
    username: String,
    rating: i32,
    text: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct GameDetail {
    id: i32,
    title: String,
    slug: String,
    description: String,
    price: Decimal,
    discount_percent: i32,
    final_price: Decimal,
    release_year: i32,
    publisher: String,
    developer: Option<String>,
    genres: Vec<NamedView>,
    platforms: Vec<NamedView>,
    tags: Vec<NamedView>,
    average_rating: f64,
    reviews_count: i64,
    reviews: Vec<ReviewView>,
    is_favorited: bool,
}

/// The stored discount is constrained by the schema; a value outside the
/// calculator's range would mean the constraint was bypassed.
fn final_price(price: Decimal, discount_percent: i32) -> Result<Decimal> {
    let percent = u32::try_from(discount_percent)
        .map_err(|_| AppError::Internal(format!("negative discount {discount_percent} stored")))?;
    Ok(pricing::discounted_price(price, percent)?)
}

/// GET /api/games - the shop listing.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<GamesQuery>,
) -> Result<Response> {
    let filter = query.filter();
    let repo = GameRepository::new(state.pool());

    let total = repo.count(&filter).await?;
    let info = PageInfo::resolve(parse_page(query.page.as_deref()), total, GAMES_PER_PAGE);
    let rows = repo
        .list(&filter, i64::from(GAMES_PER_PAGE), info.offset(GAMES_PER_PAGE))
        .await?;

    let items = rows
        .into_iter()
        .map(GameSummary::from_row)
        .collect::<Result<Vec<_>>>()?;
    Ok(json_ok(Paginated {
        items,
        pagination: info,
    }))
}

/// GET /api/games/{slug} - the full detail payload.
pub async fn detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    OptionalUser(viewer): OptionalUser,
) -> Result<Response> {
    let repo = GameRepository::new(state.pool());
    let game = repo
        .get_active_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Game".to_string()))?;

    let genres = repo.genres_of(game.id).await?;
    let platforms = repo.platforms_of(game.id).await?;
    let tags = repo.tags_of(game.id).await?;

    let publisher = NamedRepository::publishers(state.pool())
        .get_by_id(game.publisher_id.as_i32())
        .await?
        .map(|p| p.name)
        .ok_or_else(|| AppError::Internal("game without publisher".to_string()))?;
    let developer = match game.developer_id {
        Some(id) => NamedRepository::developers(state.pool())
            .get_by_id(id.as_i32())
            .await?
            .map(|d| d.name),
        None => None,
    };

    let reviews_repo = ReviewRepository::new(state.pool());
    let aggregates = reviews_repo.aggregates(game.id).await?;
    let reviews = reviews_repo
        .latest_for_game(game.id, DETAIL_REVIEWS)
        .await?
        .into_iter()
        .map(|r| ReviewView {
            username: r.username,
            rating: r.rating,
            text: r.text,
            created_at: r.created_at,
        })
        .collect();

    let is_favorited = match &viewer {
        Some(current) => {
            crate::db::favorites::FavoriteRepository::new(state.pool())
                .contains(current.id(), game.id)
                .await?
        }
        None => false,
    };

    let named = |rows: Vec<crate::models::taxonomy::NamedRow>| {
        rows.into_iter()
            .map(|r| NamedView {
                name: r.name,
                slug: r.slug,
            })
            .collect::<Vec<_>>()
    };

    let final_price = final_price(game.price, game.discount_percent)?;
    Ok(json_ok(GameDetail {
        id: game.id.as_i32(),
        title: game.title,
        slug: game.slug,
        description: game.description,
        price: game.price,
        discount_percent: game.discount_percent,
        final_price,
        release_year: game.release_year,
        publisher,
        developer,
        genres: named(genres),
        platforms: named(platforms),
        tags: named(tags),
        average_rating: aggregates.average_or_zero(),
        reviews_count: aggregates.reviews_count,
        reviews,
        is_favorited,
    }))
}

/// Create payload; update reuses it with every field optional.
#[derive(Debug, Deserialize)]
pub struct GamePayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub discount_percent: Option<i32>,
    pub release_year: Option<i32>,
    pub is_active: Option<bool>,
    /// Publisher slug.
    pub publisher: Option<String>,
    /// Developer slug; explicit `null` clears the developer, an absent
    /// field keeps it.
    #[serde(default, deserialize_with = "double_option")]
    pub developer: Option<Option<String>>,
    pub genres: Option<Vec<String>>,
    pub platforms: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
}

/// Distinguishes a JSON field that is present-but-null from one that is
/// absent: absent stays `None` via `#[serde(default)]`, null becomes
/// `Some(None)`.
fn double_option<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn validate_write(write: &GameWrite) -> Result<()> {
    if write.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required.".to_string()));
    }
    if write.price.is_sign_negative() {
        return Err(AppError::BadRequest("Price must not be negative.".to_string()));
    }
    let percent_ok = (0..=i32::try_from(MAX_DISCOUNT_PERCENT).unwrap_or(i32::MAX))
        .contains(&write.discount_percent);
    if !percent_ok {
        return Err(AppError::BadRequest(format!(
            "Discount must be between 0 and {MAX_DISCOUNT_PERCENT}."
        )));
    }
    validate_release_year(write.release_year).map_err(AppError::Core)?;
    Ok(())
}

async fn resolve_publisher(state: &AppState, slug: &str) -> Result<arcadia_core::PublisherId> {
    NamedRepository::publishers(state.pool())
        .get_by_slug(slug)
        .await?
        .map(|p| arcadia_core::PublisherId::new(p.id))
        .ok_or_else(|| AppError::BadRequest(format!("Unknown publisher '{slug}'.")))
}

async fn resolve_developer(
    state: &AppState,
    slug: &str,
) -> Result<arcadia_core::DeveloperId> {
    NamedRepository::developers(state.pool())
        .get_by_slug(slug)
        .await?
        .map(|d| arcadia_core::DeveloperId::new(d.id))
        .ok_or_else(|| AppError::BadRequest(format!("Unknown developer '{slug}'.")))
}

/// POST /api/games - manager-only game creation.
///
/// The slug is allocated from the title; when a concurrent create claims
/// the same slug between allocation and insert, allocation is retried a
/// bounded number of times before giving up.
pub async fn create(
    State(state): State<AppState>,
    RequireManager(_manager): RequireManager,
    Json(payload): Json<GamePayload>,
) -> Result<Response> {
    let title = payload
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::BadRequest("Title is required.".to_string()))?
        .to_owned();
    let publisher_slug = payload
        .publisher
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("Publisher is required.".to_string()))?;
    let release_year = payload
        .release_year
        .ok_or_else(|| AppError::BadRequest("Release year is required.".to_string()))?;
    let price = payload
        .price
        .ok_or_else(|| AppError::BadRequest("Price is required.".to_string()))?;

    let developer_id = match payload.developer.flatten() {
        Some(slug) => Some(resolve_developer(&state, &slug).await?),
        None => None,
    };
    let write = GameWrite {
        title: title.clone(),
        description: payload.description.unwrap_or_default(),
        price,
        discount_percent: payload.discount_percent.unwrap_or(0),
        release_year,
        is_active: payload.is_active.unwrap_or(true),
        publisher_id: resolve_publisher(&state, publisher_slug).await?,
        developer_id,
    };
    validate_write(&write)?;

    let genres = payload.genres.unwrap_or_default();
    let platforms = payload.platforms.unwrap_or_default();
    let tags = payload.tags.unwrap_or_default();

    let repo = GameRepository::new(state.pool());
    for _ in 0..MAX_SAVE_ATTEMPTS {
        let slug = slugs::allocate(state.pool(), SlugNamespace::Games, &title, None).await?;
        match repo.create(&write, &slug, &genres, &platforms, &tags).await {
            Ok(game) => return Ok(json_created(written_view(game)?)),
            Err(e) if e.is_slug_conflict() => {}
            Err(e) => return Err(e.into()),
        }
    }
    Err(AppError::Core(CoreError::ResourceExhausted(format!(
        "could not save game '{title}' within {MAX_SAVE_ATTEMPTS} slug attempts"
    ))))
}

/// PATCH /api/games/{slug} - manager-only partial update.
///
/// The slug never changes on update, even when the title does.
pub async fn update(
    State(state): State<AppState>,
    RequireManager(_manager): RequireManager,
    Path(slug): Path<String>,
    Json(payload): Json<GamePayload>,
) -> Result<Response> {
    let repo = GameRepository::new(state.pool());
    let game = repo
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Game".to_string()))?;

    let publisher_id = match payload.publisher.as_deref() {
        Some(publisher_slug) => resolve_publisher(&state, publisher_slug).await?,
        None => game.publisher_id,
    };
    let developer_id = match payload.developer {
        // Field absent: keep; present and null: clear; present: resolve.
        None => game.developer_id,
        Some(None) => None,
        Some(Some(developer_slug)) => Some(resolve_developer(&state, &developer_slug).await?),
    };

    let write = GameWrite {
        title: payload.title.unwrap_or(game.title),
        description: payload.description.unwrap_or(game.description),
        price: payload.price.unwrap_or(game.price),
        discount_percent: payload.discount_percent.unwrap_or(game.discount_percent),
        release_year: payload.release_year.unwrap_or(game.release_year),
        is_active: payload.is_active.unwrap_or(game.is_active),
        publisher_id,
        developer_id,
    };
    validate_write(&write)?;

    let updated = repo
        .update(
            game.id,
            &write,
            payload.genres.as_deref(),
            payload.platforms.as_deref(),
            payload.tags.as_deref(),
        )
        .await?;
    Ok(json_ok(written_view(updated)?))
}

/// DELETE /api/games/{slug} - manager-only removal.
pub async fn remove(
    State(state): State<AppState>,
    RequireManager(_manager): RequireManager,
    Path(slug): Path<String>,
) -> Result<Response> {
    GameRepository::new(state.pool()).delete_by_slug(&slug).await?;
    Ok(json_ok_empty())
}

/// Compact echo of a written game, shared by create and update.
#[derive(Debug, Serialize)]
struct GameWritten {
    id: i32,
    title: String,
    slug: String,
    price: Decimal,
    discount_percent: i32,
    final_price: Decimal,
    is_active: bool,
}

fn written_view(game: Game) -> Result<GameWritten> {
    let final_price = final_price(game.price, game.discount_percent)?;
    Ok(GameWritten {
        id: game.id.as_i32(),
        title: game.title,
        slug: game.slug,
        price: game.price,
        discount_percent: game.discount_percent,
        final_price,
        is_active: game.is_active,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_query_filter_drops_blank_params() {
        let query = GamesQuery {
            q: Some("  ".to_string()),
            genre: Some("rpg".to_string()),
            platform: Some(String::new()),
            sort: Some("price_desc".to_string()),
            page: None,
        };
        let filter = query.filter();
        assert_eq!(filter.q, None);
        assert_eq!(filter.genre.as_deref(), Some("rpg"));
        assert_eq!(filter.platform, None);
        assert_eq!(filter.sort, GameSort::PriceDesc);
    }

    #[test]
    fn test_final_price_applies_discount() {
        assert_eq!(final_price(dec!(19.99), 10).unwrap(), dec!(17.99));
        assert_eq!(final_price(dec!(19.99), 0).unwrap(), dec!(19.99));
    }

    #[test]
    fn test_negative_stored_discount_is_internal() {
        let err = final_price(dec!(10.00), -1).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_payload_developer_field_tristate() {
        let absent: GamePayload = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(absent.developer, None);

        let null: GamePayload = serde_json::from_str(r#"{"developer": null}"#).unwrap();
        assert_eq!(null.developer, Some(None));

        let set: GamePayload = serde_json::from_str(r#"{"developer": "cobalt-owl"}"#).unwrap();
        assert_eq!(set.developer, Some(Some("cobalt-owl".to_string())));
    }
}
