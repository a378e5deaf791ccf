//! Demo data for local development and demos.
//!
//! Everything here is idempotent: names are looked up before insertion
//! and community rows rely on their unique constraints, so re-running
//! `arcadia seed` changes nothing.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;
use thiserror::Error;

use arcadia_core::slug::SlugCandidates;

/// Password shared by every demo account.
const DEMO_PASSWORD: &str = "arcadia-demo";

/// Fixed RNG seed so reviews and favorites land on the same rows every
/// run.
const RNG_SEED: u64 = 42;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("password hashing failed")]
    Hash,
    #[error("no free slug for '{0}'")]
    SlugExhausted(String),
}

struct GameSeed {
    title: &'static str,
    price: Decimal,
    discount: i32,
    year: i32,
    publisher: &'static str,
    developer: Option<&'static str>,
    genres: &'static [&'static str],
    platforms: &'static [&'static str],
    tags: &'static [&'static str],
    description: &'static str,
}

const GENRES: [&str; 5] = ["Action", "RPG", "Strategy", "Indie", "Simulation"];
const PLATFORMS: [&str; 4] = ["PC", "PlayStation 5", "Xbox Series X", "Nintendo Switch"];
const TAGS: [&str; 8] = [
    "Co-op",
    "Open World",
    "Roguelike",
    "Pixel Art",
    "Story Rich",
    "Multiplayer",
    "Horror",
    "Puzzle",
];
const PUBLISHERS: [&str; 3] = ["Nova Interactive", "Pixel Forge", "Iron Horizon"];
const DEVELOPERS: [&str; 4] = [
    "Lunar Byte Studio",
    "Cobalt Owl",
    "Red Harbor Games",
    "Tin Whistle Works",
];

fn games() -> Vec<GameSeed> {
    vec![
        GameSeed {
            title: "Hollow Depths",
            price: dec!(29.99),
            discount: 0,
            year: 2023,
            publisher: "Nova Interactive",
            developer: Some("Lunar Byte Studio"),
            genres: &["Action", "Indie"],
            platforms: &["PC", "Nintendo Switch"],
            tags: &["Roguelike", "Pixel Art"],
            description: "Descend through a collapsing mine where every floor rearranges itself.",
        },
        GameSeed {
            title: "Starling Fleet",
            price: dec!(49.99),
            discount: 15,
            year: 2024,
            publisher: "Iron Horizon",
            developer: Some("Cobalt Owl"),
            genres: &["Strategy"],
            platforms: &["PC"],
            tags: &["Multiplayer"],
            description: "Command a migratory armada across a procedurally seeded galaxy.",
        },
        GameSeed {
            title: "Ember Road",
            price: dec!(39.99),
            discount: 0,
            year: 2022,
            publisher: "Nova Interactive",
            developer: Some("Red Harbor Games"),
            genres: &["RPG"],
            platforms: &["PC", "PlayStation 5", "Xbox Series X"],
            tags: &["Story Rich", "Open World"],
            description: "A caravan RPG about keeping strangers alive on a thousand-mile walk.",
        },
        GameSeed {
            title: "Greenhouse Nine",
            price: dec!(19.99),
            discount: 10,
            year: 2024,
            publisher: "Pixel Forge",
            developer: Some("Tin Whistle Works"),
            genres: &["Simulation", "Indie"],
            platforms: &["PC", "Nintendo Switch"],
            tags: &["Puzzle"],
            description: "Grow impossible plants for impossible clients in a space-station nursery.",
        },
        GameSeed {
            title: "Night Ferry",
            price: dec!(24.99),
            discount: 0,
            year: 2023,
            publisher: "Pixel Forge",
            developer: Some("Lunar Byte Studio"),
            genres: &["Action", "Indie"],
            platforms: &["PC", "PlayStation 5"],
            tags: &["Horror", "Story Rich"],
            description: "The last boat of the night takes a route that is not on any map.",
        },
        GameSeed {
            title: "Clockwork Orchard",
            price: dec!(14.99),
            discount: 25,
            year: 2021,
            publisher: "Pixel Forge",
            developer: Some("Tin Whistle Works"),
            genres: &["Indie", "Strategy"],
            platforms: &["PC", "Nintendo Switch"],
            tags: &["Pixel Art", "Puzzle"],
            description: "Prune, graft and rewind a mechanical orchard one season at a time.",
        },
        GameSeed {
            title: "Iron Meridian",
            price: dec!(59.99),
            discount: 0,
            year: 2025,
            publisher: "Iron Horizon",
            developer: Some("Red Harbor Games"),
            genres: &["Action", "RPG"],
            platforms: &["PC", "PlayStation 5", "Xbox Series X"],
            tags: &["Open World", "Multiplayer"],
            description: "A frontier war fought along a single contested line of longitude.",
        },
        GameSeed {
            title: "Salt and Signal",
            price: dec!(34.99),
            discount: 20,
            year: 2022,
            publisher: "Nova Interactive",
            developer: Some("Cobalt Owl"),
            genres: &["Strategy", "Simulation"],
            platforms: &["PC"],
            tags: &["Co-op"],
            description: "Run a lighthouse network on a coast that keeps moving.",
        },
        GameSeed {
            title: "Paper Lantern",
            price: dec!(9.99),
            discount: 0,
            year: 2020,
            publisher: "Pixel Forge",
            developer: None,
            genres: &["Indie"],
            platforms: &["PC", "Nintendo Switch"],
            tags: &["Story Rich", "Pixel Art"],
            description: "A quiet festival night told entirely through light and shadow.",
        },
        GameSeed {
            title: "Vault of Hours",
            price: dec!(44.99),
            discount: 5,
            year: 2024,
            publisher: "Iron Horizon",
            developer: Some("Lunar Byte Studio"),
            genres: &["RPG", "Strategy"],
            platforms: &["PC", "Xbox Series X"],
            tags: &["Roguelike", "Story Rich"],
            description: "Spend minutes like currency in a bank that loans out time itself.",
        },
        GameSeed {
            title: "Driftwood Kings",
            price: dec!(27.99),
            discount: 0,
            year: 2023,
            publisher: "Nova Interactive",
            developer: Some("Red Harbor Games"),
            genres: &["Action", "Simulation"],
            platforms: &["PC", "PlayStation 5"],
            tags: &["Open World", "Co-op"],
            description: "Build rafts, claim tides and crown yourself on a drowned archipelago.",
        },
        GameSeed {
            title: "The Gloaming Shift",
            price: dec!(21.99),
            discount: 30,
            year: 2021,
            publisher: "Pixel Forge",
            developer: Some("Cobalt Owl"),
            genres: &["Indie", "Action"],
            platforms: &["PC"],
            tags: &["Horror", "Roguelike"],
            description: "Work the night shift at a facility whose rooms forget their shape.",
        },
        GameSeed {
            title: "Cartographer's Debt",
            price: dec!(17.99),
            discount: 0,
            year: 2022,
            publisher: "Nova Interactive",
            developer: Some("Tin Whistle Works"),
            genres: &["Strategy", "Indie"],
            platforms: &["PC", "Nintendo Switch"],
            tags: &["Puzzle", "Story Rich"],
            description: "Map a country that charges you for every mistake you draw.",
        },
        GameSeed {
            title: "Redline Chorus",
            price: dec!(54.99),
            discount: 10,
            year: 2025,
            publisher: "Iron Horizon",
            developer: Some("Red Harbor Games"),
            genres: &["Action"],
            platforms: &["PlayStation 5", "Xbox Series X", "PC"],
            tags: &["Multiplayer", "Co-op"],
            description: "Synchronized combat racing where the soundtrack is the track.",
        },
        GameSeed {
            title: "Winter Archive",
            price: dec!(12.99),
            discount: 0,
            year: 2024,
            publisher: "Pixel Forge",
            developer: Some("Lunar Byte Studio"),
            genres: &["Indie", "Simulation"],
            platforms: &["PC"],
            tags: &["Story Rich", "Puzzle"],
            description: "Catalogue the belongings of a research station before the ice takes it.",
        },
    ]
}

const NEWS: [(&str, &str); 3] = [
    (
        "Winter sale now live",
        "Discounts across the catalog until the end of the month, including \
         The Gloaming Shift at 30% off.",
    ),
    (
        "Iron Meridian launches",
        "Red Harbor Games' frontier RPG is out now on all platforms, with \
         cross-play enabled from day one.",
    ),
    (
        "Community reviews arrive",
        "You can now rate any game in the catalog from one to five stars and \
         leave a short review. One review per game per account; writing again \
         replaces your previous one.",
    ),
];

/// Load the demo data set.
///
/// # Errors
///
/// Returns an error if any query fails.
pub async fn run(pool: &PgPool) -> Result<(), SeedError> {
    seed_taxonomy(pool).await?;
    let user_ids = seed_users(pool).await?;
    let game_ids = seed_games(pool).await?;
    seed_news(pool).await?;
    seed_community(pool, &user_ids, &game_ids).await?;
    tracing::info!("Seed complete");
    Ok(())
}

async fn seed_taxonomy(pool: &PgPool) -> Result<(), SeedError> {
    for name in GENRES {
        upsert_named(pool, "genres", name).await?;
    }
    for name in PLATFORMS {
        upsert_named(pool, "platforms", name).await?;
    }
    for name in TAGS {
        upsert_named(pool, "tags", name).await?;
    }
    for name in PUBLISHERS {
        upsert_named(pool, "publishers", name).await?;
    }
    for name in DEVELOPERS {
        upsert_named(pool, "developers", name).await?;
    }
    tracing::info!("Taxonomy seeded");
    Ok(())
}

async fn seed_users(pool: &PgPool) -> Result<Vec<i32>, SeedError> {
    let mut ids = Vec::new();
    for n in 1..=6 {
        let username = format!("player{n}");
        let email = format!("player{n}@example.com");
        ids.push(ensure_user(pool, &username, &email).await?);
    }

    let manager_id = ensure_user(pool, "manager1", "manager1@example.com").await?;
    sqlx::query(
        "INSERT INTO user_groups (user_id, group_id) \
         SELECT $1, id FROM groups WHERE name = 'manager' \
         ON CONFLICT DO NOTHING",
    )
    .bind(manager_id)
    .execute(pool)
    .await?;

    tracing::info!(players = ids.len(), "Accounts seeded");
    Ok(ids)
}

async fn seed_games(pool: &PgPool) -> Result<Vec<i32>, SeedError> {
    let mut ids = Vec::new();
    for game in games() {
        ids.push(ensure_game(pool, &game).await?);
    }
    tracing::info!(games = ids.len(), "Catalog seeded");
    Ok(ids)
}

async fn seed_news(pool: &PgPool) -> Result<(), SeedError> {
    for (title, content) in NEWS {
        let existing: Option<(i32,)> = sqlx::query_as("SELECT id FROM news WHERE title = $1")
            .bind(title)
            .fetch_optional(pool)
            .await?;
        if existing.is_some() {
            continue;
        }
        let slug = allocate_slug(pool, "news", title).await?;
        sqlx::query("INSERT INTO news (title, slug, content) VALUES ($1, $2, $3)")
            .bind(title)
            .bind(&slug)
            .bind(content)
            .execute(pool)
            .await?;
    }
    tracing::info!("News seeded");
    Ok(())
}

async fn seed_community(
    pool: &PgPool,
    user_ids: &[i32],
    game_ids: &[i32],
) -> Result<(), SeedError> {
    const REVIEW_TEXTS: [&str; 5] = [
        "Exactly my kind of thing.",
        "Rough around the edges but worth it.",
        "Lost a whole weekend to this.",
        "Great soundtrack, decent game.",
        "Would recommend to a friend.",
    ];

    let mut rng = StdRng::seed_from_u64(RNG_SEED);

    for _ in 0..20 {
        let user_id = user_ids[rng.random_range(0..user_ids.len())];
        let game_id = game_ids[rng.random_range(0..game_ids.len())];
        let rating: i32 = rng.random_range(3..=5);
        let text = REVIEW_TEXTS[rng.random_range(0..REVIEW_TEXTS.len())];

        sqlx::query(
            "INSERT INTO reviews (user_id, game_id, rating, text) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, game_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(game_id)
        .bind(rating)
        .bind(text)
        .execute(pool)
        .await?;
    }

    for _ in 0..10 {
        let user_id = user_ids[rng.random_range(0..user_ids.len())];
        let game_id = game_ids[rng.random_range(0..game_ids.len())];
        sqlx::query(
            "INSERT INTO favorites (user_id, game_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, game_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(game_id)
        .execute(pool)
        .await?;
    }

    tracing::info!("Community content seeded");
    Ok(())
}

/// Insert a named row if the name is not yet present, returning its id.
async fn upsert_named(pool: &PgPool, table: &str, name: &str) -> Result<i32, SeedError> {
    let existing: Option<(i32,)> =
        sqlx::query_as(&format!("SELECT id FROM {table} WHERE name = $1"))
            .bind(name)
            .fetch_optional(pool)
            .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let slug = allocate_slug(pool, table, name).await?;
    let (id,): (i32,) = sqlx::query_as(&format!(
        "INSERT INTO {table} (name, slug) VALUES ($1, $2) RETURNING id"
    ))
    .bind(name)
    .bind(&slug)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

async fn ensure_user(pool: &PgPool, username: &str, email: &str) -> Result<i32, SeedError> {
    let existing: Option<(i32,)> = sqlx::query_as("SELECT id FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(DEMO_PASSWORD.as_bytes(), &salt)
        .map_err(|_| SeedError::Hash)?
        .to_string();

    let (id,): (i32,) = sqlx::query_as(
        "INSERT INTO users (username, email, password_hash) \
         VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(username)
    .bind(email)
    .bind(&hash)
    .fetch_one(pool)
    .await?;

    sqlx::query(
        "INSERT INTO user_groups (user_id, group_id) \
         SELECT $1, id FROM groups WHERE name = 'client' \
         ON CONFLICT DO NOTHING",
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(id)
}

async fn ensure_game(pool: &PgPool, game: &GameSeed) -> Result<i32, SeedError> {
    let existing: Option<(i32,)> = sqlx::query_as("SELECT id FROM games WHERE title = $1")
        .bind(game.title)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let publisher_id = upsert_named(pool, "publishers", game.publisher).await?;
    let developer_id = match game.developer {
        Some(name) => Some(upsert_named(pool, "developers", name).await?),
        None => None,
    };

    let slug = allocate_slug(pool, "games", game.title).await?;
    let (id,): (i32,) = sqlx::query_as(
        "INSERT INTO games \
         (title, slug, description, price, discount_percent, release_year, \
          is_active, publisher_id, developer_id) \
         VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7, $8) RETURNING id",
    )
    .bind(game.title)
    .bind(&slug)
    .bind(game.description)
    .bind(game.price)
    .bind(game.discount)
    .bind(game.year)
    .bind(publisher_id)
    .bind(developer_id)
    .fetch_one(pool)
    .await?;

    link_named(pool, "game_genres", "genre_id", "genres", id, game.genres).await?;
    link_named(
        pool,
        "game_platforms",
        "platform_id",
        "platforms",
        id,
        game.platforms,
    )
    .await?;
    link_named(pool, "game_tags", "tag_id", "tags", id, game.tags).await?;

    Ok(id)
}

async fn link_named(
    pool: &PgPool,
    link_table: &str,
    link_column: &str,
    named_table: &str,
    game_id: i32,
    names: &[&str],
) -> Result<(), SeedError> {
    for name in names {
        let target_id = upsert_named(pool, named_table, name).await?;
        sqlx::query(&format!(
            "INSERT INTO {link_table} (game_id, {link_column}) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING"
        ))
        .bind(game_id)
        .bind(target_id)
        .execute(pool)
        .await?;
    }
    Ok(())
}

/// Walk the candidate sequence until a slug no row in `table` holds.
async fn allocate_slug(pool: &PgPool, table: &str, base_text: &str) -> Result<String, SeedError> {
    let query = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE slug = $1)");
    for candidate in SlugCandidates::for_text(base_text) {
        let (taken,): (bool,) = sqlx::query_as(&query)
            .bind(&candidate)
            .fetch_one(pool)
            .await?;
        if !taken {
            return Ok(candidate);
        }
    }
    Err(SeedError::SlugExhausted(base_text.to_owned()))
}
