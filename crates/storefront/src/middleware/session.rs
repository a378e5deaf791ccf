//! Session layer backed by the application database.

use sqlx::PgPool;
use tower_sessions::cookie::time::Duration;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

/// Cookie name for the session id.
const SESSION_COOKIE: &str = "arcadia_session";

/// Sessions idle for this long expire.
const SESSION_TTL_DAYS: i64 = 14;

/// Build the session layer over a `PostgreSQL`-backed store.
///
/// `secure_cookies` follows the public base URL scheme, not the
/// listener's: TLS termination happens upstream.
///
/// # Errors
///
/// Returns an error if the session table migration fails.
pub async fn session_layer(
    pool: PgPool,
    secure_cookies: bool,
) -> Result<SessionManagerLayer<PostgresStore>, sqlx::Error> {
    let store = PostgresStore::new(pool);
    store.migrate().await?;

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE)
        .with_same_site(SameSite::Lax)
        .with_secure(secure_cookies)
        .with_expiry(Expiry::OnInactivity(Duration::days(SESSION_TTL_DAYS))))
}
