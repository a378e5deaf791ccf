//! Arcadia storefront API server.
//!
//! Serves the public JSON API for the games storefront: catalog browsing
//! with filters and pagination, session-based accounts, carts with frozen
//! price snapshots, demo checkout and the manager order workflow.

mod bootstrap;
mod config;
mod db;
mod error;
mod middleware;
mod models;
mod pagination;
mod response;
mod routes;
mod services;
mod state;

use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::StorefrontConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "arcadia_storefront=debug,tower_http=debug,sqlx=warn".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StorefrontConfig::from_env()?;
    let addr = config.socket_addr();
    let secure_cookies = config.base_url.starts_with("https://");

    let pool = db::create_pool(&config.database_url).await?;
    sqlx::migrate!().run(&pool).await?;
    bootstrap::ensure_default_groups(&pool).await?;

    let session_layer = middleware::session::session_layer(pool.clone(), secure_cookies).await?;
    let state = AppState::new(config, pool);

    let app = routes::router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(session_layer),
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Storefront API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutting down"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signal"),
    }
}
