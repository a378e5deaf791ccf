//! Database-facing domain models.
//!
//! These structs map table rows (via `sqlx::FromRow`) into typed values.
//! API view types live next to their route handlers; repositories return
//! these models and the routes shape them for the wire.

pub mod cart;
pub mod game;
pub mod news;
pub mod order;
pub mod review;
pub mod taxonomy;
pub mod user;

/// Session keys used by the storefront.
pub mod session_keys {
    /// Logged-in user's ID.
    pub const USER_ID: &str = "user_id";
}
