//! Application services sitting between routes and repositories.

pub mod auth;
