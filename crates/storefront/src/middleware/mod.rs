//! Request middleware: session plumbing and auth extractors.

pub mod auth;
pub mod session;
