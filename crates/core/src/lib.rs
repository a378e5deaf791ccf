//! Arcadia Core - Pure domain logic for the games storefront.
//!
//! This crate contains the business rules shared by the storefront server
//! and the CLI tools:
//!
//! - [`slug`] - URL-safe unique slug derivation with deterministic
//!   collision suffixing
//! - [`pricing`] - Discount and cart/order total arithmetic in fixed-point
//!   decimal
//! - [`status`] - Order and payment status state machines
//! - [`types`] - Newtype IDs and validated value types
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. Anything that needs to look at stored data
//! (e.g. the slug existence check) receives it as an injected callback,
//! so every rule here is testable without a database.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod pricing;
pub mod slug;
pub mod status;
pub mod types;

pub use error::CoreError;
pub use status::{OrderStatus, PaymentStatus};
pub use types::*;
