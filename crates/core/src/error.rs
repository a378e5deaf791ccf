//! Domain error types.
//!
//! All core failures are value-based results so callers can pattern-match
//! and map each kind to the appropriate user-facing response. Exceptions
//! are never used for control flow.

use thiserror::Error;

use crate::status::OrderStatus;

/// Errors produced by the pure domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An input violated a domain invariant (bad discount percent,
    /// negative price, out-of-range rating, ...).
    ///
    /// Financial values are never silently clamped; out-of-range input
    /// is always surfaced as this kind.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A bounded retry loop ran out of attempts.
    ///
    /// Surfaced by slug allocation when the suffix bound is exceeded.
    /// This indicates a systemic data problem, not user error, and maps
    /// to a 500-class response.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// An order status transition not permitted by the state machine.
    #[error("invalid order status transition: {from} -> {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },
}

impl CoreError {
    /// Shorthand for an [`CoreError::InvalidArgument`] with a formatted message.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
