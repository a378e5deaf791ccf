//! Unified error handling for the API.
//!
//! Provides a unified `AppError` type mapping domain, repository and auth
//! failures to HTTP statuses. All route handlers return
//! `Result<T, AppError>`; responses use the standard JSON envelope.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use arcadia_core::CoreError;

use crate::db::RepositoryError;
use crate::response::json_error;
use crate::services::auth::AuthError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Domain rule violated.
    #[error("Domain error: {0}")]
    Core(#[from] CoreError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but lacking the required group.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<crate::db::slugs::SlugAllocationError> for AppError {
    fn from(err: crate::db::slugs::SlugAllocationError) -> Self {
        use crate::db::slugs::SlugAllocationError;
        match err {
            SlugAllocationError::Repository(e) => Self::Database(e),
            SlugAllocationError::Exhausted(e) => Self::Core(e),
        }
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Core(err) => match err {
                CoreError::InvalidArgument(_) | CoreError::InvalidTransition { .. } => {
                    StatusCode::BAD_REQUEST
                }
                // Exhausted slug retries indicate a systemic data problem.
                CoreError::ResourceExhausted(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Auth(err) => err.status(),
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Internal details never leak.
    fn message(&self) -> String {
        match self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => "Not found.".to_string(),
                RepositoryError::Conflict(msg) => msg.clone(),
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    "Internal server error.".to_string()
                }
            },
            Self::Core(err) => match err {
                CoreError::ResourceExhausted(_) => "Internal server error.".to_string(),
                other => other.to_string(),
            },
            Self::Auth(err) => err.message(),
            Self::Internal(_) => "Internal server error.".to_string(),
            Self::NotFound(what) => format!("{what} not found."),
            Self::Unauthorized(_) => "Authentication required.".to_string(),
            Self::Forbidden(_) => "Permission denied.".to_string(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request error");
        }

        json_error(status, self.message())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(AppError::NotFound("Game".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Unauthorized("login".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::Forbidden("manager".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(AppError::BadRequest("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_core_error_mapping() {
        assert_eq!(
            status_of(AppError::Core(CoreError::invalid_argument("pct"))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Core(CoreError::ResourceExhausted(
                "slug".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_error_mapping() {
        assert_eq!(
            status_of(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Database(RepositoryError::Conflict(
                "username already exists".to_string()
            ))),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_internal_details_do_not_leak() {
        let err = AppError::Internal("secret connection string".to_string());
        assert_eq!(err.message(), "Internal server error.");
    }
}
