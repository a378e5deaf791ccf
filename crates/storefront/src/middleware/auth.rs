//! Extractors resolving the session into a user.
//!
//! The session stores only the user id; the user row and group list are
//! re-read per request so bans and group changes apply immediately.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;

use arcadia_core::UserId;

use crate::db::users::UserRepository;
use crate::error::AppError;
use crate::models::session_keys;
use crate::models::user::CurrentUser;
use crate::state::AppState;

async fn current_user(
    parts: &mut Parts,
    state: &AppState,
) -> Result<Option<CurrentUser>, AppError> {
    let session = Session::from_request_parts(parts, state)
        .await
        .map_err(|(_, msg)| AppError::Internal(msg.to_string()))?;

    let Some(user_id) = session
        .get::<i32>(session_keys::USER_ID)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    else {
        return Ok(None);
    };

    let current = UserRepository::new(state.pool())
        .get_current(UserId::new(user_id))
        .await?;
    Ok(current)
}

/// Extractor requiring an authenticated user. Rejects with 401.
pub struct RequireUser(pub CurrentUser);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        current_user(parts, state)
            .await?
            .map(Self)
            .ok_or_else(|| AppError::Unauthorized("login required".to_string()))
    }
}

/// Extractor requiring a manager (or superuser). Rejects with 401 when
/// anonymous, 403 when authenticated without the group.
pub struct RequireManager(pub CurrentUser);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireUser(current) = RequireUser::from_request_parts(parts, state).await?;
        if !current.is_manager() {
            return Err(AppError::Forbidden("manager group required".to_string()));
        }
        Ok(Self(current))
    }
}

/// Extractor for routes that personalize but do not require login.
pub struct OptionalUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(current_user(parts, state).await?))
    }
}
