//! Registration, login, logout and the current-account endpoint.

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::middleware::auth::RequireUser;
use crate::models::session_keys;
use crate::models::user::{CurrentUser, User};
use crate::response::{json_created, json_ok, json_ok_empty};
use crate::services::auth::AuthService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
struct AccountView {
    id: i32,
    username: String,
    email: String,
    groups: Vec<String>,
    is_manager: bool,
}

impl AccountView {
    fn new(user: &User, groups: Vec<String>, is_manager: bool) -> Self {
        Self {
            id: user.id.as_i32(),
            username: user.username.clone(),
            email: user.email.clone(),
            groups,
            is_manager,
        }
    }

    fn from_current(current: &CurrentUser) -> Self {
        Self::new(&current.user, current.groups.clone(), current.is_manager())
    }
}

/// POST /api/auth/register - create an account and log it in.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<RegisterPayload>,
) -> Result<Response> {
    let user = AuthService::new(state.pool())
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    start_session(&session, &user).await?;

    let groups = crate::db::users::UserRepository::new(state.pool())
        .groups_of(user.id)
        .await?;
    let is_manager = user.is_superuser;
    Ok(json_created(AccountView::new(&user, groups, is_manager)))
}

/// POST /api/auth/login - verify credentials and start a session.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginPayload>,
) -> Result<Response> {
    let user = AuthService::new(state.pool())
        .login(&payload.username, &payload.password)
        .await?;

    start_session(&session, &user).await?;

    let current = crate::db::users::UserRepository::new(state.pool())
        .get_current(user.id)
        .await?
        .ok_or_else(|| AppError::Internal("account vanished during login".to_string()))?;
    Ok(json_ok(AccountView::from_current(&current)))
}

/// POST /api/auth/logout - end the session. Idempotent.
pub async fn logout(session: Session) -> Result<Response> {
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(json_ok_empty())
}

/// GET /api/auth/me - the logged-in account.
pub async fn me(RequireUser(current): RequireUser) -> Result<Response> {
    Ok(json_ok(AccountView::from_current(&current)))
}

async fn start_session(session: &Session, user: &User) -> Result<()> {
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    session
        .insert(session_keys::USER_ID, user.id.as_i32())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(())
}
