//! Authentication route handlers.
//!
//! Registration and login both start a session; logout ends it.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::auth::AuthService;
use crate::state::AppState;

use super::extract::ApiJson;

/// Login and registration body.
///
/// Implements `Debug` manually to redact the password.
#[derive(Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Response after a successful login or registration.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: &'static str,
    pub username: String,
}

/// Response from `GET /api/check-auth`.
#[derive(Debug, Serialize)]
pub struct CheckAuthResponse {
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Response after logout.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

async fn start_session(session: &Session, user: &User) -> Result<()> {
    let current = CurrentUser::from(user);
    set_current_user(session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_sentry_user(&user.id, user.username.as_str());
    Ok(())
}

/// Create an account and log it in.
///
/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<Credentials>,
) -> Result<Json<SessionResponse>> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .register_with_password(&body.username, &body.password)
        .await?;

    start_session(&session, &user).await?;
    tracing::info!(user_id = %user.id, "user registered");

    Ok(Json(SessionResponse {
        message: "Registered",
        username: user.username.into_inner(),
    }))
}

/// Log in with username and password.
///
/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<Credentials>,
) -> Result<Json<SessionResponse>> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .login_with_password(&body.username, &body.password)
        .await
        .inspect_err(|e| tracing::info!(username = %body.username, error = %e, "login failed"))?;

    start_session(&session, &user).await?;

    Ok(Json(SessionResponse {
        message: "Logged in",
        username: user.username.into_inner(),
    }))
}

/// End the current session.
///
/// POST /api/logout
pub async fn logout(session: Session) -> Result<Json<MessageResponse>> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    clear_sentry_user();

    Ok(Json(MessageResponse {
        message: "Logged out",
    }))
}

/// Report whether the caller has a session.
///
/// GET /api/check-auth
pub async fn check_auth(OptionalAuth(user): OptionalAuth) -> Json<CheckAuthResponse> {
    Json(CheckAuthResponse {
        logged_in: user.is_some(),
        username: user.map(|u| u.username.into_inner()),
    })
}
