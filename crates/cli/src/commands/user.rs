//! User management commands.
//!
//! Uses the same validation and hashing as `POST /api/register`.

use bakeledger_server::services::auth::{AuthError, AuthService};
use thiserror::Error;

use super::{ConnectError, connect};

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("{0}")]
    Auth(#[from] AuthError),
}

/// Create a new user.
///
/// # Returns
///
/// The ID of the created user.
pub async fn create(username: &str, password: &str) -> Result<i32, UserError> {
    let pool = connect().await?;

    let user = AuthService::new(&pool)
        .register_with_password(username, password)
        .await?;

    tracing::info!("User created successfully! ID: {}, Username: {}", user.id, user.username);
    Ok(user.id.as_i32())
}

/// Replace a user's password.
pub async fn set_password(username: &str, password: &str) -> Result<(), UserError> {
    let pool = connect().await?;

    AuthService::new(&pool)
        .set_password(username, password)
        .await?;

    tracing::info!("Password updated for {}", username);
    Ok(())
}
