//! Login command
//!
//! Exchanges a username (or email) and password for a token pair.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::{verify_password, JwtKeys, PasswordError, TokenError, TokenPair};
use crate::models::{User, UserProfile, USER_COLUMNS};

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username or email address
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub request: LoginRequest,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub user: UserProfile,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("No active account found with the given credentials")]
    InvalidCredentials,

    #[error("This account has been deactivated")]
    Inactive,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<LoginResponse, LoginError>> for LoginCommand {}

impl crate::cqrs::middleware::Command for LoginCommand {}

pub(crate) async fn find_by_login(pool: &PgPool, login: &str) -> Result<Option<User>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM users WHERE username = $1 OR LOWER(email) = LOWER($1)",
        USER_COLUMNS
    );
    sqlx::query_as::<_, User>(&sql)
        .bind(login.trim())
        .fetch_optional(pool)
        .await
}

#[tracing::instrument(skip(pool, keys, command), fields(login = %command.request.username))]
pub async fn handle(pool: PgPool, keys: JwtKeys, command: LoginCommand) -> Result<LoginResponse, LoginError> {
    let request = command.request;

    let user = find_by_login(&pool, &request.username)
        .await?
        .ok_or(LoginError::InvalidCredentials)?;

    if !verify_password(&request.password, &user.password_hash).await? {
        tracing::warn!(user_id = %user.id, "Rejected login with wrong password");
        return Err(LoginError::InvalidCredentials);
    }
    if !user.is_active {
        return Err(LoginError::Inactive);
    }

    let tokens = keys.issue_pair(user.id, &user.username, user.role)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(LoginResponse {
        tokens,
        user: user.into(),
    })
}
