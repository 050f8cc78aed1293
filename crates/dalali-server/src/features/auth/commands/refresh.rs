//! Refresh command

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::{JwtKeys, TokenError, TokenType};

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Clone)]
pub struct RefreshCommand {
    pub request: RefreshRequest,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessToken {
    pub access: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("User account is inactive or no longer exists")]
    Inactive,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<AccessToken, RefreshError>> for RefreshCommand {}

impl crate::cqrs::middleware::Command for RefreshCommand {}

/// Issues a new access token for a valid refresh token. The role is re-read
/// from the database so a changed role takes effect on the next refresh.
#[tracing::instrument(skip(pool, keys, command))]
pub async fn handle(pool: PgPool, keys: JwtKeys, command: RefreshCommand) -> Result<AccessToken, RefreshError> {
    let claims = keys.verify(&command.request.refresh, TokenType::Refresh)?;

    let row: Option<(String, crate::auth::Role)> =
        sqlx::query_as("SELECT username, role FROM users WHERE id = $1 AND is_active")
            .bind(claims.sub)
            .fetch_optional(&pool)
            .await?;
    let (username, role) = row.ok_or(RefreshError::Inactive)?;

    Ok(AccessToken {
        access: keys.issue(claims.sub, &username, role, TokenType::Access)?,
        token_type: "Bearer".to_string(),
        expires_in: keys.access_ttl_secs(),
    })
}
