//! Get user query

use mediator::Request;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Actor;
use crate::models::{User, UserProfile, USER_COLUMNS};

#[derive(Debug, Clone)]
pub struct GetUserQuery {
    pub viewer: Actor,
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum GetUserError {
    #[error("User '{0}' not found")]
    NotFound(Uuid),

    #[error("You can only view your own profile")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<UserProfile, GetUserError>> for GetUserQuery {}

impl crate::cqrs::middleware::Query for GetUserQuery {}

#[tracing::instrument(skip(pool, query), fields(user_id = %query.id))]
pub async fn handle(pool: PgPool, query: GetUserQuery) -> Result<UserProfile, GetUserError> {
    if !query.viewer.is_admin() && query.viewer.user_id != query.id {
        return Err(GetUserError::Forbidden);
    }

    let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(GetUserError::NotFound(query.id))?;

    Ok(user.into())
}
