//! Get message query

use mediator::Request;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Actor;
use crate::models::{Message, MESSAGE_COLUMNS};

#[derive(Debug, Clone)]
pub struct GetMessageQuery {
    pub viewer: Actor,
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum GetMessageError {
    #[error("Message '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Message, GetMessageError>> for GetMessageQuery {}

impl crate::cqrs::middleware::Query for GetMessageQuery {}

#[tracing::instrument(skip(pool, query), fields(message_id = %query.id))]
pub async fn handle(pool: PgPool, query: GetMessageQuery) -> Result<Message, GetMessageError> {
    let sql = format!("SELECT {} FROM messages WHERE id = $1", MESSAGE_COLUMNS);
    sqlx::query_as::<_, Message>(&sql)
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .filter(|m| m.is_participant(query.viewer.user_id))
        .ok_or(GetMessageError::NotFound(query.id))
}
