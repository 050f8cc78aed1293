//! Mark message read command

use mediator::Request;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Actor;
use crate::models::{Message, MESSAGE_COLUMNS};

#[derive(Debug, Clone)]
pub struct MarkReadCommand {
    pub actor: Actor,
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum MarkReadError {
    #[error("Message '{0}' not found")]
    NotFound(Uuid),

    #[error("Only the recipient can mark a message as read")]
    NotRecipient,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Message, MarkReadError>> for MarkReadCommand {}

impl crate::cqrs::middleware::Command for MarkReadCommand {}

#[tracing::instrument(skip(pool, command), fields(message_id = %command.id))]
pub async fn handle(pool: PgPool, command: MarkReadCommand) -> Result<Message, MarkReadError> {
    let sql = format!("SELECT {} FROM messages WHERE id = $1", MESSAGE_COLUMNS);
    let message = sqlx::query_as::<_, Message>(&sql)
        .bind(command.id)
        .fetch_optional(&pool)
        .await?
        .filter(|m| m.is_participant(command.actor.user_id))
        .ok_or(MarkReadError::NotFound(command.id))?;

    if message.recipient_id != command.actor.user_id {
        return Err(MarkReadError::NotRecipient);
    }
    if message.is_read {
        return Ok(message);
    }

    let sql = format!("UPDATE messages SET is_read = TRUE WHERE id = $1 RETURNING {}", MESSAGE_COLUMNS);
    let message = sqlx::query_as::<_, Message>(&sql)
        .bind(command.id)
        .fetch_one(&pool)
        .await?;
    Ok(message)
}
