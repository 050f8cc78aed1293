//! Delete message command

use mediator::Request;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Actor;

#[derive(Debug, Clone)]
pub struct DeleteMessageCommand {
    pub actor: Actor,
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteMessageResponse {
    pub id: Uuid,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteMessageError {
    #[error("Message '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteMessageResponse, DeleteMessageError>> for DeleteMessageCommand {}

impl crate::cqrs::middleware::Command for DeleteMessageCommand {}

/// Either participant may delete a message.
#[tracing::instrument(skip(pool, command), fields(message_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteMessageCommand,
) -> Result<DeleteMessageResponse, DeleteMessageError> {
    let result =
        sqlx::query("DELETE FROM messages WHERE id = $1 AND (sender_id = $2 OR recipient_id = $2)")
            .bind(command.id)
            .bind(command.actor.user_id)
            .execute(&pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteMessageError::NotFound(command.id));
    }

    Ok(DeleteMessageResponse {
        id: command.id,
        deleted: true,
    })
}
