//! Send message command

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Actor;
use crate::features::shared::error_helpers::is_foreign_key_violation;
use crate::features::shared::validation::{validate_max_length, validate_text, ValidationError};
use crate::models::{Message, MESSAGE_COLUMNS};

pub const SUBJECT_MAX_LENGTH: usize = 200;

pub const BODY_MAX_LENGTH: usize = 5000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub recipient_id: Uuid,
    #[serde(default)]
    pub property_id: Option<Uuid>,
    #[serde(default)]
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    pub actor: Actor,
    pub request: SendMessageRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum SendMessageError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Recipient or property does not exist")]
    UnknownReference,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Message, SendMessageError>> for SendMessageCommand {}

impl crate::cqrs::middleware::Command for SendMessageCommand {}

impl SendMessageCommand {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.request.recipient_id == self.actor.user_id {
            return Err(ValidationError::Invalid(
                "You cannot send a message to yourself".to_string(),
            ));
        }
        validate_max_length(&self.request.subject, "subject", SUBJECT_MAX_LENGTH)?;
        validate_text(&self.request.body, "body", BODY_MAX_LENGTH)
    }
}

#[tracing::instrument(skip(pool, command), fields(sender_id = %command.actor.user_id, recipient_id = %command.request.recipient_id))]
pub async fn handle(pool: PgPool, command: SendMessageCommand) -> Result<Message, SendMessageError> {
    command.validate()?;
    let r = &command.request;

    let sql = format!(
        "INSERT INTO messages (sender_id, recipient_id, property_id, subject, body) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {}",
        MESSAGE_COLUMNS
    );
    let message = sqlx::query_as::<_, Message>(&sql)
        .bind(command.actor.user_id)
        .bind(r.recipient_id)
        .bind(r.property_id)
        .bind(r.subject.trim())
        .bind(r.body.trim())
        .fetch_one(&pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                SendMessageError::UnknownReference
            } else {
                SendMessageError::Database(e)
            }
        })?;

    Ok(message)
}
