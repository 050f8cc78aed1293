//! Delete subscription command

use mediator::Request;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Actor;

#[derive(Debug, Clone)]
pub struct DeleteSubscriptionCommand {
    pub actor: Actor,
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteSubscriptionResponse {
    pub id: Uuid,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteSubscriptionError {
    #[error("Subscription '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeleteSubscriptionResponse, DeleteSubscriptionError>> for DeleteSubscriptionCommand {}

impl crate::cqrs::middleware::Command for DeleteSubscriptionCommand {}

#[tracing::instrument(skip(pool, command), fields(subscription_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeleteSubscriptionCommand,
) -> Result<DeleteSubscriptionResponse, DeleteSubscriptionError> {
    let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1 AND (seller_id = $2 OR $3)")
        .bind(command.id)
        .bind(command.actor.user_id)
        .bind(command.actor.is_admin())
        .execute(&pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DeleteSubscriptionError::NotFound(command.id));
    }

    Ok(DeleteSubscriptionResponse {
        id: command.id,
        deleted: true,
    })
}
