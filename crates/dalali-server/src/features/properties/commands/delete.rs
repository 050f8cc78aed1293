//! Delete property command

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Actor;
use crate::features::properties::queries::get::fetch_property;

#[derive(Debug, Clone)]
pub struct DeletePropertyCommand {
    pub actor: Actor,
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletePropertyResponse {
    pub id: Uuid,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeletePropertyError {
    #[error("Property '{0}' not found")]
    NotFound(Uuid),

    #[error("Only the property's seller can delete it")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<DeletePropertyResponse, DeletePropertyError>> for DeletePropertyCommand {}

impl crate::cqrs::middleware::Command for DeletePropertyCommand {}

/// Images, bookings, reports and transactions of the listing go with it.
#[tracing::instrument(skip(pool, command), fields(user_id = %command.actor.user_id, property_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: DeletePropertyCommand,
) -> Result<DeletePropertyResponse, DeletePropertyError> {
    let property = fetch_property(&pool, command.id)
        .await?
        .ok_or(DeletePropertyError::NotFound(command.id))?;
    if !command.actor.can_manage(&property) {
        return Err(DeletePropertyError::Forbidden);
    }

    let result = sqlx::query("DELETE FROM properties WHERE id = $1")
        .bind(command.id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DeletePropertyError::NotFound(command.id));
    }

    tracing::info!("Property deleted");
    Ok(DeletePropertyResponse {
        id: command.id,
        deleted: true,
    })
}
