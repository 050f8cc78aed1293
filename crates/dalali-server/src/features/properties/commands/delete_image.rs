//! Delete image command

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Actor;
use crate::guard::{self, GuardError};

#[derive(Debug, Clone)]
pub struct DeleteImageCommand {
    pub actor: Actor,
    pub property_id: Uuid,
    pub image_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteImageResponse {
    pub id: Uuid,
    pub deleted: bool,
}

impl Request<Result<DeleteImageResponse, GuardError>> for DeleteImageCommand {}

impl crate::cqrs::middleware::Command for DeleteImageCommand {}

pub async fn handle(
    pool: PgPool,
    command: DeleteImageCommand,
) -> Result<DeleteImageResponse, GuardError> {
    guard::remove_image(&pool, command.actor, command.property_id, command.image_id).await?;
    Ok(DeleteImageResponse {
        id: command.image_id,
        deleted: true,
    })
}
