//! Set primary image command

use mediator::Request;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Actor;
use crate::guard::{self, GuardError};
use crate::models::PropertyImage;

#[derive(Debug, Clone)]
pub struct SetPrimaryImageCommand {
    pub actor: Actor,
    pub property_id: Uuid,
    pub image_id: Uuid,
}

impl Request<Result<PropertyImage, GuardError>> for SetPrimaryImageCommand {}

impl crate::cqrs::middleware::Command for SetPrimaryImageCommand {}

pub async fn handle(
    pool: PgPool,
    command: SetPrimaryImageCommand,
) -> Result<PropertyImage, GuardError> {
    guard::set_primary_image(&pool, command.actor, command.property_id, command.image_id).await
}
