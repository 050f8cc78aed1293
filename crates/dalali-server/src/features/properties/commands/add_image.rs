//! Add image command

use mediator::Request;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Actor;
use crate::features::shared::validation::{validate_max_length, validate_text};
use crate::guard::{self, GuardError, NewImage};
use crate::models::PropertyImage;

pub const IMAGE_URL_MAX_LENGTH: usize = 2048;

pub const CAPTION_MAX_LENGTH: usize = 200;

#[derive(Debug, Clone)]
pub struct AddImageCommand {
    pub actor: Actor,
    pub property_id: Uuid,
    pub image: NewImage,
}

impl Request<Result<PropertyImage, GuardError>> for AddImageCommand {}

impl crate::cqrs::middleware::Command for AddImageCommand {}

impl AddImageCommand {
    pub fn validate(&self) -> Result<(), GuardError> {
        validate_text(&self.image.image_url, "image_url", IMAGE_URL_MAX_LENGTH)
            .and_then(|_| validate_max_length(&self.image.caption, "caption", CAPTION_MAX_LENGTH))
            .map_err(|e| GuardError::Validation(e.to_string()))
    }
}

#[tracing::instrument(skip(pool, command), fields(property_id = %command.property_id))]
pub async fn handle(pool: PgPool, command: AddImageCommand) -> Result<PropertyImage, GuardError> {
    command.validate()?;
    guard::add_image(&pool, command.actor, command.property_id, command.image).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    #[test]
    fn test_validation() {
        let mut command = AddImageCommand {
            actor: Actor::new(Uuid::new_v4(), Role::Seller),
            property_id: Uuid::new_v4(),
            image: NewImage {
                image_url: "https://cdn.example.com/a.jpg".into(),
                caption: String::new(),
                is_primary: true,
            },
        };
        assert!(command.validate().is_ok());

        command.image.caption = "c".repeat(CAPTION_MAX_LENGTH + 1);
        assert!(matches!(command.validate(), Err(GuardError::Validation(_))));

        command.image.caption.clear();
        command.image.image_url = " ".into();
        assert!(matches!(command.validate(), Err(GuardError::Validation(_))));
    }
}
