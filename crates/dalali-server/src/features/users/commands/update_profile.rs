//! Update own profile command
//!
//! Only the contact details (email, phone number) are editable here.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::auth::Actor;
use crate::features::shared::error_helpers::{is_unique_violation, violated_constraint};
use crate::features::shared::validation::{validate_email, validate_phone, ValidationError};
use crate::models::{User, UserProfile, USER_COLUMNS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    /// An empty string clears the phone number.
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateProfileCommand {
    pub actor: Actor,
    pub request: UpdateProfileRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateProfileError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("That {0} is already in use")]
    Duplicate(&'static str),

    #[error("User not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<UserProfile, UpdateProfileError>> for UpdateProfileCommand {}

impl crate::cqrs::middleware::Command for UpdateProfileCommand {}

impl UpdateProfileCommand {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(email) = &self.request.email {
            validate_email(email)?;
        }
        match self.request.phone_number.as_deref().map(str::trim) {
            Some("") | None => Ok(()),
            Some(phone) => validate_phone(phone),
        }
    }
}

#[tracing::instrument(skip(pool, command), fields(user_id = %command.actor.user_id))]
pub async fn handle(pool: PgPool, command: UpdateProfileCommand) -> Result<UserProfile, UpdateProfileError> {
    command.validate()?;
    let request = &command.request;

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE users SET ");
    let mut set = builder.separated(", ");
    set.push("updated_at = NOW()");
    if let Some(email) = &request.email {
        set.push("email = ").push_bind_unseparated(email.trim());
    }
    if let Some(phone) = &request.phone_number {
        let phone = Some(phone.trim()).filter(|p| !p.is_empty());
        set.push("phone_number = ").push_bind_unseparated(phone);
    }
    builder
        .push(" WHERE id = ")
        .push_bind(command.actor.user_id)
        .push(format!(" RETURNING {}", USER_COLUMNS));

    let user = builder
        .build_query_as::<User>()
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                let field = match violated_constraint(&e) {
                    Some(name) if name.contains("phone") => "phone number",
                    _ => "email",
                };
                UpdateProfileError::Duplicate(field)
            } else {
                UpdateProfileError::Database(e)
            }
        })?
        .ok_or(UpdateProfileError::NotFound)?;

    Ok(user.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use uuid::Uuid;

    fn command(email: Option<&str>, phone: Option<&str>) -> UpdateProfileCommand {
        UpdateProfileCommand {
            actor: Actor::new(Uuid::new_v4(), Role::Customer),
            request: UpdateProfileRequest {
                email: email.map(String::from),
                phone_number: phone.map(String::from),
            },
        }
    }

    #[test]
    fn test_validation() {
        assert!(command(Some("juma@example.co.tz"), None).validate().is_ok());
        assert!(command(None, Some("")).validate().is_ok());
        assert!(command(None, Some("0712 345 678")).validate().is_ok());
        assert_eq!(
            command(Some("not-an-email"), None).validate(),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            command(None, Some("phone")).validate(),
            Err(ValidationError::InvalidPhone)
        );
    }
}
