//! Create booking command

use mediator::Request;
use sqlx::PgPool;

use crate::auth::Actor;
use crate::features::shared::validation::{validate_max_length, validate_non_negative};
use crate::guard::{self, GuardError, NewBooking};
use crate::models::Booking;

pub const NOTES_MAX_LENGTH: usize = 2000;

#[derive(Debug, Clone)]
pub struct CreateBookingCommand {
    pub actor: Actor,
    pub request: NewBooking,
}

impl Request<Result<Booking, GuardError>> for CreateBookingCommand {}

impl crate::cqrs::middleware::Command for CreateBookingCommand {}

impl CreateBookingCommand {
    pub fn validate(&self) -> Result<(), GuardError> {
        let to_guard = |e: crate::features::shared::ValidationError| GuardError::Validation(e.to_string());
        if let Some(notes) = &self.request.notes {
            validate_max_length(notes, "notes", NOTES_MAX_LENGTH).map_err(to_guard)?;
        }
        if let Some(total) = &self.request.total_price {
            validate_non_negative(total, "total_price").map_err(to_guard)?;
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(user_id = %command.actor.user_id))]
pub async fn handle(pool: PgPool, command: CreateBookingCommand) -> Result<Booking, GuardError> {
    command.validate()?;
    guard::create_booking(&pool, command.actor, command.request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn test_validation() {
        let mut command = CreateBookingCommand {
            actor: Actor::new(Uuid::new_v4(), Role::Customer),
            request: NewBooking {
                property_id: Uuid::new_v4(),
                start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2025, 9, 3).unwrap(),
                total_price: None,
                notes: Some("Late check-in".into()),
            },
        };
        assert!(command.validate().is_ok());

        command.request.total_price = Some(BigDecimal::from(-10));
        assert!(matches!(command.validate(), Err(GuardError::Validation(_))));

        command.request.total_price = None;
        command.request.notes = Some("n".repeat(NOTES_MAX_LENGTH + 1));
        assert!(matches!(command.validate(), Err(GuardError::Validation(_))));
    }
}
