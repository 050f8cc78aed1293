//! Booking status change command (confirm, reject, cancel, complete)

use mediator::Request;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Actor;
use crate::guard::{self, BookingAction, GuardError};
use crate::models::Booking;

#[derive(Debug, Clone)]
pub struct TransitionBookingCommand {
    pub actor: Actor,
    pub booking_id: Uuid,
    pub action: BookingAction,
}

impl Request<Result<Booking, GuardError>> for TransitionBookingCommand {}

impl crate::cqrs::middleware::Command for TransitionBookingCommand {}

#[tracing::instrument(skip(pool, command), fields(booking_id = %command.booking_id, action = %command.action))]
pub async fn handle(pool: PgPool, command: TransitionBookingCommand) -> Result<Booking, GuardError> {
    guard::transition_booking(&pool, command.actor, command.booking_id, command.action).await
}
