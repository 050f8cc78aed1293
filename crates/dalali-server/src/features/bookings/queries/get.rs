//! Get booking query

use mediator::Request;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::auth::Actor;
use crate::models::{Booking, BOOKING_COLUMNS};

#[derive(Debug, Clone)]
pub struct GetBookingQuery {
    pub viewer: Actor,
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum GetBookingError {
    #[error("Booking '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Booking, GetBookingError>> for GetBookingQuery {}

impl crate::cqrs::middleware::Query for GetBookingQuery {}

#[derive(FromRow)]
struct BookingWithSeller {
    #[sqlx(flatten)]
    booking: Booking,
    seller_id: Uuid,
}

/// Visible to the requester, the property's seller and admins. Anyone else
/// gets "not found".
#[tracing::instrument(skip(pool, query), fields(booking_id = %query.id))]
pub async fn handle(pool: PgPool, query: GetBookingQuery) -> Result<Booking, GetBookingError> {
    let columns = BOOKING_COLUMNS
        .split(", ")
        .map(|c| format!("b.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT {}, p.seller_id FROM bookings b JOIN properties p ON p.id = b.property_id WHERE b.id = $1",
        columns
    );

    let row = sqlx::query_as::<_, BookingWithSeller>(&sql)
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .ok_or(GetBookingError::NotFound(query.id))?;

    let viewer = query.viewer;
    let allowed = viewer.is_admin()
        || viewer.user_id == row.booking.requester_id
        || viewer.user_id == row.seller_id;
    if !allowed {
        return Err(GetBookingError::NotFound(query.id));
    }

    Ok(row.booking)
}
