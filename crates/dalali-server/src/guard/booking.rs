use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::availability::active_overlaps;
use super::retry::retry_transient_once;
use super::{BookingAction, DateRange, GuardError};
use crate::auth::Actor;
use crate::models::{Booking, BookingStatus, PropertyStatus, BOOKING_COLUMNS};

/// Booking request as accepted from a customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    pub property_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Computed from the daily rate when absent.
    #[serde(default)]
    pub total_price: Option<BigDecimal>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, FromRow)]
struct LockedProperty {
    seller_id: Uuid,
    price: BigDecimal,
    price_per_day: Option<BigDecimal>,
    status: PropertyStatus,
}

#[derive(Debug, FromRow)]
struct LockedBooking {
    requester_id: Uuid,
    status: BookingStatus,
    seller_id: Uuid,
}

/// Price of `range` at `daily_rate`, counting both ends.
pub fn quote(daily_rate: &BigDecimal, range: &DateRange) -> BigDecimal {
    dalali_common::types::round_money(&(daily_rate * &BigDecimal::from(range.days())))
}

/// Create a pending booking if, and only if, the dates are still free.
///
/// The property row is locked for the duration of the transaction so two
/// requests for the same property serialize here; the overlap exclusion
/// constraint backs this up for writers that bypass the lock.
#[tracing::instrument(skip(pool, request), fields(user_id = %actor.user_id, property_id = %request.property_id))]
pub async fn create_booking(
    pool: &PgPool,
    actor: Actor,
    request: NewBooking,
) -> Result<Booking, GuardError> {
    let range = DateRange::new(request.start_date, request.end_date)?;
    if let Some(total) = &request.total_price {
        if total < &BigDecimal::from(0) {
            return Err(GuardError::Validation(
                "total_price must not be negative".to_string(),
            ));
        }
    }

    let request = &request;
    let range = &range;
    let booking =
        retry_transient_once("create the booking", move || create_once(pool, actor, request, range))
            .await?;

    tracing::info!(
        booking_id = %booking.id,
        range = %range,
        total = %dalali_common::types::format_price(&booking.total_price),
        "Booking created"
    );
    Ok(booking)
}

async fn create_once(
    pool: &PgPool,
    actor: Actor,
    request: &NewBooking,
    range: &DateRange,
) -> Result<Booking, GuardError> {
    let mut tx = pool.begin().await?;

    let property = sqlx::query_as::<_, LockedProperty>(
        "SELECT seller_id, price, price_per_day, status FROM properties WHERE id = $1 FOR UPDATE",
    )
    .bind(request.property_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| GuardError::property_not_found(request.property_id))?;

    if property.seller_id == actor.user_id {
        return Err(GuardError::Permission(
            "You cannot book your own property".to_string(),
        ));
    }
    if !property.status.is_open() {
        return Err(GuardError::Conflict(
            "Property is not available for booking".to_string(),
        ));
    }

    let overlapping = active_overlaps(&mut *tx, request.property_id, range).await?;
    if let Some(existing) = overlapping.first() {
        tracing::debug!(existing = %existing.id, "Requested dates are taken");
        return Err(GuardError::Conflict(format!(
            "Property is already booked from {} to {}",
            existing.start_date, existing.end_date
        )));
    }

    let total_price = match &request.total_price {
        Some(total) => total.clone(),
        None => quote(
            property.price_per_day.as_ref().unwrap_or(&property.price),
            range,
        ),
    };

    let sql = format!(
        "INSERT INTO bookings (property_id, requester_id, start_date, end_date, status, total_price, notes) \
         VALUES ($1, $2, $3, $4, 'pending', $5, $6) RETURNING {}",
        BOOKING_COLUMNS
    );
    let booking = sqlx::query_as::<_, Booking>(&sql)
        .bind(request.property_id)
        .bind(actor.user_id)
        .bind(range.start)
        .bind(range.end)
        .bind(total_price)
        .bind(request.notes.as_deref().unwrap_or(""))
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(booking)
}

/// Apply `action` to a booking, enforcing who may do it and from which status.
#[tracing::instrument(skip(pool), fields(user_id = %actor.user_id))]
pub async fn transition_booking(
    pool: &PgPool,
    actor: Actor,
    booking_id: Uuid,
    action: BookingAction,
) -> Result<Booking, GuardError> {
    let booking = retry_transient_once("update the booking", move || {
        transition_once(pool, actor, booking_id, action)
    })
    .await?;

    tracing::info!(%booking_id, status = %booking.status, "Booking status changed");
    Ok(booking)
}

async fn transition_once(
    pool: &PgPool,
    actor: Actor,
    booking_id: Uuid,
    action: BookingAction,
) -> Result<Booking, GuardError> {
    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, LockedBooking>(
        r#"
        SELECT b.requester_id, b.status, p.seller_id
        FROM bookings b
        JOIN properties p ON p.id = b.property_id
        WHERE b.id = $1
        FOR UPDATE OF b
        "#,
    )
    .bind(booking_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| GuardError::NotFound(format!("Booking '{}' not found", booking_id)))?;

    action.authorize(&actor, current.requester_id, current.seller_id)?;
    let next = action.apply(current.status)?;

    let sql = format!(
        "UPDATE bookings SET status = $2 WHERE id = $1 RETURNING {}",
        BOOKING_COLUMNS
    );
    let booking = sqlx::query_as::<_, Booking>(&sql)
        .bind(booking_id)
        .bind(next)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(booking)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
    }

    #[test]
    fn test_quote_counts_both_ends() {
        let range = DateRange::new(d(1), d(3)).unwrap();
        let rate = BigDecimal::from_str("120.50").unwrap();
        assert_eq!(quote(&rate, &range), BigDecimal::from_str("361.50").unwrap());
    }

    #[test]
    fn test_new_booking_defaults() {
        let request: NewBooking = serde_json::from_value(serde_json::json!({
            "property_id": Uuid::nil(),
            "start_date": "2025-09-01",
            "end_date": "2025-09-04"
        }))
        .unwrap();
        assert!(request.total_price.is_none());
        assert!(request.notes.is_none());
    }
}
