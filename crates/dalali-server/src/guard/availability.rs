use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor, PgPool};
use uuid::Uuid;

use super::window::{lookahead_horizon, next_available_window};
use super::{DateRange, GuardError};
use crate::models::BookingStatus;

/// Dates held by an active booking
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookedSpan {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: BookingStatus,
}

/// Answer to an availability question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityReport {
    pub property_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub available: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_available: Option<DateRange>,
}

/// Active bookings of `property_id` overlapping `range`, both ends inclusive.
pub(crate) async fn active_overlaps<'e, E>(
    executor: E,
    property_id: Uuid,
    range: &DateRange,
) -> Result<Vec<BookedSpan>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, BookedSpan>(
        r#"
        SELECT id, start_date, end_date, status
        FROM bookings
        WHERE property_id = $1
          AND status IN ('pending', 'confirmed')
          AND start_date <= $3
          AND end_date >= $2
        ORDER BY start_date
        "#,
    )
    .bind(property_id)
    .bind(range.start)
    .bind(range.end)
    .fetch_all(executor)
    .await
}

async fn upcoming_active<'e, E>(
    executor: E,
    property_id: Uuid,
    from: NaiveDate,
) -> Result<Vec<(NaiveDate, NaiveDate)>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query_as::<_, (NaiveDate, NaiveDate)>(
        r#"
        SELECT start_date, end_date
        FROM bookings
        WHERE property_id = $1
          AND status IN ('pending', 'confirmed')
          AND end_date >= $2
          AND start_date <= $3
        ORDER BY start_date
        "#,
    )
    .bind(property_id)
    .bind(from)
    .bind(lookahead_horizon(from))
    .fetch_all(executor)
    .await
}

/// Whether `property_id` can be booked from `start` to `end` inclusive.
///
/// When it cannot, the report suggests the earliest window of the same
/// length starting no sooner than `max(today, start)`. Read-only.
#[tracing::instrument(skip(pool), fields(%property_id, %start, %end))]
pub async fn check_availability(
    pool: &PgPool,
    property_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<AvailabilityReport, GuardError> {
    let range = DateRange::new(start, end)?;

    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM properties WHERE id = $1)")
        .bind(property_id)
        .fetch_one(pool)
        .await?;
    if !exists {
        return Err(GuardError::property_not_found(property_id));
    }

    let conflicts = active_overlaps(pool, property_id, &range).await?;
    if conflicts.is_empty() {
        tracing::debug!("Requested dates are free");
        return Ok(AvailabilityReport {
            property_id,
            start_date: start,
            end_date: end,
            available: true,
            message: "Property is available for the selected dates".to_string(),
            next_available: None,
        });
    }

    let from = today.max(start);
    let upcoming = upcoming_active(pool, property_id, from).await?;
    let next = next_available_window(&upcoming, from, range.days());

    tracing::debug!(conflicts = conflicts.len(), next = ?next, "Requested dates are taken");

    let message = match &next {
        Some(next) => format!(
            "Property is not available for the selected dates; next available {}",
            next
        ),
        None => "Property is not available for the selected dates".to_string(),
    };

    Ok(AvailabilityReport {
        property_id,
        start_date: start,
        end_date: end,
        available: false,
        message,
        next_available: next,
    })
}
