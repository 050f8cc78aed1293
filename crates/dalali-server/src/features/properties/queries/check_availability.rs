//! Availability query

use chrono::{NaiveDate, Utc};
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::guard::{self, AvailabilityReport, GuardError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckAvailabilityQuery {
    #[serde(skip)]
    pub property_id: Uuid,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Request<Result<AvailabilityReport, GuardError>> for CheckAvailabilityQuery {}

impl crate::cqrs::middleware::Query for CheckAvailabilityQuery {}

pub async fn handle(pool: PgPool, query: CheckAvailabilityQuery) -> Result<AvailabilityReport, GuardError> {
    let (Some(start), Some(end)) = (query.start_date, query.end_date) else {
        return Err(GuardError::Validation(
            "start_date and end_date are required".to_string(),
        ));
    };
    guard::check_availability(&pool, query.property_id, start, end, Utc::now().date_naive()).await
}
