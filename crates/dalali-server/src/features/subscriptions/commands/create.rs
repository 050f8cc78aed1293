//! Create subscription command

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::Actor;
use crate::features::shared::validation::{validate_non_negative, validate_text, ValidationError};
use crate::models::{Subscription, SUBSCRIPTION_COLUMNS};

pub const PLAN_NAME_MAX_LENGTH: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub plan_name: String,
    pub price: BigDecimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone)]
pub struct CreateSubscriptionCommand {
    pub actor: Actor,
    pub request: CreateSubscriptionRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateSubscriptionError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Only sellers can subscribe to a plan")]
    NotSeller,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Subscription, CreateSubscriptionError>> for CreateSubscriptionCommand {}

impl crate::cqrs::middleware::Command for CreateSubscriptionCommand {}

/// Checks shared by create and update.
pub(crate) fn validate_plan(
    plan_name: &str,
    price: &BigDecimal,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<(), ValidationError> {
    validate_text(plan_name, "plan_name", PLAN_NAME_MAX_LENGTH)?;
    validate_non_negative(price, "price")?;
    if end_date <= start_date {
        return Err(ValidationError::Invalid(
            "end_date must be after start_date".to_string(),
        ));
    }
    Ok(())
}

#[tracing::instrument(skip(pool, command), fields(user_id = %command.actor.user_id, plan = %command.request.plan_name))]
pub async fn handle(
    pool: PgPool,
    command: CreateSubscriptionCommand,
) -> Result<Subscription, CreateSubscriptionError> {
    if !command.actor.can_sell() {
        return Err(CreateSubscriptionError::NotSeller);
    }
    let r = &command.request;
    validate_plan(&r.plan_name, &r.price, r.start_date, r.end_date)?;

    let sql = format!(
        "INSERT INTO subscriptions (seller_id, plan_name, price, start_date, end_date, is_active) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
        SUBSCRIPTION_COLUMNS
    );
    let subscription = sqlx::query_as::<_, Subscription>(&sql)
        .bind(command.actor.user_id)
        .bind(r.plan_name.trim())
        .bind(&r.price)
        .bind(r.start_date)
        .bind(r.end_date)
        .bind(r.is_active)
        .fetch_one(&pool)
        .await?;

    Ok(subscription)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
    }

    #[test]
    fn test_plan_validation() {
        assert!(validate_plan("Premium", &BigDecimal::from(0), date(1), date(30)).is_ok());
        assert!(validate_plan("Premium", &BigDecimal::from(-1), date(1), date(30)).is_err());
        assert!(validate_plan("Premium", &BigDecimal::from(10), date(5), date(5)).is_err());
        assert!(validate_plan(" ", &BigDecimal::from(10), date(1), date(5)).is_err());
    }
}
