//! Update subscription command

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::create::validate_plan;
use crate::auth::Actor;
use crate::features::shared::ValidationError;
use crate::models::{Subscription, SUBSCRIPTION_COLUMNS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub plan_name: Option<String>,
    pub price: Option<BigDecimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct UpdateSubscriptionCommand {
    pub actor: Actor,
    pub id: Uuid,
    pub request: UpdateSubscriptionRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateSubscriptionError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Subscription '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Subscription, UpdateSubscriptionError>> for UpdateSubscriptionCommand {}

impl crate::cqrs::middleware::Command for UpdateSubscriptionCommand {}

impl UpdateSubscriptionRequest {
    fn apply(self, mut current: Subscription) -> Subscription {
        if let Some(plan_name) = self.plan_name {
            current.plan_name = plan_name.trim().to_string();
        }
        if let Some(price) = self.price {
            current.price = price;
        }
        if let Some(start_date) = self.start_date {
            current.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            current.end_date = end_date;
        }
        if let Some(is_active) = self.is_active {
            current.is_active = is_active;
        }
        current
    }
}

/// Partial update; the merged plan is validated as a whole so a new end date
/// is checked against the stored start date.
#[tracing::instrument(skip(pool, command), fields(subscription_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: UpdateSubscriptionCommand,
) -> Result<Subscription, UpdateSubscriptionError> {
    let mut tx = pool.begin().await?;

    let select = format!("SELECT {} FROM subscriptions WHERE id = $1 FOR UPDATE", SUBSCRIPTION_COLUMNS);
    let current = sqlx::query_as::<_, Subscription>(&select)
        .bind(command.id)
        .fetch_optional(&mut *tx)
        .await?
        .filter(|s| command.actor.can_manage(s))
        .ok_or(UpdateSubscriptionError::NotFound(command.id))?;

    let updated = command.request.apply(current);
    validate_plan(&updated.plan_name, &updated.price, updated.start_date, updated.end_date)?;

    let update = format!(
        "UPDATE subscriptions SET plan_name = $2, price = $3, start_date = $4, end_date = $5, \
         is_active = $6 WHERE id = $1 RETURNING {}",
        SUBSCRIPTION_COLUMNS
    );
    let subscription = sqlx::query_as::<_, Subscription>(&update)
        .bind(updated.id)
        .bind(&updated.plan_name)
        .bind(&updated.price)
        .bind(updated.start_date)
        .bind(updated.end_date)
        .bind(updated.is_active)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(subscription)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_apply_keeps_unset_fields() {
        let current = Subscription {
            id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            plan_name: "Basic".to_string(),
            price: BigDecimal::from(5000),
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            is_active: true,
            created_at: Utc::now(),
        };
        let request = UpdateSubscriptionRequest {
            plan_name: Some(" Premium ".to_string()),
            is_active: Some(false),
            ..Default::default()
        };
        let updated = request.apply(current.clone());
        assert_eq!(updated.plan_name, "Premium");
        assert!(!updated.is_active);
        assert_eq!(updated.price, current.price);
        assert_eq!(updated.end_date, current.end_date);
    }
}
