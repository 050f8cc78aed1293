//! Get subscription query

use mediator::Request;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Actor;
use crate::models::{Subscription, SUBSCRIPTION_COLUMNS};

#[derive(Debug, Clone)]
pub struct GetSubscriptionQuery {
    pub viewer: Actor,
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum GetSubscriptionError {
    #[error("Subscription '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Subscription, GetSubscriptionError>> for GetSubscriptionQuery {}

impl crate::cqrs::middleware::Query for GetSubscriptionQuery {}

#[tracing::instrument(skip(pool, query), fields(subscription_id = %query.id))]
pub async fn handle(pool: PgPool, query: GetSubscriptionQuery) -> Result<Subscription, GetSubscriptionError> {
    let sql = format!("SELECT {} FROM subscriptions WHERE id = $1", SUBSCRIPTION_COLUMNS);
    sqlx::query_as::<_, Subscription>(&sql)
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .filter(|s| query.viewer.can_manage(s))
        .ok_or(GetSubscriptionError::NotFound(query.id))
}
