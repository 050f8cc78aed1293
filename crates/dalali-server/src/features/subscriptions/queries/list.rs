//! List subscriptions query

use mediator::Request;
use sqlx::PgPool;

use crate::auth::Actor;
use crate::models::{Subscription, SUBSCRIPTION_COLUMNS};

#[derive(Debug, Clone)]
pub struct ListSubscriptionsQuery {
    pub viewer: Actor,
}

impl Request<Result<Vec<Subscription>, sqlx::Error>> for ListSubscriptionsQuery {}

impl crate::cqrs::middleware::Query for ListSubscriptionsQuery {}

/// Admins see all subscriptions, sellers their own.
#[tracing::instrument(skip(pool, query), fields(user_id = %query.viewer.user_id))]
pub async fn handle(pool: PgPool, query: ListSubscriptionsQuery) -> Result<Vec<Subscription>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM subscriptions WHERE seller_id = $1 OR $2 ORDER BY start_date DESC",
        SUBSCRIPTION_COLUMNS
    );
    sqlx::query_as::<_, Subscription>(&sql)
        .bind(query.viewer.user_id)
        .bind(query.viewer.is_admin())
        .fetch_all(&pool)
        .await
}
