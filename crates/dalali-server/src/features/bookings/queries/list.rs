//! List bookings query

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::auth::Actor;
use crate::features::shared::{Paginated, PaginationParams};
use crate::models::{Booking, BookingStatus, BOOKING_COLUMNS};

/// Whose bookings to list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookingScope {
    /// Everything for admins, otherwise the caller's own requests
    #[default]
    Requested,
    /// Bookings on the caller's listings
    Received,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListBookingsQuery {
    #[serde(skip)]
    pub viewer: Option<Actor>,
    #[serde(skip)]
    pub scope: BookingScope,
    pub status: Option<BookingStatus>,
    pub property_id: Option<Uuid>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ListBookingsError {
    #[error("Only sellers can list bookings on their properties")]
    NotSeller,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Paginated<Booking>, ListBookingsError>> for ListBookingsQuery {}

impl crate::cqrs::middleware::Query for ListBookingsQuery {}

impl ListBookingsQuery {
    fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        builder.push(" WHERE TRUE");

        match (self.scope, self.viewer) {
            (_, None) => {
                builder.push(" AND FALSE");
            },
            (BookingScope::Requested, Some(viewer)) if !viewer.is_admin() => {
                builder.push(" AND requester_id = ").push_bind(viewer.user_id);
            },
            (BookingScope::Received, Some(viewer)) => {
                builder
                    .push(" AND property_id IN (SELECT id FROM properties WHERE seller_id = ")
                    .push_bind(viewer.user_id)
                    .push(")");
            },
            _ => {},
        }

        if let Some(status) = self.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(property_id) = self.property_id {
            builder.push(" AND property_id = ").push_bind(property_id);
        }
    }
}

#[tracing::instrument(skip(pool, query), fields(scope = ?query.scope, status = ?query.status))]
pub async fn handle(pool: PgPool, query: ListBookingsQuery) -> Result<Paginated<Booking>, ListBookingsError> {
    if query.scope == BookingScope::Received && !query.viewer.is_some_and(|v| v.can_sell()) {
        return Err(ListBookingsError::NotSeller);
    }

    let params = PaginationParams::new(query.page, query.per_page);

    let mut count: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM bookings");
    query.push_where(&mut count);
    let total: i64 = count.build_query_scalar().fetch_one(&pool).await?;

    let mut select: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM bookings", BOOKING_COLUMNS));
    query.push_where(&mut select);
    select
        .push(" ORDER BY start_date DESC, created_at DESC LIMIT ")
        .push_bind(params.per_page())
        .push(" OFFSET ")
        .push_bind(params.offset());

    let items = select.build_query_as::<Booking>().fetch_all(&pool).await?;
    Ok(Paginated::new(items, &params, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    fn sql_for(query: &ListBookingsQuery) -> String {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT 1 FROM bookings");
        query.push_where(&mut builder);
        builder.sql().to_string()
    }

    #[test]
    fn test_customers_only_see_their_requests() {
        let query = ListBookingsQuery {
            viewer: Some(Actor::new(Uuid::new_v4(), Role::Customer)),
            ..Default::default()
        };
        assert!(sql_for(&query).contains("requester_id ="));
    }

    #[test]
    fn test_admins_see_everything() {
        let query = ListBookingsQuery {
            viewer: Some(Actor::new(Uuid::new_v4(), Role::Admin)),
            ..Default::default()
        };
        assert!(!sql_for(&query).contains("requester_id"));
    }

    #[test]
    fn test_received_scope_filters_by_seller() {
        let query = ListBookingsQuery {
            viewer: Some(Actor::new(Uuid::new_v4(), Role::Seller)),
            scope: BookingScope::Received,
            status: Some(BookingStatus::Pending),
            ..Default::default()
        };
        let sql = sql_for(&query);
        assert!(sql.contains("seller_id ="));
        assert!(sql.contains("status ="));
    }
}
