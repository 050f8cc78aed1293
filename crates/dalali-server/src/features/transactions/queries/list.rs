//! List transactions query

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::auth::Actor;
use crate::features::shared::{Paginated, PaginationParams};
use crate::models::{Transaction, TransactionStatus, TRANSACTION_COLUMNS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListTransactionsQuery {
    #[serde(skip)]
    pub viewer: Option<Actor>,
    pub status: Option<TransactionStatus>,
    pub property_id: Option<Uuid>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Request<Result<Paginated<Transaction>, sqlx::Error>> for ListTransactionsQuery {}

impl crate::cqrs::middleware::Query for ListTransactionsQuery {}

impl ListTransactionsQuery {
    fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        builder.push(" WHERE TRUE");
        match self.viewer {
            Some(viewer) if viewer.is_admin() => {},
            Some(viewer) => {
                builder.push(" AND buyer_id = ").push_bind(viewer.user_id);
            },
            None => {
                builder.push(" AND FALSE");
            },
        }
        if let Some(status) = self.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(property_id) = self.property_id {
            builder.push(" AND property_id = ").push_bind(property_id);
        }
    }
}

/// Admins see every transaction, everyone else their own purchases.
#[tracing::instrument(skip(pool, query), fields(status = ?query.status))]
pub async fn handle(pool: PgPool, query: ListTransactionsQuery) -> Result<Paginated<Transaction>, sqlx::Error> {
    let params = PaginationParams::new(query.page, query.per_page);

    let mut count: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM transactions");
    query.push_where(&mut count);
    let total: i64 = count.build_query_scalar().fetch_one(&pool).await?;

    let mut select: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM transactions", TRANSACTION_COLUMNS));
    query.push_where(&mut select);
    select
        .push(" ORDER BY transaction_date DESC LIMIT ")
        .push_bind(params.per_page())
        .push(" OFFSET ")
        .push_bind(params.offset());

    let items = select.build_query_as::<Transaction>().fetch_all(&pool).await?;
    Ok(Paginated::new(items, &params, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    #[test]
    fn test_buyers_see_their_own() {
        let query = ListTransactionsQuery {
            viewer: Some(Actor::new(Uuid::new_v4(), Role::Customer)),
            ..Default::default()
        };
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("SELECT 1 FROM transactions");
        query.push_where(&mut builder);
        assert!(builder.sql().contains("buyer_id ="));
    }
}
