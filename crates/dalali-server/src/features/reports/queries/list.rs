//! List reports query

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::auth::Actor;
use crate::features::shared::{Paginated, PaginationParams};
use crate::models::{Report, ReportStatus, REPORT_COLUMNS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListReportsQuery {
    #[serde(skip)]
    pub viewer: Option<Actor>,
    pub status: Option<ReportStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Request<Result<Paginated<Report>, sqlx::Error>> for ListReportsQuery {}

impl crate::cqrs::middleware::Query for ListReportsQuery {}

impl ListReportsQuery {
    fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        builder.push(" WHERE TRUE");
        match self.viewer {
            Some(viewer) if viewer.is_admin() => {},
            Some(viewer) => {
                builder.push(" AND reporter_id = ").push_bind(viewer.user_id);
            },
            None => {
                builder.push(" AND FALSE");
            },
        }
        if let Some(status) = self.status {
            builder.push(" AND status = ").push_bind(status);
        }
    }
}

#[tracing::instrument(skip(pool, query), fields(status = ?query.status))]
pub async fn handle(pool: PgPool, query: ListReportsQuery) -> Result<Paginated<Report>, sqlx::Error> {
    let params = PaginationParams::new(query.page, query.per_page);

    let mut count: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM reports");
    query.push_where(&mut count);
    let total: i64 = count.build_query_scalar().fetch_one(&pool).await?;

    let mut select: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM reports", REPORT_COLUMNS));
    query.push_where(&mut select);
    select
        .push(" ORDER BY created_at DESC LIMIT ")
        .push_bind(params.per_page())
        .push(" OFFSET ")
        .push_bind(params.offset());

    let items = select.build_query_as::<Report>().fetch_all(&pool).await?;
    Ok(Paginated::new(items, &params, total))
}
