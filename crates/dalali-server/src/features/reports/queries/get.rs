//! Get report query

use mediator::Request;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Actor;
use crate::models::{Report, REPORT_COLUMNS};

#[derive(Debug, Clone)]
pub struct GetReportQuery {
    pub viewer: Actor,
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum GetReportError {
    #[error("Report '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Report, GetReportError>> for GetReportQuery {}

impl crate::cqrs::middleware::Query for GetReportQuery {}

#[tracing::instrument(skip(pool, query), fields(report_id = %query.id))]
pub async fn handle(pool: PgPool, query: GetReportQuery) -> Result<Report, GetReportError> {
    let sql = format!("SELECT {} FROM reports WHERE id = $1", REPORT_COLUMNS);
    sqlx::query_as::<_, Report>(&sql)
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .filter(|r| query.viewer.can_manage(r))
        .ok_or(GetReportError::NotFound(query.id))
}
