//! Resolve report command (admins)

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Actor;
use crate::features::shared::validation::{validate_text, ValidationError};
use crate::models::{Report, ReportStatus, REPORT_COLUMNS};

pub const RESOLUTION_NOTE_MAX_LENGTH: usize = 5000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveReportRequest {
    pub resolution_note: String,
}

#[derive(Debug, Clone)]
pub struct ResolveReportCommand {
    pub actor: Actor,
    pub id: Uuid,
    pub request: ResolveReportRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveReportError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Only administrators can resolve reports")]
    Forbidden,

    #[error("Report '{0}' not found")]
    NotFound(Uuid),

    #[error("Report is already resolved")]
    AlreadyResolved,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Report, ResolveReportError>> for ResolveReportCommand {}

impl crate::cqrs::middleware::Command for ResolveReportCommand {}

#[tracing::instrument(skip(pool, command), fields(report_id = %command.id))]
pub async fn handle(pool: PgPool, command: ResolveReportCommand) -> Result<Report, ResolveReportError> {
    if !command.actor.is_admin() {
        return Err(ResolveReportError::Forbidden);
    }
    validate_text(
        &command.request.resolution_note,
        "resolution_note",
        RESOLUTION_NOTE_MAX_LENGTH,
    )?;

    let sql = format!(
        "UPDATE reports SET status = 'resolved', resolution_note = $2, resolved_at = NOW() \
         WHERE id = $1 AND status = 'open' RETURNING {}",
        REPORT_COLUMNS
    );
    let resolved = sqlx::query_as::<_, Report>(&sql)
        .bind(command.id)
        .bind(command.request.resolution_note.trim())
        .fetch_optional(&pool)
        .await?;

    if let Some(report) = resolved {
        return Ok(report);
    }

    let status: Option<ReportStatus> = sqlx::query_scalar("SELECT status FROM reports WHERE id = $1")
        .bind(command.id)
        .fetch_optional(&pool)
        .await?;
    match status {
        Some(_) => Err(ResolveReportError::AlreadyResolved),
        None => Err(ResolveReportError::NotFound(command.id)),
    }
}
