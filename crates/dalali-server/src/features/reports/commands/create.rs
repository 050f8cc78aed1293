//! Create report command

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Actor;
use crate::features::shared::error_helpers::map_foreign_key_violation;
use crate::features::shared::validation::{validate_max_length, validate_text, ValidationError};
use crate::models::{Report, REPORT_COLUMNS};

pub const REASON_MAX_LENGTH: usize = 100;

pub const DETAILS_MAX_LENGTH: usize = 5000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReportRequest {
    pub property_id: Uuid,
    pub reason: String,
    #[serde(default)]
    pub details: String,
}

#[derive(Debug, Clone)]
pub struct CreateReportCommand {
    pub actor: Actor,
    pub request: CreateReportRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateReportError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Property '{0}' not found")]
    PropertyNotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Report, CreateReportError>> for CreateReportCommand {}

impl crate::cqrs::middleware::Command for CreateReportCommand {}

impl CreateReportRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_text(&self.reason, "reason", REASON_MAX_LENGTH)?;
        validate_max_length(&self.details, "details", DETAILS_MAX_LENGTH)
    }
}

#[tracing::instrument(skip(pool, command), fields(user_id = %command.actor.user_id, property_id = %command.request.property_id))]
pub async fn handle(pool: PgPool, command: CreateReportCommand) -> Result<Report, CreateReportError> {
    let r = &command.request;
    r.validate()?;

    let sql = format!(
        "INSERT INTO reports (reporter_id, property_id, reason, details) \
         VALUES ($1, $2, $3, $4) RETURNING {}",
        REPORT_COLUMNS
    );
    let report = sqlx::query_as::<_, Report>(&sql)
        .bind(command.actor.user_id)
        .bind(r.property_id)
        .bind(r.reason.trim())
        .bind(r.details.trim())
        .fetch_one(&pool)
        .await
        .map_err(|e| {
            map_foreign_key_violation(
                e,
                CreateReportError::PropertyNotFound(r.property_id),
                CreateReportError::Database,
            )
        })?;

    tracing::info!(report_id = %report.id, "Report filed");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_required() {
        let request = CreateReportRequest {
            property_id: Uuid::new_v4(),
            reason: "".to_string(),
            details: "Photos are of a different house".to_string(),
        };
        assert_eq!(
            request.validate(),
            Err(ValidationError::Required { field: "reason" })
        );
    }
}
