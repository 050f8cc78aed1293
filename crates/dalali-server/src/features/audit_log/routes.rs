//! Audit API routes
//!
//! - `GET /api/v1/audit?user_id&action&resource_type&resource_id&start_time&end_time&limit&offset`
//! - `GET /api/v1/audit/:resource_type/:resource_id`

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::response::{ApiResponse, ApiResult, AppError};
use crate::audit::{get_audit_trail, query_audit_logs, AuditQuery, ResourceType};
use crate::auth::{Actor, AuthUser};
use crate::features::FeatureState;

pub fn audit_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", get(list_audit_entries))
        .route("/:resource_type/:resource_id", get(resource_trail))
}

#[derive(Debug, Deserialize)]
struct TrailParams {
    limit: Option<i64>,
}

fn require_admin(actor: &Actor) -> ApiResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only administrators can read the audit log".to_string(),
        ))
    }
}

#[tracing::instrument(skip(pool, query))]
async fn list_audit_entries(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Query(query): Query<AuditQuery>,
) -> ApiResult<Response> {
    require_admin(&actor)?;
    let (limit, offset) = (query.limit, query.offset);
    let entries = query_audit_logs(&pool, query).await?;
    let meta = json!({ "limit": limit, "offset": offset, "count": entries.len() });
    Ok(ApiResponse::success_with_meta(entries, meta).into_response())
}

#[tracing::instrument(skip(pool, params))]
async fn resource_trail(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Path((resource_type, resource_id)): Path<(ResourceType, Uuid)>,
    Query(params): Query<TrailParams>,
) -> ApiResult<Response> {
    require_admin(&actor)?;
    let entries = get_audit_trail(&pool, resource_type, resource_id, params.limit).await?;
    Ok(ApiResponse::success(entries).into_response())
}
