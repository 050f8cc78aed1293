//! Report API routes
//!
//! - `POST /api/v1/reports`
//! - `GET /api/v1/reports` - Admins see all, others their own
//! - `GET /api/v1/reports/:id`
//! - `POST /api/v1/reports/:id/resolve` - Admins only

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use super::commands::{
    self, CreateReportCommand, CreateReportError, CreateReportRequest, ResolveReportCommand,
    ResolveReportError, ResolveReportRequest,
};
use super::queries::{self, GetReportError, GetReportQuery, ListReportsQuery};
use crate::api::response::{ApiResponse, ApiResult, AppError};
use crate::auth::AuthUser;
use crate::features::FeatureState;

pub fn reports_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", post(create_report).get(list_reports))
        .route("/:id", get(get_report))
        .route("/:id/resolve", post(resolve_report))
}

async fn create_report(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Json(request): Json<CreateReportRequest>,
) -> ApiResult<Response> {
    let report = commands::create::handle(pool, CreateReportCommand { actor, request }).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(report))).into_response())
}

async fn resolve_report(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<ResolveReportRequest>,
) -> ApiResult<Response> {
    let report =
        commands::resolve::handle(pool, ResolveReportCommand { actor, id, request }).await?;
    Ok(ApiResponse::success(report).into_response())
}

async fn list_reports(
    State(pool): State<PgPool>,
    AuthUser(viewer): AuthUser,
    Query(mut query): Query<ListReportsQuery>,
) -> ApiResult<Response> {
    query.viewer = Some(viewer);
    let page = queries::list::handle(pool, query).await?;
    let meta = json!({ "pagination": page.pagination });
    Ok(ApiResponse::success_with_meta(page.items, meta).into_response())
}

async fn get_report(
    State(pool): State<PgPool>,
    AuthUser(viewer): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let report = queries::get::handle(pool, GetReportQuery { viewer, id }).await?;
    Ok(ApiResponse::success(report).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

impl From<CreateReportError> for AppError {
    fn from(err: CreateReportError) -> Self {
        match err {
            CreateReportError::Validation(e) => e.into(),
            CreateReportError::PropertyNotFound(_) => AppError::NotFound(err.to_string()),
            CreateReportError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ResolveReportError> for AppError {
    fn from(err: ResolveReportError) -> Self {
        match err {
            ResolveReportError::Validation(e) => e.into(),
            ResolveReportError::Forbidden => AppError::Forbidden(err.to_string()),
            ResolveReportError::NotFound(_) => AppError::NotFound(err.to_string()),
            ResolveReportError::AlreadyResolved => AppError::Conflict(err.to_string()),
            ResolveReportError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetReportError> for AppError {
    fn from(err: GetReportError) -> Self {
        match err {
            GetReportError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetReportError::Database(e) => AppError::Database(e),
        }
    }
}
