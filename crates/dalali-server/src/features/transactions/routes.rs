//! Transaction API routes
//!
//! - `POST /api/v1/transactions` - Buy a property
//! - `GET /api/v1/transactions`
//! - `GET|PATCH /api/v1/transactions/:id`

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
    self, CreateTransactionCommand, CreateTransactionError, CreateTransactionRequest,
    UpdateTransactionCommand, UpdateTransactionError, UpdateTransactionRequest,
};
use super::queries::{self, GetTransactionError, GetTransactionQuery, ListTransactionsQuery};
use crate::api::response::{ApiResponse, ApiResult, AppError};
use crate::auth::AuthUser;
use crate::features::FeatureState;

pub fn transactions_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", post(create_transaction).get(list_transactions))
        .route("/:id", get(get_transaction).patch(update_transaction))
}

async fn create_transaction(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Json(request): Json<CreateTransactionRequest>,
) -> ApiResult<Response> {
    let transaction =
        commands::create::handle(pool, CreateTransactionCommand { actor, request }).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(transaction))).into_response())
}

async fn update_transaction(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTransactionRequest>,
) -> ApiResult<Response> {
    let transaction =
        commands::update::handle(pool, UpdateTransactionCommand { actor, id, request }).await?;
    Ok(ApiResponse::success(transaction).into_response())
}

async fn list_transactions(
    State(pool): State<PgPool>,
    AuthUser(viewer): AuthUser,
    Query(mut query): Query<ListTransactionsQuery>,
) -> ApiResult<Response> {
    query.viewer = Some(viewer);
    let page = queries::list::handle(pool, query).await?;
    let meta = json!({ "pagination": page.pagination });
    Ok(ApiResponse::success_with_meta(page.items, meta).into_response())
}

async fn get_transaction(
    State(pool): State<PgPool>,
    AuthUser(viewer): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let transaction = queries::get::handle(pool, GetTransactionQuery { viewer, id }).await?;
    Ok(ApiResponse::success(transaction).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

impl From<CreateTransactionError> for AppError {
    fn from(err: CreateTransactionError) -> Self {
        match err {
            CreateTransactionError::Validation(e) => e.into(),
            CreateTransactionError::NotFound(_) => AppError::NotFound(err.to_string()),
            CreateTransactionError::OwnProperty => AppError::Forbidden(err.to_string()),
            CreateTransactionError::Unavailable(_) => AppError::Conflict(err.to_string()),
            CreateTransactionError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<UpdateTransactionError> for AppError {
    fn from(err: UpdateTransactionError) -> Self {
        match err {
            UpdateTransactionError::Validation(e) => e.into(),
            UpdateTransactionError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdateTransactionError::Forbidden => AppError::Forbidden(err.to_string()),
            UpdateTransactionError::NotPending(_) => AppError::Conflict(err.to_string()),
            UpdateTransactionError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetTransactionError> for AppError {
    fn from(err: GetTransactionError) -> Self {
        match err {
            GetTransactionError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetTransactionError::Database(e) => AppError::Database(e),
        }
    }
}
