//! Message API routes
//!
//! - `POST /api/v1/messages`
//! - `GET /api/v1/messages?unread=true`
//! - `GET /api/v1/messages/unread-count`
//! - `GET|DELETE /api/v1/messages/:id`
//! - `POST /api/v1/messages/:id/read` - Recipient only

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
    self, DeleteMessageCommand, DeleteMessageError, MarkReadCommand, MarkReadError,
    SendMessageCommand, SendMessageError, SendMessageRequest,
};
use super::queries::{self, GetMessageError, GetMessageQuery, ListMessagesQuery, UnreadCountQuery};
use crate::api::response::{ApiResponse, ApiResult, AppError};
use crate::auth::AuthUser;
use crate::features::FeatureState;

pub fn messages_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", post(send_message).get(list_messages))
        .route("/unread-count", get(unread_count))
        .route("/:id", get(get_message).delete(delete_message))
        .route("/:id/read", post(mark_read))
}

async fn send_message(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Json(request): Json<SendMessageRequest>,
) -> ApiResult<Response> {
    let message = commands::send::handle(pool, SendMessageCommand { actor, request }).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(message))).into_response())
}

async fn mark_read(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let message = commands::mark_read::handle(pool, MarkReadCommand { actor, id }).await?;
    Ok(ApiResponse::success(message).into_response())
}

async fn delete_message(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let response = commands::delete::handle(pool, DeleteMessageCommand { actor, id }).await?;
    Ok(ApiResponse::success(response).into_response())
}

async fn list_messages(
    State(pool): State<PgPool>,
    AuthUser(viewer): AuthUser,
    Query(mut query): Query<ListMessagesQuery>,
) -> ApiResult<Response> {
    query.viewer = Some(viewer);
    let page = queries::list::handle(pool, query).await?;
    let meta = json!({ "pagination": page.pagination });
    Ok(ApiResponse::success_with_meta(page.items, meta).into_response())
}

async fn unread_count(State(pool): State<PgPool>, AuthUser(viewer): AuthUser) -> ApiResult<Response> {
    let count = queries::list::unread_count(pool, UnreadCountQuery { viewer }).await?;
    Ok(ApiResponse::success(count).into_response())
}

async fn get_message(
    State(pool): State<PgPool>,
    AuthUser(viewer): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let message = queries::get::handle(pool, GetMessageQuery { viewer, id }).await?;
    Ok(ApiResponse::success(message).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

impl From<SendMessageError> for AppError {
    fn from(err: SendMessageError) -> Self {
        match err {
            SendMessageError::Validation(e) => e.into(),
            SendMessageError::UnknownReference => AppError::ValidationError(err.to_string()),
            SendMessageError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<MarkReadError> for AppError {
    fn from(err: MarkReadError) -> Self {
        match err {
            MarkReadError::NotFound(_) => AppError::NotFound(err.to_string()),
            MarkReadError::NotRecipient => AppError::Forbidden(err.to_string()),
            MarkReadError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeleteMessageError> for AppError {
    fn from(err: DeleteMessageError) -> Self {
        match err {
            DeleteMessageError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeleteMessageError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetMessageError> for AppError {
    fn from(err: GetMessageError) -> Self {
        match err {
            GetMessageError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetMessageError::Database(e) => AppError::Database(e),
        }
    }
}
