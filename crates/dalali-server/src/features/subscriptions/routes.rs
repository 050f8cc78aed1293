//! Subscription API routes
//!
//! - `POST /api/v1/subscriptions` - Sellers only
//! - `GET /api/v1/subscriptions`
//! - `GET|PUT|DELETE /api/v1/subscriptions/:id` - Owner or admin

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use super::commands::{
    self, CreateSubscriptionCommand, CreateSubscriptionError, CreateSubscriptionRequest,
    DeleteSubscriptionCommand, DeleteSubscriptionError, UpdateSubscriptionCommand,
    UpdateSubscriptionError, UpdateSubscriptionRequest,
};
use super::queries::{self, GetSubscriptionError, GetSubscriptionQuery, ListSubscriptionsQuery};
use crate::api::response::{ApiResponse, ApiResult, AppError};
use crate::auth::AuthUser;
use crate::features::FeatureState;

pub fn subscriptions_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", post(create_subscription).get(list_subscriptions))
        .route(
            "/:id",
            get(get_subscription)
                .put(update_subscription)
                .patch(update_subscription)
                .delete(delete_subscription),
        )
}

async fn create_subscription(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Json(request): Json<CreateSubscriptionRequest>,
) -> ApiResult<Response> {
    let subscription =
        commands::create::handle(pool, CreateSubscriptionCommand { actor, request }).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(subscription))).into_response())
}

async fn update_subscription(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSubscriptionRequest>,
) -> ApiResult<Response> {
    let subscription =
        commands::update::handle(pool, UpdateSubscriptionCommand { actor, id, request }).await?;
    Ok(ApiResponse::success(subscription).into_response())
}

async fn delete_subscription(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let response = commands::delete::handle(pool, DeleteSubscriptionCommand { actor, id }).await?;
    Ok(ApiResponse::success(response).into_response())
}

async fn list_subscriptions(
    State(pool): State<PgPool>,
    AuthUser(viewer): AuthUser,
) -> ApiResult<Response> {
    let subscriptions = queries::list::handle(pool, ListSubscriptionsQuery { viewer }).await?;
    Ok(ApiResponse::success(subscriptions).into_response())
}

async fn get_subscription(
    State(pool): State<PgPool>,
    AuthUser(viewer): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let subscription = queries::get::handle(pool, GetSubscriptionQuery { viewer, id }).await?;
    Ok(ApiResponse::success(subscription).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

impl From<CreateSubscriptionError> for AppError {
    fn from(err: CreateSubscriptionError) -> Self {
        match err {
            CreateSubscriptionError::Validation(e) => e.into(),
            CreateSubscriptionError::NotSeller => AppError::Forbidden(err.to_string()),
            CreateSubscriptionError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<UpdateSubscriptionError> for AppError {
    fn from(err: UpdateSubscriptionError) -> Self {
        match err {
            UpdateSubscriptionError::Validation(e) => e.into(),
            UpdateSubscriptionError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdateSubscriptionError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeleteSubscriptionError> for AppError {
    fn from(err: DeleteSubscriptionError) -> Self {
        match err {
            DeleteSubscriptionError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeleteSubscriptionError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetSubscriptionError> for AppError {
    fn from(err: GetSubscriptionError) -> Self {
        match err {
            GetSubscriptionError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetSubscriptionError::Database(e) => AppError::Database(e),
        }
    }
}
