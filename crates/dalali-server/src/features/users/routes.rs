//! User API routes
//!
//! - `GET|PATCH /api/v1/users/me`
//! - `GET /api/v1/users` - Admins only
//! - `GET /api/v1/users/:id` - Self or admin

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use super::commands::{self, UpdateProfileCommand, UpdateProfileError, UpdateProfileRequest};
use super::queries::{self, GetUserError, GetUserQuery, ListUsersError, ListUsersQuery};
use crate::api::response::{ApiResponse, ApiResult, AppError};
use crate::auth::AuthUser;
use crate::features::FeatureState;

pub fn users_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", get(list_users))
        .route("/me", get(get_me).patch(update_me))
        .route("/:id", get(get_user))
}

async fn get_me(State(pool): State<PgPool>, AuthUser(viewer): AuthUser) -> ApiResult<Response> {
    let id = viewer.user_id;
    let user = queries::get::handle(pool, GetUserQuery { viewer, id }).await?;
    Ok(ApiResponse::success(user).into_response())
}

async fn update_me(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<Response> {
    let user =
        commands::update_profile::handle(pool, UpdateProfileCommand { actor, request }).await?;
    Ok(ApiResponse::success(user).into_response())
}

async fn list_users(
    State(pool): State<PgPool>,
    AuthUser(viewer): AuthUser,
    Query(mut query): Query<ListUsersQuery>,
) -> ApiResult<Response> {
    query.viewer = Some(viewer);
    let page = queries::list::handle(pool, query).await?;
    let meta = json!({ "pagination": page.pagination });
    Ok(ApiResponse::success_with_meta(page.items, meta).into_response())
}

async fn get_user(
    State(pool): State<PgPool>,
    AuthUser(viewer): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let user = queries::get::handle(pool, GetUserQuery { viewer, id }).await?;
    Ok(ApiResponse::success(user).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

impl From<UpdateProfileError> for AppError {
    fn from(err: UpdateProfileError) -> Self {
        match err {
            UpdateProfileError::Validation(e) => e.into(),
            UpdateProfileError::Duplicate(_) => AppError::Conflict(err.to_string()),
            UpdateProfileError::NotFound => AppError::NotFound(err.to_string()),
            UpdateProfileError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetUserError> for AppError {
    fn from(err: GetUserError) -> Self {
        match err {
            GetUserError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetUserError::Forbidden => AppError::Forbidden(err.to_string()),
            GetUserError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListUsersError> for AppError {
    fn from(err: ListUsersError) -> Self {
        match err {
            ListUsersError::Forbidden => AppError::Forbidden(err.to_string()),
            ListUsersError::Database(e) => AppError::Database(e),
        }
    }
}
