//! Authentication routes
//!
//! - `POST /api/v1/auth/register`
//! - `POST /api/v1/auth/token` - Username or email plus password
//! - `POST /api/v1/auth/token/refresh`

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use sqlx::PgPool;

use super::commands::{
    self, LoginCommand, LoginError, LoginRequest, RefreshCommand, RefreshError, RefreshRequest,
    RegisterCommand, RegisterError, RegisterRequest,
};
use crate::api::response::{ApiResponse, ApiResult, AppError};
use crate::auth::JwtKeys;
use crate::features::FeatureState;

pub fn auth_routes() -> Router<FeatureState> {
    Router::new()
        .route("/register", post(register))
        .route("/token", post(login))
        .route("/token/refresh", post(refresh))
}

async fn register(
    State(pool): State<PgPool>,
    State(keys): State<JwtKeys>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Response> {
    let response = commands::register::handle(pool, keys, RegisterCommand { request }).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

async fn login(
    State(pool): State<PgPool>,
    State(keys): State<JwtKeys>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Response> {
    let response = commands::login::handle(pool, keys, LoginCommand { request }).await?;
    Ok(ApiResponse::success(response).into_response())
}

async fn refresh(
    State(pool): State<PgPool>,
    State(keys): State<JwtKeys>,
    Json(request): Json<RefreshRequest>,
) -> ApiResult<Response> {
    let token = commands::refresh::handle(pool, keys, RefreshCommand { request }).await?;
    Ok(ApiResponse::success(token).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

impl From<RegisterError> for AppError {
    fn from(err: RegisterError) -> Self {
        match err {
            RegisterError::Validation(e) => AppError::ValidationError(e.to_string()),
            RegisterError::Duplicate(_) => AppError::Conflict(err.to_string()),
            RegisterError::Password(e) => e.into(),
            RegisterError::Token(e) => AppError::InternalError(e.to_string()),
            RegisterError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<LoginError> for AppError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::InvalidCredentials | LoginError::Inactive => {
                AppError::Unauthorized(err.to_string())
            },
            LoginError::Password(e) => e.into(),
            LoginError::Token(e) => AppError::InternalError(e.to_string()),
            LoginError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<RefreshError> for AppError {
    fn from(err: RefreshError) -> Self {
        match err {
            RefreshError::Token(e) => e.into(),
            RefreshError::Inactive => AppError::Unauthorized(err.to_string()),
            RefreshError::Database(e) => AppError::Database(e),
        }
    }
}
