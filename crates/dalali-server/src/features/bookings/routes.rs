//! Booking API routes
//!
//! - `POST /api/v1/bookings` - Request a booking
//! - `GET /api/v1/bookings` - The caller's requests (everything for admins)
//! - `GET /api/v1/bookings/seller` - Bookings on the caller's listings
//! - `GET /api/v1/bookings/:id`
//! - `POST /api/v1/bookings/:id/{confirm,reject,cancel,complete}`

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

use super::commands::{self, CreateBookingCommand, TransitionBookingCommand};
use super::queries::{
    self, BookingScope, GetBookingError, GetBookingQuery, ListBookingsError, ListBookingsQuery,
};
use crate::api::response::{ApiResponse, ApiResult, AppError};
use crate::auth::{Actor, AuthUser};
use crate::features::FeatureState;
use crate::guard::{BookingAction, NewBooking};

pub fn bookings_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", post(create_booking).get(list_bookings))
        .route("/seller", get(list_seller_bookings))
        .route("/:id", get(get_booking))
        .route("/:id/confirm", post(confirm_booking))
        .route("/:id/reject", post(reject_booking))
        .route("/:id/cancel", post(cancel_booking))
        .route("/:id/complete", post(complete_booking))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

async fn create_booking(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Json(request): Json<NewBooking>,
) -> ApiResult<Response> {
    let booking = commands::create::handle(pool, CreateBookingCommand { actor, request }).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(booking))).into_response())
}

async fn transition(
    pool: PgPool,
    actor: Actor,
    booking_id: Uuid,
    action: BookingAction,
) -> ApiResult<Response> {
    let booking = commands::transition::handle(
        pool,
        TransitionBookingCommand {
            actor,
            booking_id,
            action,
        },
    )
    .await?;
    Ok(ApiResponse::success(booking).into_response())
}

async fn confirm_booking(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    transition(pool, actor, id, BookingAction::Confirm).await
}

async fn reject_booking(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    transition(pool, actor, id, BookingAction::Reject).await
}

async fn cancel_booking(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    transition(pool, actor, id, BookingAction::Cancel).await
}

async fn complete_booking(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    transition(pool, actor, id, BookingAction::Complete).await
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

async fn list_bookings(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Query(mut query): Query<ListBookingsQuery>,
) -> ApiResult<Response> {
    query.viewer = Some(actor);
    query.scope = BookingScope::Requested;
    let page = queries::list::handle(pool, query).await?;
    let meta = json!({ "pagination": page.pagination });
    Ok(ApiResponse::success_with_meta(page.items, meta).into_response())
}

async fn list_seller_bookings(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Query(mut query): Query<ListBookingsQuery>,
) -> ApiResult<Response> {
    query.viewer = Some(actor);
    query.scope = BookingScope::Received;
    let page = queries::list::handle(pool, query).await?;
    let meta = json!({ "pagination": page.pagination });
    Ok(ApiResponse::success_with_meta(page.items, meta).into_response())
}

async fn get_booking(
    State(pool): State<PgPool>,
    AuthUser(viewer): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let booking = queries::get::handle(pool, GetBookingQuery { viewer, id }).await?;
    Ok(ApiResponse::success(booking).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

impl From<GetBookingError> for AppError {
    fn from(err: GetBookingError) -> Self {
        match err {
            GetBookingError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetBookingError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListBookingsError> for AppError {
    fn from(err: ListBookingsError) -> Self {
        match err {
            ListBookingsError::NotSeller => AppError::Forbidden(err.to_string()),
            ListBookingsError::Database(e) => AppError::Database(e),
        }
    }
}
