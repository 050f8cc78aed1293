//! Property API routes
//!
//! - `POST /api/v1/properties` - Create a listing (sellers)
//! - `GET /api/v1/properties` - Search listings
//! - `GET /api/v1/properties/mine` - The caller's listings, any status
//! - `GET|PUT|PATCH|DELETE /api/v1/properties/:id`
//! - `GET /api/v1/properties/:id/availability?start_date&end_date`
//! - `GET|POST /api/v1/properties/:id/images`
//! - `DELETE /api/v1/properties/:id/images/:image_id`
//! - `POST /api/v1/properties/:id/images/:image_id/primary`

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use super::commands::{
    self, AddImageCommand, CreatePropertyCommand, CreatePropertyError, CreatePropertyRequest,
    DeleteImageCommand, DeletePropertyCommand, DeletePropertyError, SetPrimaryImageCommand,
    UpdatePropertyCommand, UpdatePropertyError, UpdatePropertyRequest,
};
use super::queries::{
    self, CheckAvailabilityQuery, GetPropertyError, GetPropertyQuery, ListImagesQuery,
    ListPropertiesError, ListPropertiesQuery,
};
use crate::api::response::{ApiResponse, ApiResult, AppError};
use crate::auth::{AuthUser, MaybeAuthUser};
use crate::features::FeatureState;
use crate::guard::NewImage;

pub fn properties_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", post(create_property).get(list_properties))
        .route("/mine", get(list_my_properties))
        .route(
            "/:id",
            get(get_property)
                .put(update_property)
                .patch(update_property)
                .delete(delete_property),
        )
        .route("/:id/availability", get(check_availability))
        .route("/:id/images", get(list_images).post(add_image))
        .route("/:id/images/:image_id", delete(delete_image))
        .route("/:id/images/:image_id/primary", post(set_primary_image))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

async fn create_property(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Json(request): Json<CreatePropertyRequest>,
) -> ApiResult<Response> {
    let property = commands::create::handle(pool, CreatePropertyCommand { actor, request }).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(property))).into_response())
}

async fn update_property(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePropertyRequest>,
) -> ApiResult<Response> {
    let property =
        commands::update::handle(pool, UpdatePropertyCommand { actor, id, request }).await?;
    Ok(ApiResponse::success(property).into_response())
}

async fn delete_property(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let response = commands::delete::handle(pool, DeletePropertyCommand { actor, id }).await?;
    Ok(ApiResponse::success(response).into_response())
}

async fn add_image(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Path(property_id): Path<Uuid>,
    Json(image): Json<NewImage>,
) -> ApiResult<Response> {
    let image = commands::add_image::handle(
        pool,
        AddImageCommand {
            actor,
            property_id,
            image,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(image))).into_response())
}

async fn delete_image(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Path((property_id, image_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Response> {
    let response = commands::delete_image::handle(
        pool,
        DeleteImageCommand {
            actor,
            property_id,
            image_id,
        },
    )
    .await?;
    Ok(ApiResponse::success(response).into_response())
}

async fn set_primary_image(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Path((property_id, image_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Response> {
    let image = commands::set_primary_image::handle(
        pool,
        SetPrimaryImageCommand {
            actor,
            property_id,
            image_id,
        },
    )
    .await?;
    Ok(ApiResponse::success(image).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

async fn list_properties(
    State(pool): State<PgPool>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Query(mut query): Query<ListPropertiesQuery>,
) -> ApiResult<Response> {
    query.viewer = viewer;
    query.mine = false;
    paginated(queries::list::handle(pool, query).await?)
}

async fn list_my_properties(
    State(pool): State<PgPool>,
    AuthUser(actor): AuthUser,
    Query(mut query): Query<ListPropertiesQuery>,
) -> ApiResult<Response> {
    query.viewer = Some(actor);
    query.mine = true;
    paginated(queries::list::handle(pool, query).await?)
}

fn paginated(page: crate::features::shared::Paginated<crate::models::Property>) -> ApiResult<Response> {
    let meta = json!({ "pagination": page.pagination });
    Ok(ApiResponse::success_with_meta(page.items, meta).into_response())
}

async fn get_property(
    State(pool): State<PgPool>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let detail = queries::get::handle(pool, GetPropertyQuery { viewer, id }).await?;
    Ok(ApiResponse::success(detail).into_response())
}

async fn list_images(
    State(pool): State<PgPool>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(property_id): Path<Uuid>,
) -> ApiResult<Response> {
    let images =
        queries::list_images::handle(pool, ListImagesQuery { viewer, property_id }).await?;
    Ok(ApiResponse::success(images).into_response())
}

#[tracing::instrument(skip(pool, query), fields(property_id = %property_id))]
async fn check_availability(
    State(pool): State<PgPool>,
    Path(property_id): Path<Uuid>,
    Query(mut query): Query<CheckAvailabilityQuery>,
) -> ApiResult<Response> {
    query.property_id = property_id;
    let report = queries::check_availability::handle(pool, query).await?;
    Ok(ApiResponse::success(report).into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

impl From<CreatePropertyError> for AppError {
    fn from(err: CreatePropertyError) -> Self {
        match err {
            CreatePropertyError::Validation(e) => AppError::ValidationError(e.to_string()),
            CreatePropertyError::NotSeller => AppError::Forbidden(err.to_string()),
            CreatePropertyError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<UpdatePropertyError> for AppError {
    fn from(err: UpdatePropertyError) -> Self {
        match err {
            UpdatePropertyError::Validation(e) => AppError::ValidationError(e.to_string()),
            UpdatePropertyError::NotFound(_) => AppError::NotFound(err.to_string()),
            UpdatePropertyError::Forbidden => AppError::Forbidden(err.to_string()),
            UpdatePropertyError::PendingPurchase(_) => AppError::Conflict(err.to_string()),
            UpdatePropertyError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<DeletePropertyError> for AppError {
    fn from(err: DeletePropertyError) -> Self {
        match err {
            DeletePropertyError::NotFound(_) => AppError::NotFound(err.to_string()),
            DeletePropertyError::Forbidden => AppError::Forbidden(err.to_string()),
            DeletePropertyError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<GetPropertyError> for AppError {
    fn from(err: GetPropertyError) -> Self {
        match err {
            GetPropertyError::NotFound(_) => AppError::NotFound(err.to_string()),
            GetPropertyError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<ListPropertiesError> for AppError {
    fn from(err: ListPropertiesError) -> Self {
        match err {
            ListPropertiesError::Validation(e) => AppError::ValidationError(e.to_string()),
            ListPropertiesError::Database(e) => AppError::Database(e),
        }
    }
}
