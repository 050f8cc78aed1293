//! Get property query

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::auth::Actor;
use crate::models::{Property, PropertyImage, IMAGE_COLUMNS, PROPERTY_COLUMNS};

#[derive(Debug, Clone)]
pub struct GetPropertyQuery {
    pub viewer: Option<Actor>,
    pub id: Uuid,
}

/// A listing with its images, primary first
#[derive(Debug, Clone, Serialize)]
pub struct PropertyDetail {
    #[serde(flatten)]
    pub property: Property,
    pub images: Vec<PropertyImage>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetPropertyError {
    #[error("Property '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<PropertyDetail, GetPropertyError>> for GetPropertyQuery {}

impl crate::cqrs::middleware::Query for GetPropertyQuery {}

pub(crate) async fn fetch_property<'e, E>(executor: E, id: Uuid) -> Result<Option<Property>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let sql = format!("SELECT {} FROM properties WHERE id = $1", PROPERTY_COLUMNS);
    sqlx::query_as::<_, Property>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn fetch_images<'e, E>(executor: E, property_id: Uuid) -> Result<Vec<PropertyImage>, sqlx::Error>
where
    E: PgExecutor<'e>,
{
    let sql = format!(
        "SELECT {} FROM property_images WHERE property_id = $1 ORDER BY is_primary DESC, created_at",
        IMAGE_COLUMNS
    );
    sqlx::query_as::<_, PropertyImage>(&sql)
        .bind(property_id)
        .fetch_all(executor)
        .await
}

/// Listings that are off the market are only visible to their seller and admins.
pub(crate) fn is_visible_to(property: &Property, viewer: Option<&Actor>) -> bool {
    property.is_available || viewer.is_some_and(|actor| actor.can_manage(property))
}

#[tracing::instrument(skip(pool, query), fields(property_id = %query.id))]
pub async fn handle(pool: PgPool, query: GetPropertyQuery) -> Result<PropertyDetail, GetPropertyError> {
    let property = fetch_property(&pool, query.id)
        .await?
        .filter(|p| is_visible_to(p, query.viewer.as_ref()))
        .ok_or(GetPropertyError::NotFound(query.id))?;

    let images = fetch_images(&pool, property.id).await?;

    Ok(PropertyDetail { property, images })
}
