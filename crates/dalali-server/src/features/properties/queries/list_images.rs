//! List property images query

use mediator::Request;
use sqlx::PgPool;
use uuid::Uuid;

use super::get::{fetch_images, fetch_property, is_visible_to, GetPropertyError};
use crate::auth::Actor;
use crate::models::PropertyImage;

#[derive(Debug, Clone)]
pub struct ListImagesQuery {
    pub viewer: Option<Actor>,
    pub property_id: Uuid,
}

impl Request<Result<Vec<PropertyImage>, GetPropertyError>> for ListImagesQuery {}

impl crate::cqrs::middleware::Query for ListImagesQuery {}

pub async fn handle(pool: PgPool, query: ListImagesQuery) -> Result<Vec<PropertyImage>, GetPropertyError> {
    fetch_property(&pool, query.property_id)
        .await?
        .filter(|p| is_visible_to(p, query.viewer.as_ref()))
        .ok_or(GetPropertyError::NotFound(query.property_id))?;

    Ok(fetch_images(&pool, query.property_id).await?)
}
