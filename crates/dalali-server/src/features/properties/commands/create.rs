//! Create property command
//!
//! Sellers (and admins) publish listings. A new listing starts `available`.

use bigdecimal::BigDecimal;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, PgPool};

use crate::auth::Actor;
use crate::features::shared::validation::{
    validate_max_length, validate_positive, validate_text, ValidationError,
};
use crate::models::{Property, PropertyType, PROPERTY_COLUMNS};

pub const TITLE_MAX_LENGTH: usize = 200;

pub const LOCATION_MAX_LENGTH: usize = 100;

pub const AMENITY_MAX_LENGTH: usize = 100;

pub const DESCRIPTION_MAX_LENGTH: usize = 10_000;

/// Listing fields supplied by the seller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePropertyRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: BigDecimal,
    #[serde(default)]
    pub price_per_day: Option<BigDecimal>,
    pub location: String,
    #[serde(default = "default_property_type")]
    pub property_type: PropertyType,
    #[serde(default)]
    pub bedrooms: i32,
    #[serde(default)]
    pub bathrooms: i32,
    #[serde(default)]
    pub area: Option<BigDecimal>,
    #[serde(default)]
    pub amenities: Vec<String>,
}

fn default_property_type() -> PropertyType {
    PropertyType::House
}

#[derive(Debug, Clone)]
pub struct CreatePropertyCommand {
    pub actor: Actor,
    pub request: CreatePropertyRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum CreatePropertyError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Only sellers can list properties")]
    NotSeller,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Property, CreatePropertyError>> for CreatePropertyCommand {}

impl crate::cqrs::middleware::Command for CreatePropertyCommand {}

/// Listing fields to check; `None` means unchanged.
#[derive(Debug, Default)]
pub(crate) struct ListingFields<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub price: Option<&'a BigDecimal>,
    pub price_per_day: Option<&'a BigDecimal>,
    pub location: Option<&'a str>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: Option<&'a BigDecimal>,
    pub amenities: Option<&'a [String]>,
}

impl ListingFields<'_> {
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = self.title {
            validate_text(title, "title", TITLE_MAX_LENGTH)?;
        }
        if let Some(description) = self.description {
            validate_max_length(description, "description", DESCRIPTION_MAX_LENGTH)?;
        }
        if let Some(price) = self.price {
            validate_positive(price, "price")?;
        }
        if let Some(rate) = self.price_per_day {
            validate_positive(rate, "price_per_day")?;
        }
        if let Some(location) = self.location {
            validate_text(location, "location", LOCATION_MAX_LENGTH)?;
        }
        if self.bedrooms.is_some_and(|n| n < 0) {
            return Err(ValidationError::Negative { field: "bedrooms" });
        }
        if self.bathrooms.is_some_and(|n| n < 0) {
            return Err(ValidationError::Negative { field: "bathrooms" });
        }
        if let Some(area) = self.area {
            validate_positive(area, "area")?;
        }
        for amenity in self.amenities.unwrap_or_default() {
            validate_text(amenity, "amenities", AMENITY_MAX_LENGTH)?;
        }
        Ok(())
    }
}

impl CreatePropertyCommand {
    #[tracing::instrument(skip(self), fields(title = %self.request.title))]
    pub fn validate(&self) -> Result<(), CreatePropertyError> {
        let r = &self.request;
        ListingFields {
            title: Some(&r.title),
            description: Some(&r.description),
            price: Some(&r.price),
            price_per_day: r.price_per_day.as_ref(),
            location: Some(&r.location),
            bedrooms: Some(r.bedrooms),
            bathrooms: Some(r.bathrooms),
            area: r.area.as_ref(),
            amenities: Some(&r.amenities),
        }
        .validate()?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(user_id = %command.actor.user_id))]
pub async fn handle(
    pool: PgPool,
    command: CreatePropertyCommand,
) -> Result<Property, CreatePropertyError> {
    if !command.actor.can_sell() {
        return Err(CreatePropertyError::NotSeller);
    }
    command.validate()?;

    let r = command.request;
    let sql = format!(
        "INSERT INTO properties (seller_id, title, description, price, price_per_day, location, \
         property_type, bedrooms, bathrooms, area, amenities) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {}",
        PROPERTY_COLUMNS
    );
    let property = sqlx::query_as::<_, Property>(&sql)
        .bind(command.actor.user_id)
        .bind(r.title.trim())
        .bind(&r.description)
        .bind(&r.price)
        .bind(&r.price_per_day)
        .bind(r.location.trim())
        .bind(r.property_type)
        .bind(r.bedrooms)
        .bind(r.bathrooms)
        .bind(&r.area)
        .bind(Json(&r.amenities))
        .fetch_one(&pool)
        .await?;

    tracing::info!(property_id = %property.id, "Property created");
    Ok(property)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use std::str::FromStr;
    use uuid::Uuid;

    fn request() -> CreatePropertyRequest {
        serde_json::from_value(serde_json::json!({
            "title": "Beach house",
            "price": "25000.00",
            "price_per_day": "120.00",
            "location": "Diani"
        }))
        .unwrap()
    }

    fn command(request: CreatePropertyRequest) -> CreatePropertyCommand {
        CreatePropertyCommand {
            actor: Actor::new(Uuid::new_v4(), Role::Seller),
            request,
        }
    }

    #[test]
    fn test_defaults_from_json() {
        let r = request();
        assert_eq!(r.property_type, PropertyType::House);
        assert_eq!(r.bedrooms, 0);
        assert!(r.amenities.is_empty());
        assert!(command(r).validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_fields() {
        let mut r = request();
        r.title = "  ".into();
        assert!(matches!(
            command(r).validate(),
            Err(CreatePropertyError::Validation(ValidationError::Required { field: "title" }))
        ));

        let mut r = request();
        r.price = BigDecimal::from(0);
        assert!(command(r).validate().is_err());

        let mut r = request();
        r.price_per_day = Some(BigDecimal::from_str("-5").unwrap());
        assert!(command(r).validate().is_err());

        let mut r = request();
        r.location = "x".repeat(LOCATION_MAX_LENGTH + 1);
        assert!(command(r).validate().is_err());

        let mut r = request();
        r.bedrooms = -1;
        assert!(command(r).validate().is_err());
    }
}
