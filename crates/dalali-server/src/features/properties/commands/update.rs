//! Update property command
//!
//! Partial update by the owner or an admin. Setting `status` also sets
//! `is_available`, which is true only for `available`. The row is locked for
//! the update, and `status` cannot change while a purchase is pending.

use bigdecimal::BigDecimal;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::create::ListingFields;
use crate::auth::Actor;
use crate::features::shared::validation::ValidationError;
use crate::models::{Property, PropertyStatus, PropertyType, PROPERTY_COLUMNS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePropertyRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<BigDecimal>,
    pub price_per_day: Option<BigDecimal>,
    pub location: Option<String>,
    pub property_type: Option<PropertyType>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub area: Option<BigDecimal>,
    pub amenities: Option<Vec<String>>,
    pub status: Option<PropertyStatus>,
}

impl UpdatePropertyRequest {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.price_per_day.is_none()
            && self.location.is_none()
            && self.property_type.is_none()
            && self.bedrooms.is_none()
            && self.bathrooms.is_none()
            && self.area.is_none()
            && self.amenities.is_none()
            && self.status.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct UpdatePropertyCommand {
    pub actor: Actor,
    pub id: Uuid,
    pub request: UpdatePropertyRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdatePropertyError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Property '{0}' not found")]
    NotFound(Uuid),

    #[error("Only the property's seller can change it")]
    Forbidden,

    #[error("Property status cannot change while purchase '{0}' is pending")]
    PendingPurchase(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Property, UpdatePropertyError>> for UpdatePropertyCommand {}

impl crate::cqrs::middleware::Command for UpdatePropertyCommand {}

impl UpdatePropertyCommand {
    #[tracing::instrument(skip(self), fields(property_id = %self.id))]
    pub fn validate(&self) -> Result<(), UpdatePropertyError> {
        let r = &self.request;
        ListingFields {
            title: r.title.as_deref(),
            description: r.description.as_deref(),
            price: r.price.as_ref(),
            price_per_day: r.price_per_day.as_ref(),
            location: r.location.as_deref(),
            bedrooms: r.bedrooms,
            bathrooms: r.bathrooms,
            area: r.area.as_ref(),
            amenities: r.amenities.as_deref(),
        }
        .validate()?;
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(user_id = %command.actor.user_id, property_id = %command.id))]
pub async fn handle(
    pool: PgPool,
    command: UpdatePropertyCommand,
) -> Result<Property, UpdatePropertyError> {
    command.validate()?;

    let mut tx = pool.begin().await?;

    let sql = format!("SELECT {} FROM properties WHERE id = $1 FOR UPDATE", PROPERTY_COLUMNS);
    let current = sqlx::query_as::<_, Property>(&sql)
        .bind(command.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(UpdatePropertyError::NotFound(command.id))?;
    if !command.actor.can_manage(&current) {
        return Err(UpdatePropertyError::Forbidden);
    }

    let r = command.request;
    if r.is_empty() {
        return Ok(current);
    }

    if r.status.is_some_and(|status| status != current.status) {
        let pending: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM transactions WHERE property_id = $1 AND status = 'pending' LIMIT 1",
        )
        .bind(command.id)
        .fetch_optional(&mut *tx)
        .await?;
        if let Some(transaction_id) = pending {
            return Err(UpdatePropertyError::PendingPurchase(transaction_id));
        }
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE properties SET ");
    {
        let mut set = builder.separated(", ");
        if let Some(title) = r.title {
            set.push("title = ").push_bind_unseparated(title.trim().to_string());
        }
        if let Some(description) = r.description {
            set.push("description = ").push_bind_unseparated(description);
        }
        if let Some(price) = r.price {
            set.push("price = ").push_bind_unseparated(price);
        }
        if let Some(rate) = r.price_per_day {
            set.push("price_per_day = ").push_bind_unseparated(rate);
        }
        if let Some(location) = r.location {
            set.push("location = ").push_bind_unseparated(location.trim().to_string());
        }
        if let Some(property_type) = r.property_type {
            set.push("property_type = ").push_bind_unseparated(property_type);
        }
        if let Some(bedrooms) = r.bedrooms {
            set.push("bedrooms = ").push_bind_unseparated(bedrooms);
        }
        if let Some(bathrooms) = r.bathrooms {
            set.push("bathrooms = ").push_bind_unseparated(bathrooms);
        }
        if let Some(area) = r.area {
            set.push("area = ").push_bind_unseparated(area);
        }
        if let Some(amenities) = r.amenities {
            set.push("amenities = ").push_bind_unseparated(Json(amenities));
        }
        if let Some(status) = r.status {
            set.push("status = ").push_bind_unseparated(status);
            set.push("is_available = ").push_bind_unseparated(status.is_open());
        }
    }
    builder
        .push(" WHERE id = ")
        .push_bind(command.id)
        .push(" RETURNING ")
        .push(PROPERTY_COLUMNS);

    let property = builder
        .build_query_as::<Property>()
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(UpdatePropertyError::NotFound(command.id))?;

    tx.commit().await?;

    tracing::info!(status = ?property.status, "Property updated");
    Ok(property)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    #[test]
    fn test_empty_request() {
        let request: UpdatePropertyRequest = serde_json::from_str("{}").unwrap();
        assert!(request.is_empty());

        let request: UpdatePropertyRequest =
            serde_json::from_str(r#"{"status": "sold"}"#).unwrap();
        assert!(!request.is_empty());
        assert_eq!(request.status, Some(PropertyStatus::Sold));
    }

    #[test]
    fn test_validates_only_present_fields() {
        let command = UpdatePropertyCommand {
            actor: Actor::new(Uuid::new_v4(), Role::Seller),
            id: Uuid::new_v4(),
            request: UpdatePropertyRequest {
                bedrooms: Some(3),
                ..Default::default()
            },
        };
        assert!(command.validate().is_ok());

        let command = UpdatePropertyCommand {
            request: UpdatePropertyRequest {
                title: Some(String::new()),
                ..Default::default()
            },
            ..command
        };
        assert!(matches!(command.validate(), Err(UpdatePropertyError::Validation(_))));
    }
}
