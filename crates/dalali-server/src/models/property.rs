use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

use crate::auth::Owned;

pub const PROPERTY_COLUMNS: &str = "id, seller_id, title, description, price, price_per_day, \
                                    location, property_type, bedrooms, bathrooms, area, \
                                    amenities, status, is_available, created_at, updated_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "property_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    House,
    Vehicle,
}

/// Sale lifecycle of a listing. `is_available` is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "property_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Available,
    Pending,
    Sold,
    Rented,
}

impl PropertyStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, PropertyStatus::Available)
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Property {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: BigDecimal,
    pub price_per_day: Option<BigDecimal>,
    pub location: String,
    pub property_type: PropertyType,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub area: Option<BigDecimal>,
    pub amenities: Json<Vec<String>>,
    pub status: PropertyStatus,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// Rate charged per booked day; listings without a daily rate use their price.
    pub fn daily_rate(&self) -> &BigDecimal {
        self.price_per_day.as_ref().unwrap_or(&self.price)
    }
}

impl Owned for Property {
    fn owner_id(&self) -> Uuid {
        self.seller_id
    }
}
