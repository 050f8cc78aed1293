use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::Owned;

pub const SUBSCRIPTION_COLUMNS: &str =
    "id, seller_id, plan_name, price, start_date, end_date, is_active, created_at";

/// A seller's listing plan
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub plan_name: String,
    pub price: BigDecimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Owned for Subscription {
    fn owner_id(&self) -> Uuid {
        self.seller_id
    }
}
