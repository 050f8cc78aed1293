use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::Owned;

pub const TRANSACTION_COLUMNS: &str = "id, buyer_id, property_id, amount, status, \
                                       payment_reference, transaction_date, updated_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub buyer_id: Uuid,
    pub property_id: Uuid,
    pub amount: BigDecimal,
    pub status: TransactionStatus,
    pub payment_reference: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Transaction {
    fn owner_id(&self) -> Uuid {
        self.buyer_id
    }
}
