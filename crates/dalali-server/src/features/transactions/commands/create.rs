//! Purchase command
//!
//! Buying a listing records a pending transaction for the asking price and
//! takes the property off the market until the payment settles.

use bigdecimal::BigDecimal;
use dalali_common::types::format_price;
use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::auth::Actor;
use crate::features::shared::validation::{validate_max_length, ValidationError};
use crate::models::{PropertyStatus, Transaction, TRANSACTION_COLUMNS};

pub const PAYMENT_REFERENCE_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub property_id: Uuid,
    #[serde(default)]
    pub payment_reference: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateTransactionCommand {
    pub actor: Actor,
    pub request: CreateTransactionRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateTransactionError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Property '{0}' not found")]
    NotFound(Uuid),

    #[error("You cannot buy your own property")]
    OwnProperty,

    #[error("Property is not available for purchase (status: {0:?})")]
    Unavailable(PropertyStatus),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Transaction, CreateTransactionError>> for CreateTransactionCommand {}

impl crate::cqrs::middleware::Command for CreateTransactionCommand {}

#[derive(FromRow)]
struct ListingForSale {
    seller_id: Uuid,
    price: BigDecimal,
    status: PropertyStatus,
}

impl CreateTransactionCommand {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(reference) = &self.request.payment_reference {
            validate_max_length(reference, "payment_reference", PAYMENT_REFERENCE_MAX_LENGTH)?;
        }
        Ok(())
    }
}

#[tracing::instrument(skip(pool, command), fields(user_id = %command.actor.user_id, property_id = %command.request.property_id))]
pub async fn handle(
    pool: PgPool,
    command: CreateTransactionCommand,
) -> Result<Transaction, CreateTransactionError> {
    command.validate()?;
    let property_id = command.request.property_id;

    let mut tx = pool.begin().await?;

    let listing = sqlx::query_as::<_, ListingForSale>(
        "SELECT seller_id, price, status FROM properties WHERE id = $1 FOR UPDATE",
    )
    .bind(property_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(CreateTransactionError::NotFound(property_id))?;

    if listing.seller_id == command.actor.user_id {
        return Err(CreateTransactionError::OwnProperty);
    }
    if !listing.status.is_open() {
        return Err(CreateTransactionError::Unavailable(listing.status));
    }

    let sql = format!(
        "INSERT INTO transactions (buyer_id, property_id, amount, payment_reference) \
         VALUES ($1, $2, $3, $4) RETURNING {}",
        TRANSACTION_COLUMNS
    );
    let transaction = sqlx::query_as::<_, Transaction>(&sql)
        .bind(command.actor.user_id)
        .bind(property_id)
        .bind(&listing.price)
        .bind(command.request.payment_reference.as_deref())
        .fetch_one(&mut *tx)
        .await?;

    sqlx::query("UPDATE properties SET status = 'pending', is_available = FALSE WHERE id = $1")
        .bind(property_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        transaction_id = %transaction.id,
        amount = %format_price(&transaction.amount),
        "Purchase started"
    );
    Ok(transaction)
}
