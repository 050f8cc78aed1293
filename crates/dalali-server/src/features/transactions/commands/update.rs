//! Update transaction command
//!
//! Settles a pending purchase. Completing it marks the property sold; a
//! failed or cancelled payment puts the property back on the market.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::create::PAYMENT_REFERENCE_MAX_LENGTH;
use crate::auth::Actor;
use crate::features::shared::validation::{validate_max_length, ValidationError};
use crate::models::{PropertyStatus, Transaction, TransactionStatus, TRANSACTION_COLUMNS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTransactionRequest {
    pub payment_reference: Option<String>,
    pub status: Option<TransactionStatus>,
}

#[derive(Debug, Clone)]
pub struct UpdateTransactionCommand {
    pub actor: Actor,
    pub id: Uuid,
    pub request: UpdateTransactionRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum UpdateTransactionError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Transaction '{0}' not found")]
    NotFound(Uuid),

    #[error("You do not have permission to modify this transaction")]
    Forbidden,

    #[error("Only pending transactions can be modified (status: {0:?})")]
    NotPending(TransactionStatus),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Transaction, UpdateTransactionError>> for UpdateTransactionCommand {}

impl crate::cqrs::middleware::Command for UpdateTransactionCommand {}

#[derive(FromRow)]
struct LockedTransaction {
    buyer_id: Uuid,
    property_id: Uuid,
    status: TransactionStatus,
}

impl UpdateTransactionRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.payment_reference.is_none() && self.status.is_none() {
            return Err(ValidationError::Invalid(
                "Provide payment_reference or status".to_string(),
            ));
        }
        if let Some(reference) = &self.payment_reference {
            validate_max_length(reference, "payment_reference", PAYMENT_REFERENCE_MAX_LENGTH)?;
        }
        Ok(())
    }
}

/// Property status implied by settling a purchase with `status`.
pub fn settled_property_status(status: TransactionStatus) -> Option<PropertyStatus> {
    match status {
        TransactionStatus::Pending => None,
        TransactionStatus::Completed => Some(PropertyStatus::Sold),
        TransactionStatus::Failed | TransactionStatus::Cancelled => Some(PropertyStatus::Available),
    }
}

#[tracing::instrument(skip(pool, command), fields(transaction_id = %command.id, status = ?command.request.status))]
pub async fn handle(
    pool: PgPool,
    command: UpdateTransactionCommand,
) -> Result<Transaction, UpdateTransactionError> {
    command.request.validate()?;

    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, LockedTransaction>(
        "SELECT buyer_id, property_id, status FROM transactions WHERE id = $1 FOR UPDATE",
    )
    .bind(command.id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(UpdateTransactionError::NotFound(command.id))?;

    if !command.actor.is_admin() && command.actor.user_id != current.buyer_id {
        return Err(UpdateTransactionError::Forbidden);
    }
    if current.status != TransactionStatus::Pending {
        return Err(UpdateTransactionError::NotPending(current.status));
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE transactions SET ");
    let mut set = builder.separated(", ");
    set.push("updated_at = NOW()");
    if let Some(reference) = &command.request.payment_reference {
        set.push("payment_reference = ").push_bind_unseparated(reference.trim());
    }
    if let Some(status) = command.request.status {
        set.push("status = ").push_bind_unseparated(status);
    }
    builder
        .push(" WHERE id = ")
        .push_bind(command.id)
        .push(format!(" RETURNING {}", TRANSACTION_COLUMNS));
    let transaction = builder.build_query_as::<Transaction>().fetch_one(&mut *tx).await?;

    if let Some(property_status) = command.request.status.and_then(settled_property_status) {
        sqlx::query("UPDATE properties SET status = $1, is_available = $2 WHERE id = $3")
            .bind(property_status)
            .bind(property_status == PropertyStatus::Available)
            .bind(current.property_id)
            .execute(&mut *tx)
            .await?;
        tracing::info!(property_id = %current.property_id, status = ?property_status, "Property settled");
    }

    tx.commit().await?;
    Ok(transaction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settlement_moves_property() {
        assert_eq!(
            settled_property_status(TransactionStatus::Completed),
            Some(PropertyStatus::Sold)
        );
        assert_eq!(
            settled_property_status(TransactionStatus::Failed),
            Some(PropertyStatus::Available)
        );
        assert_eq!(
            settled_property_status(TransactionStatus::Cancelled),
            Some(PropertyStatus::Available)
        );
        assert_eq!(settled_property_status(TransactionStatus::Pending), None);
    }

    #[test]
    fn test_empty_update_rejected() {
        assert!(UpdateTransactionRequest::default().validate().is_err());
        let request = UpdateTransactionRequest {
            payment_reference: Some("MPESA-QX81K2".to_string()),
            status: None,
        };
        assert!(request.validate().is_ok());
    }
}
