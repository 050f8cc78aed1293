//! Get transaction query

use mediator::Request;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Actor;
use crate::models::{Transaction, TRANSACTION_COLUMNS};

#[derive(Debug, Clone)]
pub struct GetTransactionQuery {
    pub viewer: Actor,
    pub id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum GetTransactionError {
    #[error("Transaction '{0}' not found")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<Transaction, GetTransactionError>> for GetTransactionQuery {}

impl crate::cqrs::middleware::Query for GetTransactionQuery {}

#[tracing::instrument(skip(pool, query), fields(transaction_id = %query.id))]
pub async fn handle(pool: PgPool, query: GetTransactionQuery) -> Result<Transaction, GetTransactionError> {
    let sql = format!("SELECT {} FROM transactions WHERE id = $1", TRANSACTION_COLUMNS);
    let transaction = sqlx::query_as::<_, Transaction>(&sql)
        .bind(query.id)
        .fetch_optional(&pool)
        .await?
        .filter(|t| query.viewer.can_manage(t))
        .ok_or(GetTransactionError::NotFound(query.id))?;
    Ok(transaction)
}
