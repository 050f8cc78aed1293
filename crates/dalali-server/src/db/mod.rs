//! Connection pool setup and SQLSTATE classification

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use thiserror::Error;

use crate::config::DatabaseConfig;

/// `serialization_failure`, raised under contention at higher isolation levels
pub const SQLSTATE_SERIALIZATION_FAILURE: &str = "40001";
/// `deadlock_detected`
pub const SQLSTATE_DEADLOCK_DETECTED: &str = "40P01";
/// `exclusion_violation`, raised by the booking overlap constraint
pub const SQLSTATE_EXCLUSION_VIOLATION: &str = "23P01";
/// `check_violation`
pub const SQLSTATE_CHECK_VIOLATION: &str = "23514";

/// Database operation errors with contextual information
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Database configuration error: {0}. Check DATABASE_URL and connection settings.")]
    Config(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Build the shared pool from the `database` section of the configuration.
pub async fn create_pool(config: &DatabaseConfig) -> DbResult<PgPool> {
    if config.url.is_empty() {
        return Err(DbError::Config("DATABASE_URL is empty".to_string()));
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await?;

    tracing::info!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Database connection pool created"
    );

    Ok(pool)
}

/// Apply every pending migration from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> DbResult<()> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| DbError::Sqlx(e.into()))
}

pub async fn health_check(pool: &PgPool) -> DbResult<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(DbError::from)
}

/// SQLSTATE code of a database error, if the error came from the server.
pub fn sqlstate(error: &sqlx::Error) -> Option<String> {
    match error {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    }
}

/// Failures worth one transparent retry: serialization conflicts and deadlocks.
pub fn is_transient(error: &sqlx::Error) -> bool {
    matches!(
        sqlstate(error).as_deref(),
        Some(SQLSTATE_SERIALIZATION_FAILURE) | Some(SQLSTATE_DEADLOCK_DETECTED)
    )
}

pub fn is_exclusion_violation(error: &sqlx::Error) -> bool {
    sqlstate(error).as_deref() == Some(SQLSTATE_EXCLUSION_VIOLATION)
}

pub fn is_check_violation(error: &sqlx::Error) -> bool {
    sqlstate(error).as_deref() == Some(SQLSTATE_CHECK_VIOLATION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_have_no_sqlstate() {
        let err = sqlx::Error::RowNotFound;
        assert!(sqlstate(&err).is_none());
        assert!(!is_transient(&err));
        assert!(!is_exclusion_violation(&err));
        assert!(!is_check_violation(&err));
    }

    #[test]
    fn test_pool_timeout_is_not_transient() {
        assert!(!is_transient(&sqlx::Error::PoolTimedOut));
    }

    #[tokio::test]
    async fn test_create_pool_rejects_empty_url() {
        let config = DatabaseConfig {
            url: String::new(),
            max_connections: 1,
            min_connections: 0,
            connect_timeout_secs: 1,
            idle_timeout_secs: 1,
        };
        assert!(matches!(create_pool(&config).await, Err(DbError::Config(_))));
    }
}
