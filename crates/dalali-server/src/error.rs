//! Server-specific error types
//!
//! HTTP-facing failures live in [`crate::api::response::AppError`]; this type
//! covers infrastructure work that happens outside a request handler, such as
//! writing audit rows from a background task.

use thiserror::Error;

/// Result type alias for server operations
pub type ServerResult<T> = std::result::Result<T, ServerError>;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<crate::db::DbError> for ServerError {
    fn from(err: crate::db::DbError) -> Self {
        match err {
            crate::db::DbError::Sqlx(e) => ServerError::Database(e),
            crate::db::DbError::Config(msg) => ServerError::Config(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbError;

    #[test]
    fn test_db_errors_convert() {
        let err: ServerError = DbError::Config("DATABASE_URL is empty".to_string()).into();
        assert!(matches!(err, ServerError::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: DATABASE_URL is empty");

        let err: ServerError = DbError::Sqlx(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, ServerError::Database(_)));
    }
}
