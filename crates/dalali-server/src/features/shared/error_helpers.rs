//! Database error handling utilities
//!
//! ```rust,ignore
//! sqlx::query(...)
//!     .execute(&pool)
//!     .await
//!     .map_err(|e| map_unique_violation(e, RegisterError::Duplicate(name), RegisterError::Database))?;
//! ```

use sqlx::Error as SqlxError;

/// Check if the error is a unique constraint violation
pub fn is_unique_violation(error: &SqlxError) -> bool {
    if let SqlxError::Database(db_err) = error {
        return db_err.is_unique_violation();
    }
    false
}

/// Check if the error is a foreign key violation
pub fn is_foreign_key_violation(error: &SqlxError) -> bool {
    if let SqlxError::Database(db_err) = error {
        return db_err.is_foreign_key_violation();
    }
    false
}

/// Name of the constraint a database error was raised by, if any.
pub fn violated_constraint(error: &SqlxError) -> Option<&str> {
    match error {
        SqlxError::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}

/// Returns `unique_error` on a unique violation, otherwise wraps the error.
pub fn map_unique_violation<E, F>(error: SqlxError, unique_error: E, default_wrapper: F) -> E
where
    F: FnOnce(SqlxError) -> E,
{
    if is_unique_violation(&error) {
        unique_error
    } else {
        default_wrapper(error)
    }
}

/// Returns `fk_error` on a foreign key violation, otherwise wraps the error.
pub fn map_foreign_key_violation<E, F>(error: SqlxError, fk_error: E, default_wrapper: F) -> E
where
    F: FnOnce(SqlxError) -> E,
{
    if is_foreign_key_violation(&error) {
        fk_error
    } else {
        default_wrapper(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Duplicate,
        Missing,
        Database(String),
    }

    #[test]
    fn test_non_database_errors_pass_through() {
        let mapped = map_unique_violation(SqlxError::RowNotFound, TestError::Duplicate, |e| {
            TestError::Database(e.to_string())
        });
        assert!(matches!(mapped, TestError::Database(_)));

        let mapped = map_foreign_key_violation(SqlxError::PoolTimedOut, TestError::Missing, |e| {
            TestError::Database(e.to_string())
        });
        assert!(matches!(mapped, TestError::Database(_)));
        assert!(violated_constraint(&SqlxError::RowNotFound).is_none());
    }
}
