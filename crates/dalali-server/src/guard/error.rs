use chrono::NaiveDate;
use thiserror::Error;

use crate::models::BookingStatus;

/// Coarse classification used by the HTTP layer and by callers that only
/// care about which family of failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Permission,
    Internal,
}

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("end date {end} must be after start date {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Permission(String),

    #[error("cannot {action} a booking that is {from}")]
    InvalidTransition {
        from: BookingStatus,
        action: &'static str,
    },

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl GuardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GuardError::InvalidRange { .. } | GuardError::Validation(_) => ErrorKind::Validation,
            GuardError::Conflict(_) | GuardError::InvalidTransition { .. } => ErrorKind::Conflict,
            GuardError::NotFound(_) => ErrorKind::NotFound,
            GuardError::Permission(_) => ErrorKind::Permission,
            GuardError::Database(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn property_not_found(id: uuid::Uuid) -> Self {
        GuardError::NotFound(format!("Property '{}' not found", id))
    }
}

impl From<sqlx::Error> for GuardError {
    fn from(err: sqlx::Error) -> Self {
        if crate::db::is_exclusion_violation(&err) {
            return GuardError::Conflict(
                "The requested dates overlap an existing booking".to_string(),
            );
        }
        if crate::db::is_check_violation(&err) {
            return GuardError::Validation("The booking violates a table constraint".to_string());
        }
        GuardError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let start = NaiveDate::from_ymd_opt(2025, 9, 2).unwrap();
        let range = GuardError::InvalidRange { start, end: start };
        assert_eq!(range.kind(), ErrorKind::Validation);
        assert!(range.to_string().contains("must be after"));

        let transition = GuardError::InvalidTransition {
            from: BookingStatus::Completed,
            action: "cancel",
        };
        assert_eq!(transition.kind(), ErrorKind::Conflict);
        assert_eq!(transition.to_string(), "cannot cancel a booking that is completed");

        assert_eq!(GuardError::Database(sqlx::Error::RowNotFound).kind(), ErrorKind::Internal);
    }
}
