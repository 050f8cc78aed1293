//! Error types shared across Dalali crates

use thiserror::Error;

/// Result type alias for Dalali operations
pub type Result<T> = std::result::Result<T, DalaliError>;

/// Main error type for the shared library
#[derive(Error, Debug)]
pub enum DalaliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown role '{0}', expected one of: customer, seller, admin")]
    InvalidRole(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_role_message_lists_choices() {
        let err = DalaliError::InvalidRole("owner".to_string());
        let message = err.to_string();
        assert!(message.contains("owner"));
        assert!(message.contains("customer, seller, admin"));
    }

    #[test]
    fn test_serialization_error_converts() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: DalaliError = parse_err.into();
        assert!(matches!(err, DalaliError::Serialization(_)));
    }
}
