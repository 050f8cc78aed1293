//! Shared validation utilities
//!
//! Field checks used by the command `validate()` methods. Each returns a
//! [`ValidationError`] naming the offending field.

use bigdecimal::{BigDecimal, Signed, Zero};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

pub const USERNAME_MAX_LENGTH: usize = 150;

pub const EMAIL_MAX_LENGTH: usize = 254;

pub const PASSWORD_MIN_LENGTH: usize = 8;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("username pattern"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s-]{10,20}$").expect("phone pattern"));

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required and cannot be empty")]
    Required { field: &'static str },

    #[error("{field} must be at most {max_length} characters")]
    TooLong {
        field: &'static str,
        max_length: usize,
    },

    #[error("Username may only contain letters, digits and @/./+/-/_")]
    InvalidUsername,

    #[error("Enter a valid email address")]
    InvalidEmail,

    #[error("Phone number must be 10-20 digits, spaces or dashes, optionally starting with +")]
    InvalidPhone,

    #[error("Password must be at least {min_length} characters")]
    PasswordTooShort { min_length: usize },

    #[error("Password cannot be entirely numeric")]
    PasswordNumeric,

    #[error("{field} must be greater than zero")]
    NotPositive { field: &'static str },

    #[error("{field} cannot be negative")]
    Negative { field: &'static str },

    #[error("{0}")]
    Invalid(String),
}

/// Non-blank text of at most `max_length` characters.
pub fn validate_text(value: &str, field: &'static str, max_length: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    validate_max_length(value, field, max_length)
}

pub fn validate_max_length(
    value: &str,
    field: &'static str,
    max_length: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() > max_length {
        return Err(ValidationError::TooLong { field, max_length });
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    validate_text(username, "username", USERNAME_MAX_LENGTH)?;
    if !USERNAME_RE.is_match(username) {
        return Err(ValidationError::InvalidUsername);
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    validate_text(email, "email", EMAIL_MAX_LENGTH)?;
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if !PHONE_RE.is_match(phone) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min_length: PASSWORD_MIN_LENGTH,
        });
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PasswordNumeric);
    }
    Ok(())
}

pub fn validate_positive(amount: &BigDecimal, field: &'static str) -> Result<(), ValidationError> {
    if !amount.is_positive() {
        return Err(ValidationError::NotPositive { field });
    }
    Ok(())
}

pub fn validate_non_negative(amount: &BigDecimal, field: &'static str) -> Result<(), ValidationError> {
    if amount.is_negative() && !amount.is_zero() {
        return Err(ValidationError::Negative { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_validate_text() {
        assert!(validate_text("Nyali villa", "title", 200).is_ok());
        assert_eq!(
            validate_text("   ", "title", 200),
            Err(ValidationError::Required { field: "title" })
        );
        assert!(matches!(
            validate_text(&"a".repeat(201), "title", 200),
            Err(ValidationError::TooLong { max_length: 200, .. })
        ));
    }

    #[test]
    fn test_usernames() {
        for ok in ["amina", "john.doe", "user+tag@site", "a_b-c", "Zawadi99"] {
            assert!(validate_username(ok).is_ok(), "{ok} should be valid");
        }
        for bad in ["", "has space", "semi;colon", "slash/"] {
            assert!(validate_username(bad).is_err(), "{bad} should be invalid");
        }
        assert!(validate_username(&"u".repeat(151)).is_err());
    }

    #[test]
    fn test_emails() {
        assert!(validate_email("amina@example.co.ke").is_ok());
        assert_eq!(validate_email("amina.example.com"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("a@b"), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn test_phones() {
        assert!(validate_phone("+254 712 345 678").is_ok());
        assert!(validate_phone("0712-345-678").is_ok());
        assert_eq!(validate_phone("12345"), Err(ValidationError::InvalidPhone));
        assert_eq!(validate_phone("phone-number"), Err(ValidationError::InvalidPhone));
    }

    #[test]
    fn test_passwords() {
        assert!(validate_password("s3cure-pass").is_ok());
        assert!(matches!(
            validate_password("short"),
            Err(ValidationError::PasswordTooShort { .. })
        ));
        assert_eq!(validate_password("1234567890"), Err(ValidationError::PasswordNumeric));
    }

    #[test]
    fn test_amounts() {
        let zero = BigDecimal::from(0);
        let price = BigDecimal::from_str("1500.00").unwrap();
        let negative = BigDecimal::from_str("-1").unwrap();

        assert!(validate_positive(&price, "price").is_ok());
        assert_eq!(validate_positive(&zero, "price"), Err(ValidationError::NotPositive { field: "price" }));
        assert!(validate_non_negative(&zero, "area").is_ok());
        assert_eq!(validate_non_negative(&negative, "area"), Err(ValidationError::Negative { field: "area" }));
    }
}
