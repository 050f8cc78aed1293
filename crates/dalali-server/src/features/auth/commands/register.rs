//! Register command
//!
//! Creates a customer or seller account and signs the new user in.

use mediator::Request;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::auth::{hash_password, JwtKeys, PasswordError, Role, TokenError, TokenPair};
use crate::features::shared::error_helpers::{is_unique_violation, violated_constraint};
use crate::features::shared::validation::{
    validate_email, validate_password, validate_phone, validate_username, ValidationError,
};
use crate::models::{User, UserProfile, USER_COLUMNS};

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

fn default_role() -> String {
    Role::Customer.as_str().to_string()
}

#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub request: RegisterRequest,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub user: UserProfile,
    pub tokens: TokenPair,
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("A user with that {0} already exists")]
    Duplicate(&'static str),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Request<Result<RegisterResponse, RegisterError>> for RegisterCommand {}

impl crate::cqrs::middleware::Command for RegisterCommand {}

impl RegisterRequest {
    /// Self-registration may only create customers and sellers.
    fn role(&self) -> Result<Role, ValidationError> {
        match self.role.parse::<Role>() {
            Ok(role @ (Role::Customer | Role::Seller)) => Ok(role),
            _ => Err(ValidationError::Invalid(format!(
                "Role must be customer or seller, got '{}'",
                self.role
            ))),
        }
    }

    #[tracing::instrument(skip(self), fields(username = %self.username))]
    pub fn validate(&self) -> Result<Role, ValidationError> {
        validate_username(&self.username)?;
        validate_email(&self.email)?;
        if self.password != self.confirm_password {
            return Err(ValidationError::Invalid("Passwords do not match".to_string()));
        }
        validate_password(&self.password)?;
        if let Some(phone) = self.phone_number.as_deref() {
            validate_phone(phone)?;
        }
        self.role()
    }
}

/// Maps a unique violation to the field it concerns.
fn duplicate_field(err: &sqlx::Error) -> &'static str {
    match violated_constraint(err) {
        Some(name) if name.contains("email") => "email",
        Some(name) if name.contains("phone") => "phone number",
        _ => "username",
    }
}

#[tracing::instrument(skip(pool, keys, command), fields(username = %command.request.username))]
pub async fn handle(
    pool: PgPool,
    keys: JwtKeys,
    command: RegisterCommand,
) -> Result<RegisterResponse, RegisterError> {
    let request = command.request;
    let role = request.validate()?;
    let password_hash = hash_password(&request.password).await?;
    let phone_number = request
        .phone_number
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty());

    let sql = format!(
        "INSERT INTO users (username, email, phone_number, password_hash, role) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {}",
        USER_COLUMNS
    );
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(request.username.trim())
        .bind(request.email.trim())
        .bind(phone_number)
        .bind(&password_hash)
        .bind(role)
        .fetch_one(&pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                RegisterError::Duplicate(duplicate_field(&e))
            } else {
                RegisterError::Database(e)
            }
        })?;

    tracing::info!(user_id = %user.id, role = %user.role, "User registered");

    let tokens = keys.issue_pair(user.id, &user.username, user.role)?;
    Ok(RegisterResponse {
        user: user.into(),
        tokens,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterRequest {
        RegisterRequest {
            username: "amina.k".to_string(),
            email: "amina@example.com".to_string(),
            password: "nyumba2025".to_string(),
            confirm_password: "nyumba2025".to_string(),
            role: "seller".to_string(),
            phone_number: Some("+255 712-345-678".to_string()),
        }
    }

    #[test]
    fn test_valid_request() {
        assert_eq!(request().validate().unwrap(), Role::Seller);
    }

    #[test]
    fn test_buyer_is_a_customer() {
        let mut req = request();
        req.role = "buyer".to_string();
        assert_eq!(req.validate().unwrap(), Role::Customer);
    }

    #[test]
    fn test_cannot_self_register_as_admin() {
        let mut req = request();
        req.role = "admin".to_string();
        assert!(matches!(req.validate(), Err(ValidationError::Invalid(_))));
    }

    #[test]
    fn test_password_mismatch() {
        let mut req = request();
        req.confirm_password = "different99".to_string();
        assert_eq!(
            req.validate().unwrap_err().to_string(),
            "Passwords do not match"
        );
    }

    #[test]
    fn test_numeric_password_rejected() {
        let mut req = request();
        req.password = "12345678".to_string();
        req.confirm_password = "12345678".to_string();
        assert_eq!(req.validate(), Err(ValidationError::PasswordNumeric));
    }

    #[test]
    fn test_bad_phone_rejected() {
        let mut req = request();
        req.phone_number = Some("12ab".to_string());
        assert_eq!(req.validate(), Err(ValidationError::InvalidPhone));
    }
}
