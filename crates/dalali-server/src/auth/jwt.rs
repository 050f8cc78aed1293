//! HS256 access and refresh tokens

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{Actor, Role};
use crate::config::AuthConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    pub username: String,
    pub role: Role,
    pub token_type: TokenType,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn actor(&self) -> Actor {
        Actor::new(self.sub, self.role)
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid or expired token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),

    #[error("Expected a {expected:?} token")]
    WrongType { expected: TokenType },
}

/// Access and refresh token issued together at login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
    pub token_type: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
}

/// Signing and verification keys derived from one shared secret
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtKeys {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_ttl: Duration::minutes(config.access_ttl_minutes),
            refresh_ttl: Duration::days(config.refresh_ttl_days),
        }
    }

    pub fn issue(
        &self,
        user_id: Uuid,
        username: &str,
        role: Role,
        token_type: TokenType,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };
        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            role,
            token_type,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    pub fn issue_pair(&self, user_id: Uuid, username: &str, role: Role) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access: self.issue(user_id, username, role, TokenType::Access)?,
            refresh: self.issue(user_id, username, role, TokenType::Refresh)?,
            token_type: "Bearer".to_string(),
            expires_in: self.access_ttl_secs(),
        })
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    /// Decode `token`, checking signature, expiry and that it is of `expected` type.
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let claims = decode::<Claims>(token, &self.decoding, &validation)?.claims;
        if claims.token_type != expected {
            return Err(TokenError::WrongType { expected });
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> JwtKeys {
        JwtKeys::new(&crate::config::Config::default().auth)
    }

    #[test]
    fn test_issue_and_verify_access_token() {
        let keys = keys();
        let user_id = Uuid::new_v4();
        let token = keys.issue(user_id, "amina", Role::Seller, TokenType::Access).unwrap();

        let claims = keys.verify(&token, TokenType::Access).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "amina");
        assert_eq!(claims.actor(), Actor::new(user_id, Role::Seller));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let keys = keys();
        let pair = keys.issue_pair(Uuid::new_v4(), "baraka", Role::Customer).unwrap();
        assert!(matches!(
            keys.verify(&pair.refresh, TokenType::Access),
            Err(TokenError::WrongType { expected: TokenType::Access })
        ));
        assert!(keys.verify(&pair.refresh, TokenType::Refresh).is_ok());
        assert_eq!(pair.expires_in, 60 * 60);
    }

    #[test]
    fn test_rejects_token_signed_with_other_secret() {
        let mut other = crate::config::Config::default().auth;
        other.jwt_secret = "another-secret-that-is-long-enough-to-use".to_string();
        let token = JwtKeys::new(&other)
            .issue(Uuid::new_v4(), "x", Role::Admin, TokenType::Access)
            .unwrap();
        assert!(matches!(keys().verify(&token, TokenType::Access), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(keys().verify("not.a.token", TokenType::Access).is_err());
    }

    #[test]
    fn test_debug_hides_keys() {
        let rendered = format!("{:?}", keys());
        assert!(rendered.starts_with("JwtKeys"));
        assert!(!rendered.contains(crate::config::DEFAULT_JWT_SECRET));
    }
}
