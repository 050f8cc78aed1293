//! Authentication and authorization
//!
//! Tokens are HS256 JWTs carrying the user's id, username and role. Handlers
//! take an [`AuthUser`] to require a caller and check ownership through
//! [`Actor`].

mod actor;
pub mod extractor;
pub mod jwt;
pub mod password;

pub use actor::{Actor, Owned, Role};
pub use extractor::{bearer_token, AuthUser, MaybeAuthUser};
pub use jwt::{Claims, JwtKeys, TokenError, TokenPair, TokenType};
pub use password::{hash_password, verify_password, PasswordError};
