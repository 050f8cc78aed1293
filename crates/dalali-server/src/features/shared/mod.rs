//! Shared utilities and types for feature modules
//!
//! - **pagination**: Common pagination types and helpers
//! - **validation**: Field validation used by command `validate()` methods
//! - **error_helpers**: Database constraint error mapping
//! - **search**: ILIKE pattern escaping

pub mod error_helpers;
pub mod pagination;
pub mod search;
pub mod validation;

pub use pagination::{Paginated, PaginationMetadata, PaginationParams};
pub use search::contains_pattern;
pub use validation::ValidationError;
