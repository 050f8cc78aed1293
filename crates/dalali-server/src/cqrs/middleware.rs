//! Command / query markers
//!
//! Commands change state and are audited; queries only read. HTTP methods
//! map onto the same split.

use axum::http::Method;

/// A state-changing request.
pub trait Command {}

/// A read-only request.
pub trait Query {}

/// Whether requests with this method are commands.
pub fn is_command_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_methods() {
        assert!(is_command_method(&Method::POST));
        assert!(is_command_method(&Method::PATCH));
        assert!(is_command_method(&Method::DELETE));
        assert!(!is_command_method(&Method::GET));
        assert!(!is_command_method(&Method::HEAD));
        assert!(!is_command_method(&Method::OPTIONS));
    }
}
