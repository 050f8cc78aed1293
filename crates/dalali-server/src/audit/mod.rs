//! Audit logging
//!
//! Commands (POST, PUT, PATCH, DELETE) that succeed are recorded in the
//! `audit_log` table by [`AuditLayer`]. Queries are not audited.
//!
//! ```no_run
//! use axum::Router;
//! use dalali_server::{audit::AuditLayer, auth::JwtKeys, config::Config};
//! use sqlx::PgPool;
//!
//! # fn example(pool: PgPool) {
//! let jwt = JwtKeys::new(&Config::default().auth);
//! let app: Router = Router::new().layer(AuditLayer::new(pool, jwt));
//! # }
//! ```

mod middleware;
mod models;
mod queries;

pub use middleware::AuditLayer;
pub use models::{
    redact_secrets, AuditAction, AuditEntry, AuditQuery, CreateAuditEntry, ResourceType,
    DEFAULT_AUDIT_QUERY_LIMIT, MAX_AUDIT_QUERY_LIMIT,
};
pub use queries::{create_audit_entry, get_audit_trail, query_audit_logs};
