//! Dalali Server Library
//!
//! HTTP backend for a property marketplace: listings, date-range bookings,
//! purchases, seller subscriptions, messages and reports.
//!
//! # Architecture
//!
//! The server follows a **CQRS (Command Query Responsibility Segregation)** layout:
//!
//! - **Commands** (POST, PUT, PATCH, DELETE) change state and are recorded in
//!   the `audit_log` table by [`audit::AuditLayer`].
//! - **Queries** (GET) only read and are not audited.
//!
//! Each feature under [`features`] is a vertical slice with its own commands,
//! queries and routes. The rules that must hold under concurrent writes
//! (non-overlapping bookings, the booking state machine, one primary image
//! per property) live in [`guard`].
//!
//! ## Framework Stack
//!
//! - **Axum**: HTTP routing and extractors
//! - **SQLx**: PostgreSQL access and migrations
//! - **Tower**: Middleware and service abstractions
//!
//! # Example
//!
//! ```no_run
//! use dalali_server::{api, auth::JwtKeys, config::Config, db};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&config.database).await?;
//!     let app = api::create_router(pool, JwtKeys::new(&config.auth), &config);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod audit;
pub mod auth;
pub mod config;
pub mod cqrs;
pub mod db;
pub mod error;
pub mod features;
pub mod guard;
pub mod middleware;
pub mod models;

// Re-export commonly used types
pub use api::response::AppError;
pub use error::{ServerError, ServerResult};
