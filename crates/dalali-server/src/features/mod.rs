//! Feature modules implementing the Dalali API
//!
//! Each feature is a vertical slice with its own commands, queries and
//! routes.
//!
//! # Features
//!
//! - **auth**: Registration, login and token refresh
//! - **users**: Profiles and the admin user directory
//! - **properties**: Listings, images and availability checks
//! - **bookings**: Date-range bookings and their status changes
//! - **transactions**: Property purchases
//! - **subscriptions**: Seller plans
//! - **messages**: Direct messages between users
//! - **reports**: Listing reports and moderation
//! - **audit_log**: Admin access to the audit trail
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations (create, update, delete)
//! - `queries/` - Read operations (get, list)
//! - `routes.rs` - HTTP route definitions
//!
//! Commands and queries implement the mediator pattern using the `mediator` crate.
//! Bookings and image changes delegate to [`crate::guard`].

pub mod audit_log;
pub mod auth;
pub mod bookings;
pub mod messages;
pub mod properties;
pub mod reports;
pub mod shared;
pub mod subscriptions;
pub mod transactions;
pub mod users;

use axum::{extract::FromRef, Router};
use sqlx::PgPool;

use crate::auth::JwtKeys;

/// Shared state for all feature routes
///
/// Handlers extract the part they need: `State<PgPool>` for the database,
/// `State<JwtKeys>` for token issuance. The auth extractors read the keys too.
#[derive(Clone, FromRef)]
pub struct FeatureState {
    /// PostgreSQL connection pool for database operations
    pub db: PgPool,
    /// Token signing keys
    pub jwt: JwtKeys,
}

/// Creates the API router with every feature mounted under its own prefix:
/// `/auth`, `/users`, `/properties`, `/bookings`, `/transactions`,
/// `/subscriptions`, `/messages`, `/reports` and `/audit`.
pub fn router(state: FeatureState) -> Router<()> {
    Router::new()
        .nest("/auth", auth::auth_routes())
        .nest("/users", users::users_routes())
        .nest("/properties", properties::properties_routes())
        .nest("/bookings", bookings::bookings_routes())
        .nest("/transactions", transactions::transactions_routes())
        .nest("/subscriptions", subscriptions::subscriptions_routes())
        .nest("/messages", messages::messages_routes())
        .nest("/reports", reports::reports_routes())
        .nest("/audit", audit_log::audit_routes())
        .with_state(state)
}
