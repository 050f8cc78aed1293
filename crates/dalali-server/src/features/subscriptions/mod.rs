//! Seller subscription plans

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::subscriptions_routes;
