//! Listing reports and their moderation

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::reports_routes;
