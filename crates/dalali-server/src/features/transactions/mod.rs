//! Property purchases

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::transactions_routes;
