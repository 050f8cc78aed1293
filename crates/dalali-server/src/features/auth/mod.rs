//! Registration and token issuance

pub mod commands;
pub mod routes;

pub use routes::auth_routes;
