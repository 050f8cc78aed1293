//! User profiles

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::users_routes;
