//! Direct messages between users

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::messages_routes;
