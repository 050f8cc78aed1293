//! Property listings and their images
//!
//! Image writes and availability checks go through [`crate::guard`].

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::properties_routes;
