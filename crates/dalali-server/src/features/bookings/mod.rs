//! Bookings
//!
//! Creation and status changes are delegated to [`crate::guard`].

pub mod commands;
pub mod queries;
pub mod routes;

pub use routes::bookings_routes;
