//! Read access to the audit trail (admins)

pub mod routes;

pub use routes::audit_routes;
