pub mod get;
pub mod list;

pub use get::{GetBookingError, GetBookingQuery};
pub use list::{BookingScope, ListBookingsError, ListBookingsQuery};
