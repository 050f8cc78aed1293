//! Availability guard
//!
//! The rules that keep bookings and listings consistent under concurrent
//! requests:
//!
//! - active (pending or confirmed) bookings of one property never overlap,
//!   with both ends of a booking inclusive;
//! - booking status only moves along the confirm / reject / cancel /
//!   complete edges, and only for the party entitled to each;
//! - a property has at most one primary image.
//!
//! Every write here runs in a single transaction holding the property or
//! booking row lock. Serialization failures and deadlocks are retried once
//! and then reported as [`ErrorKind::Conflict`].

mod availability;
mod booking;
mod error;
mod images;
mod range;
mod retry;
mod status;
mod window;

pub use availability::{check_availability, AvailabilityReport, BookedSpan};
pub use booking::{create_booking, quote, transition_booking, NewBooking};
pub use error::{ErrorKind, GuardError};
pub use images::{add_image, remove_image, set_primary_image, NewImage};
pub use range::DateRange;
pub use status::BookingAction;
pub use window::{next_available_window, LOOKAHEAD_DAYS};
