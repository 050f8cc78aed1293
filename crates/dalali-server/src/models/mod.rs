//! Database models
//!
//! Row types shared by the guard and the feature slices. Each table has a
//! `*_COLUMNS` constant listing the columns its `FromRow` type expects, so
//! hand-written queries select exactly what the struct decodes.

pub mod booking;
pub mod image;
pub mod message;
pub mod property;
pub mod report;
pub mod subscription;
pub mod transaction;
pub mod user;

pub use booking::{Booking, BookingStatus, BOOKING_COLUMNS};
pub use image::{PropertyImage, IMAGE_COLUMNS};
pub use message::{Message, MESSAGE_COLUMNS};
pub use property::{Property, PropertyStatus, PropertyType, PROPERTY_COLUMNS};
pub use report::{Report, ReportStatus, REPORT_COLUMNS};
pub use subscription::{Subscription, SUBSCRIPTION_COLUMNS};
pub use transaction::{Transaction, TransactionStatus, TRANSACTION_COLUMNS};
pub use user::{User, UserProfile, USER_COLUMNS};
