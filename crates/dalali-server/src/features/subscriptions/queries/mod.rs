pub mod get;
pub mod list;

pub use get::{GetSubscriptionError, GetSubscriptionQuery};
pub use list::ListSubscriptionsQuery;
