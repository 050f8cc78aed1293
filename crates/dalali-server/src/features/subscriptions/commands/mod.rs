pub mod create;
pub mod delete;
pub mod update;

pub use create::{CreateSubscriptionCommand, CreateSubscriptionError, CreateSubscriptionRequest};
pub use delete::{DeleteSubscriptionCommand, DeleteSubscriptionError, DeleteSubscriptionResponse};
pub use update::{UpdateSubscriptionCommand, UpdateSubscriptionError, UpdateSubscriptionRequest};
