pub mod get;
pub mod list;

pub use get::{GetMessageError, GetMessageQuery};
pub use list::{ListMessagesQuery, UnreadCount, UnreadCountQuery};
