pub mod delete;
pub mod mark_read;
pub mod send;

pub use delete::{DeleteMessageCommand, DeleteMessageError, DeleteMessageResponse};
pub use mark_read::{MarkReadCommand, MarkReadError};
pub use send::{SendMessageCommand, SendMessageError, SendMessageRequest};
