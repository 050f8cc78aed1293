pub mod create;
pub mod update;

pub use create::{CreateTransactionCommand, CreateTransactionError, CreateTransactionRequest};
pub use update::{UpdateTransactionCommand, UpdateTransactionError, UpdateTransactionRequest};
