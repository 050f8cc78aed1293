pub mod get;
pub mod list;

pub use get::{GetTransactionError, GetTransactionQuery};
pub use list::ListTransactionsQuery;
