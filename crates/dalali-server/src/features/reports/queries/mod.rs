pub mod get;
pub mod list;

pub use get::{GetReportError, GetReportQuery};
pub use list::ListReportsQuery;
