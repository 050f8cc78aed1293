pub mod create;
pub mod resolve;

pub use create::{CreateReportCommand, CreateReportError, CreateReportRequest};
pub use resolve::{ResolveReportCommand, ResolveReportError, ResolveReportRequest};
