//! Dalali Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging setup, and error handling for the Dalali workspace.
//!
//! # Overview
//!
//! - **Error Handling**: [`DalaliError`] and the [`Result`] alias
//! - **Logging**: `tracing` subscriber configuration used by every binary
//! - **Types**: money rounding and formatting
//!
//! # Example
//!
//! ```no_run
//! use dalali_common::logging::{init_logging, LogConfig};
//! use dalali_common::types::format_price;
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&LogConfig::from_env()?)?;
//!     tracing::info!(price = %format_price(&"1234.5".parse()?), "ready");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{DalaliError, Result};
