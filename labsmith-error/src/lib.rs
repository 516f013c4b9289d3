//! # labsmith-error
//!
//! Unified error handling for labsmith.
//!
//! ## Design
//!
//! - **ErrorKind**: what went wrong (e.g. ConfigInvalid, ApiFailed)
//! - **Operation**: where it went wrong, with the call chain kept in context
//! - **Context**: key-value pairs that help locate the cause
//! - **Source**: the wrapped underlying error, never leaked as a raw type
//!
//! ## Usage
//!
//! ```rust
//! use labsmith_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::ApiFailed, "server returned 503")
//!         .with_operation("client::complete")
//!         .with_context("status", "503"))
//! }
//! ```
//!
//! ## Principles
//!
//! - All fallible functions return `Result<T, labsmith_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - An error is handled once; callers only append context

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

/// Result type alias using the labsmith Error
pub type Result<T> = std::result::Result<T, Error>;
