//! Error types
//!
//! Re-exports labsmith-error for the library's modules.

pub use labsmith_error::{Error, ErrorKind, Result};
