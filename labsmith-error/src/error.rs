//! The main Error type for labsmith

use crate::ErrorKind;
use std::fmt;

/// The unified error type for all labsmith operations.
///
/// - `kind`: what type of error occurred
/// - `message`: human-readable description
/// - `operation`: what operation raised the error
/// - `context`: key-value pairs for debugging
/// - `source`: the underlying error (if any)
///
/// # Example
///
/// ```rust
/// use labsmith_error::{Error, ErrorKind};
///
/// let err = Error::new(ErrorKind::ApiFailed, "server returned 429")
///     .with_operation("client::complete")
///     .with_context("model", "deepseek-coder")
///     .with_context("status", "429");
///
/// assert_eq!(err.kind(), ErrorKind::ApiFailed);
/// assert!(err.kind().is_transport());
/// ```
pub struct Error {
    kind: ErrorKind,
    message: String,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the operation that caused this error
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Get the context key-value pairs
    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// Look up a context value by key (first match)
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get the source error (if any)
    pub fn source_ref(&self) -> Option<&anyhow::Error> {
        self.source.as_ref()
    }

    // =========================================================================
    // Builders (chainable)
    // =========================================================================

    /// Set the operation that caused this error.
    ///
    /// If an operation was already set, the previous one is moved to context
    /// as "called" to preserve the call chain.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if !self.operation.is_empty() {
            self.context.push(("called", self.operation.to_string()));
        }
        self.operation = operation;
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Set the source error.
    ///
    /// # Panics (debug only)
    /// Panics in debug mode if source was already set.
    pub fn set_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(source.into());
        self
    }
}

// =============================================================================
// Display - compact, single-line format for logs and stderr
// =============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.operation.is_empty() {
            write!(f, " at {}", self.operation)?;
        }

        if !self.context.is_empty() {
            write!(f, ", context {{ ")?;
            for (i, (key, value)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", key, value)?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        Ok(())
    }
}

// =============================================================================
// Debug - verbose, multi-line format for the log file
// =============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.operation.is_empty() {
            write!(f, " at {}", self.operation)?;
        }
        writeln!(f)?;

        if !self.message.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Message: {}", self.message)?;
        }

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "    Source: {:?}", source)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IoFailed,
        };
        Error::new(kind, err.to_string())
            .with_operation("io")
            .set_source(err)
    }
}

// =============================================================================
// Convenience constructors
// =============================================================================

impl Error {
    /// Create a ConfigInvalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a NetworkFailed error
    pub fn network_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkFailed, message)
    }

    /// Create an ApiFailed error carrying the HTTP status
    pub fn api_failed(status: u16, body: impl Into<String>) -> Self {
        Self::new(ErrorKind::ApiFailed, format!("API returned status {}", status))
            .with_context("status", status.to_string())
            .with_context("body", body)
    }

    /// Create a ResponseMalformed error
    pub fn response_malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ResponseMalformed, message)
    }

    /// Create an ExtractionFailed error for the given document
    pub fn extraction_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExtractionFailed, reason).with_context("path", path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::new(ErrorKind::ConfigInvalid, "API key missing");
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(err.message(), "API key missing");
        assert!(err.context().is_empty());
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::new(ErrorKind::ApiFailed, "bad gateway")
            .with_operation("client::complete")
            .with_context("model", "deepseek-coder")
            .with_context("status", "502");

        assert_eq!(err.operation(), "client::complete");
        assert_eq!(err.context().len(), 2);
        assert_eq!(err.context_value("status"), Some("502"));
        assert_eq!(err.context_value("missing"), None);
    }

    #[test]
    fn test_operation_chaining() {
        let err = Error::new(ErrorKind::IoFailed, "write failed")
            .with_operation("artifacts::save")
            .with_operation("pipeline::run");

        assert_eq!(err.operation(), "pipeline::run");
        assert_eq!(err.context().len(), 1);
        assert_eq!(err.context()[0], ("called", "artifacts::save".to_string()));
    }

    #[test]
    fn test_display() {
        let err = Error::api_failed(503, "overloaded").with_operation("client::complete");

        let display = format!("{}", err);
        assert!(display.starts_with("ApiFailed at client::complete"));
        assert!(display.contains("status: 503"));
        assert!(display.contains("body: overloaded"));
        assert!(display.ends_with("=> API returned status 503"));
    }

    #[test]
    fn test_display_without_operation() {
        let err = Error::config_invalid("no key");
        assert_eq!(err.to_string(), "ConfigInvalid => no key");
    }

    #[test]
    fn test_io_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io_err.into();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
        assert_eq!(err.operation(), "io");
        assert!(err.source_ref().is_some());

        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: Error = io_err.into();
        assert_eq!(err.kind(), ErrorKind::IoFailed);
    }

    #[test]
    fn test_debug_includes_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = Error::new(ErrorKind::PermissionDenied, "cannot write solution")
            .set_source(io_err);

        let debug = format!("{:?}", err);
        assert!(debug.contains("Message: cannot write solution"));
        assert!(debug.contains("Source:"));
    }
}
