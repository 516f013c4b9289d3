//! Error kinds for labsmith operations

use std::fmt;

/// The kind of error that occurred.
///
/// Callers match on `ErrorKind` to decide how to report a failure; the
/// pipeline itself treats every kind as fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // Configuration errors
    // =========================================================================
    /// Invalid or missing configuration (e.g. no API key)
    ConfigInvalid,

    // =========================================================================
    // Transport errors
    // =========================================================================
    /// The request could not be sent or the connection failed
    NetworkFailed,

    /// The API answered with a non-success status
    ApiFailed,

    /// The response body was not the expected chat-completion envelope
    ResponseMalformed,

    // =========================================================================
    // Input / output errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,

    /// A document could not be converted to plain text
    ExtractionFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ConfigInvalid => "ConfigInvalid",

            ErrorKind::NetworkFailed => "NetworkFailed",
            ErrorKind::ApiFailed => "ApiFailed",
            ErrorKind::ResponseMalformed => "ResponseMalformed",

            ErrorKind::FileNotFound => "FileNotFound",
            ErrorKind::PermissionDenied => "PermissionDenied",
            ErrorKind::IoFailed => "IoFailed",
            ErrorKind::ExtractionFailed => "ExtractionFailed",
        }
    }

    /// Whether this kind describes a failed HTTP exchange with the model API
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ErrorKind::NetworkFailed | ErrorKind::ApiFailed | ErrorKind::ResponseMalformed
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
