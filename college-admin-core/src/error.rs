/// Structured error types for college-admin-core.
///
/// Every controller flow catches these at its own boundary and turns them
/// into a user-facing notice. The binary crates wrap them in `anyhow`.
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::form::ValidationError;

/// Main error type for admin client operations
#[derive(Error, Debug)]
pub enum AdminError {
    /// No response from the remote API (DNS, connect, TLS, reset)
    #[error("Network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    /// The API rejected the credential pair (401)
    #[error("Authentication failed. Please check your credentials.")]
    Unauthorized,

    /// Any other non-2xx response
    #[error("API Error: {status} {text}")]
    Http { status: u16, text: String },

    /// Response body had an unexpected content type or could not be decoded
    #[error("Unexpected response payload: {reason}")]
    Payload { reason: String },

    /// An authenticated flow was started without a session
    #[error("Not logged in")]
    NotAuthenticated,

    /// Form contents failed client-side checks
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Persisted session could not be read or written
    #[error("Session storage error at {path:?}: {reason}")]
    Storage { path: PathBuf, reason: String },

    /// Local I/O failed (export download)
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for college-admin-core operations
pub type Result<T> = std::result::Result<T, AdminError>;

impl AdminError {
    /// Create an HTTP failure from a status code and its reason text
    pub fn http(status: u16, text: impl Into<String>) -> Self {
        Self::Http {
            status,
            text: text.into(),
        }
    }

    /// Create a payload error
    pub fn payload(reason: impl Into<String>) -> Self {
        Self::Payload {
            reason: reason.into(),
        }
    }

    /// Create a storage error
    pub fn storage(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Storage {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// True when the failure means the stored credential pair is invalid
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}
