//! Monitor registry error types.
//!
//! Directory failures are passed through to the caller untouched; the
//! registry only adds errors for the legacy host lookup path.

use common::error::BoxedCause;
use thiserror::Error;

/// Failure reported by a [`MonitorDirectory`](crate::MonitorDirectory).
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// A lock guarding the directory was poisoned by a panicking writer.
    #[error("Directory lock poisoned")]
    Poisoned,

    /// The monitor factory refused to create a monitor.
    #[error("Failed to create monitor {identifier}")]
    Create {
        identifier: String,
        #[source]
        source: BoxedCause,
    },

    /// The backing store cannot serve lookups.
    #[error("Directory unavailable: {0}")]
    Unavailable(String),
}

/// Monitor registry error type.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Error returned by the directory collaborator.
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// Host lookup URI could not be parsed.
    #[error("Invalid URI '{uri}': {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: http::uri::InvalidUri,
    },

    /// Host lookup URI has no host component.
    #[error("URI has no host: {0}")]
    MissingHost(String),

    /// Host lookup URI has no scheme.
    #[error("URI has no scheme: {0}")]
    MissingScheme(String),
}

/// Result type alias using `RegistryError`
pub type Result<T> = std::result::Result<T, RegistryError>;
