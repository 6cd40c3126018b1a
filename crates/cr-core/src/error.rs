//! Unified error type for clipresolve.
//!
//! All crates funnel their failures into [`Error`], which carries enough context
//! for API handlers to derive an HTTP status code via [`Error::http_status`].

use std::path::PathBuf;

/// Unified error type covering all failure modes in clipresolve.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller did not present the shared secret.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The extractor reported the resource as unreachable, blocked or missing.
    #[error("Access denied or not found: {0}")]
    AccessDenied(String),

    /// Any other extraction failure (timeout, malformed output, bad URL).
    #[error("Extraction failed: {0}")]
    Extraction(String),

    /// A cookie jar could not be written.
    #[error("Failed to persist cookie jar {}: {source}", path.display())]
    CredentialPersist {
        /// Destination of the jar.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// An external tool returned an error.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::Forbidden(_) => 403,
            Error::Validation(_) => 400,
            Error::AccessDenied(_) => 404,
            Error::Extraction(_) => 502,
            Error::CredentialPersist { .. } => 500,
            Error::Io { .. } => 500,
            Error::Tool { .. } => 502,
            Error::Internal(_) => 500,
        }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::CredentialPersist`].
    pub fn credential_persist(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::CredentialPersist {
            path: path.into(),
            source,
        }
    }

    /// Whether this error belongs to the extraction path, i.e. it is reported
    /// to API callers as a failure-shaped response rather than an HTTP error.
    pub fn is_extraction_failure(&self) -> bool {
        matches!(
            self,
            Error::AccessDenied(_) | Error::Extraction(_) | Error::Tool { .. } | Error::Io { .. }
        )
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
