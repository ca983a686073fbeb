//! Common error types for backend calls

use thiserror::Error;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors that can occur when calling a backend service.
///
/// Every variant names the originating backend and the resource path so
/// that diagnostics can point at the failing upstream without the caller
/// having to reconstruct the context.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The backend reports that the resource does not exist
    #[error("{backend}: no resource at {path}")]
    NotFound { backend: String, path: String },

    /// The backend could not be reached, timed out, or answered with a
    /// server-side error
    #[error("{backend}: unavailable ({path}): {detail}")]
    Unavailable {
        backend: String,
        path: String,
        detail: String,
    },

    /// The backend answered, but the body could not be decoded
    #[error("{backend}: malformed response from {path}: {detail}")]
    Malformed {
        backend: String,
        path: String,
        detail: String,
    },
}

impl BackendError {
    pub fn not_found(backend: impl Into<String>, path: impl Into<String>) -> Self {
        BackendError::NotFound {
            backend: backend.into(),
            path: path.into(),
        }
    }

    pub fn unavailable(
        backend: impl Into<String>,
        path: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        BackendError::Unavailable {
            backend: backend.into(),
            path: path.into(),
            detail: detail.into(),
        }
    }

    pub fn malformed(
        backend: impl Into<String>,
        path: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        BackendError::Malformed {
            backend: backend.into(),
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// Returns the HTTP status code this error maps to
    pub fn status_code(&self) -> u16 {
        match self {
            BackendError::NotFound { .. } => 404,
            BackendError::Unavailable { .. } => 503,
            BackendError::Malformed { .. } => 502,
        }
    }

    /// Name of the backend the error originated from
    pub fn backend(&self) -> &str {
        match self {
            BackendError::NotFound { backend, .. }
            | BackendError::Unavailable { backend, .. }
            | BackendError::Malformed { backend, .. } => backend,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound { .. })
    }
}
