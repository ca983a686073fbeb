//! Error types for backend client operations

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to a backend service
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure (connect, timeout, broken body)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The server answered 404
    #[error("Resource not found ({path}): {message}")]
    NotFound { path: String, message: String },

    /// The server answered with a non-success status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// The response body could not be decoded
    #[error("Failed to decode response from {path}: {detail}")]
    Decode { path: String, detail: String },
}

impl ClientError {
    /// Create a server error from status code and message
    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Whether this is a transport-level failure (as opposed to an
    /// answered request)
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Http(_))
    }
}
