//! Error types for the assistants client.

use thiserror::Error;

/// Errors that can occur talking to the assistants service.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Client could not be configured.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Request never produced a response.
    #[error("request failed: {0}")]
    Request(String),

    /// Service answered with a non-success status.
    #[error("API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body as text.
        body: String,
    },

    /// Response body could not be decoded.
    #[error("failed to parse response: {0}")]
    ResponseParse(String),
}

/// Result type for assistants operations.
pub type Result<T> = std::result::Result<T, ApiError>;
