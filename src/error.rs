//! Error types for the dfsclient library.

use thiserror::Error;

/// Main error type for dfsclient operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request completed with a non-success status.
    #[error("HTTP error {status}: {body}")]
    Http {
        /// Status code returned by the controller.
        status: u16,
        /// Response payload, if any.
        body: String,
    },

    /// Network request error.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Upload started with no file selected.
    #[error("no file selected")]
    NoFileSelected,

    /// Upload started while another one is in flight.
    #[error("an upload is already in flight")]
    UploadInFlight,

    /// Response did not match the documented endpoint contract.
    #[error("invalid response from controller")]
    InvalidResponse,
}

/// Result type alias for dfsclient operations.
pub type Result<T> = std::result::Result<T, ClientError>;
