//! Error types for control-plane calls.

use thiserror::Error;

/// Result type alias for control-plane operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while talking to the control plane.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The engine answered with a status the operation does not accept.
    #[error("unexpected response status {status} with body {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("unable to parse API response as valid JSON: {body}")]
    Decode { body: String },

    #[error("invalid control-plane URL: {0}")]
    Url(#[from] url::ParseError),
}
