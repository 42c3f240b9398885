//! Client error types.

use thiserror::Error;

/// Errors talking to the Ecoleta API or the geography service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure or undecodable body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The configured base URL cannot have path segments appended.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ClientError {
    /// HTTP status of an API error, if this is one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
