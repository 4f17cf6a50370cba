//! Client error type.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by [`CasesApi`](crate::CasesApi) and [`CaseStore`](crate::CaseStore).
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The server URL could not be parsed.
    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A success response did not contain the expected JSON.
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status of a rejected request, if the server answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
