//! Error types for ARM API calls.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The service answered with a status the operation does not expect
    #[error("unexpected status {status} for {method} {url}: {code}: {message}")]
    UnexpectedStatus {
        status: u16,
        method: String,
        url: String,
        code: String,
        message: String,
    },

    #[error("authorization failed: {0}")]
    Auth(String),

    #[error("decoding response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("encoding request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A request parameter failed client-side validation before sending
    #[error("{operation}: invalid value for {target}: {message}")]
    Validation {
        operation: String,
        target: String,
        message: String,
    },

    #[error("long-running operation ended with status {status}: {message}")]
    OperationFailed { status: String, message: String },

    #[error("long-running operation did not complete after {0} polls")]
    PollTimeout(u32),
}

impl Error {
    /// Whether the service reported that the resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnexpectedStatus { status: 404, .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
