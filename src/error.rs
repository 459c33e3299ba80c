//! Error types for file intake and backend calls.

use reqwest::StatusCode;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Why a file was refused at selection time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FileRejection {
    #[error("Unsupported file type for '{name}'. Please choose an MP4, MOV, AVI or WebM video.")]
    UnsupportedType { name: String },

    #[error("'{name}' is too large ({size_mb} MB). The maximum size is 500 MB.")]
    TooLarge { name: String, size_mb: u64 },

    #[error("Could not read '{path}': {reason}")]
    Unreadable { path: String, reason: String },
}

/// Failures talking to the processing server.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned {status}{}", detail_suffix(.detail))]
    Status {
        status: StatusCode,
        /// Human-readable reason extracted from the response body, if any.
        detail: Option<String>,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}
