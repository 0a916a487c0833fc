//! Error types for the remote API client.

use thiserror::Error;

/// Errors that can occur talking to the remote API or its edges.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Whether this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::ConnectionFailed(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::ConnectionFailed(e.to_string())
        } else if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Request(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        let server_error = ApiError::Status {
            status: 503,
            url: "https://x".to_string(),
        };
        let forbidden = ApiError::Status {
            status: 403,
            url: "https://x".to_string(),
        };
        assert!(server_error.is_retryable());
        assert!(!forbidden.is_retryable());
        assert!(ApiError::Timeout.is_retryable());
        assert!(!ApiError::InvalidResponse("bad".to_string()).is_retryable());
    }
}
