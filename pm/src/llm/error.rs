//! Generation collaborator error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to the generation collaborator.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("prompt must not be empty")]
    EmptyPrompt,

    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenError {
    /// Check if this error is worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenError::RateLimited { .. } => true,
            GenError::ApiError { status, .. } => *status >= 500,
            GenError::Network(_) => true,
            GenError::Timeout(_) => true,
            GenError::EmptyPrompt => false,
            GenError::InvalidResponse(_) => false,
            GenError::Json(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        assert!(
            GenError::RateLimited {
                retry_after: Duration::from_secs(30)
            }
            .is_retryable()
        );
        assert!(
            GenError::ApiError {
                status: 503,
                message: "overloaded".to_string()
            }
            .is_retryable()
        );
        assert!(
            !GenError::ApiError {
                status: 400,
                message: "bad request".to_string()
            }
            .is_retryable()
        );
        assert!(GenError::Timeout(Duration::from_secs(30)).is_retryable());
        assert!(!GenError::EmptyPrompt.is_retryable());
        assert!(!GenError::InvalidResponse("garbage".to_string()).is_retryable());
    }
}
