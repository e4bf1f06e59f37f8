//! Error types for the evaluation client.

use std::path::PathBuf;
use std::time::Duration;

/// Evaluation API errors.
#[derive(Debug, thiserror::Error)]
pub enum EvalsError {
    /// Resource not found (404).
    #[error("not found: {resource}")]
    NotFound { resource: String },

    /// Credential missing, invalid or lacking permission (401/403).
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// Rate limit exceeded.
    #[error("rate limited: retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    /// Request rejected by the service (other 4xx), e.g. an invalid run transition.
    #[error("request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    /// Service-side failure (5xx).
    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// Transport failure.
    #[error("network error: {message}")]
    Network { message: String },

    /// Response body could not be decoded.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// Local file could not be read for upload.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl EvalsError {
    /// Whether the error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Server { .. } | Self::Network { .. }
        )
    }

    /// Whether the error originated locally rather than at the service.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Config { .. })
    }
}

impl From<reqwest::Error> for EvalsError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}

/// Result type for evaluation API operations.
pub type EvalsResult<T> = Result<T, EvalsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_variants() {
        assert!(EvalsError::RateLimited { retry_after: None }.is_retryable());
        assert!(EvalsError::Server {
            status: 503,
            message: "busy".into()
        }
        .is_retryable());
        assert!(EvalsError::Network {
            message: "reset".into()
        }
        .is_retryable());

        assert!(!EvalsError::NotFound {
            resource: "evals/x".into()
        }
        .is_retryable());
        assert!(!EvalsError::Rejected {
            status: 409,
            message: "run already completed".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_io_error_display_names_path() {
        let err = EvalsError::Io {
            path: PathBuf::from("/tmp/missing.jsonl"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.is_local());
        assert_eq!(
            err.to_string(),
            "failed to read /tmp/missing.jsonl: no such file"
        );
    }
}
