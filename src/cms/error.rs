//! Error types for content API access

use thiserror::Error;

/// Errors raised while fetching from the content API
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CmsError {
    /// Transport-level failure (connection refused, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request did not complete within the configured timeout
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// The API answered with a non-success status
    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body was not the expected JSON shape
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The API root did not advertise a master ref
    #[error("Content API did not return a master ref")]
    MissingMasterRef,
}

impl CmsError {
    /// Whether retrying the same request later may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            CmsError::Http(_) | CmsError::Timeout { .. } => true,
            CmsError::Status { status, .. } => *status >= 500 || *status == 429,
            CmsError::Decode(_) | CmsError::MissingMasterRef => false,
        }
    }
}

/// Result type alias for content API operations
pub type Result<T> = std::result::Result<T, CmsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        let timeout = CmsError::Timeout {
            url: "https://example.com".to_string(),
        };
        assert!(timeout.is_retryable());

        let unavailable = CmsError::Status {
            status: 503,
            url: "https://example.com".to_string(),
        };
        assert!(unavailable.is_retryable());

        let forbidden = CmsError::Status {
            status: 403,
            url: "https://example.com".to_string(),
        };
        assert!(!forbidden.is_retryable());
        assert!(!CmsError::MissingMasterRef.is_retryable());
    }

    #[test]
    fn test_display() {
        let err = CmsError::Status {
            status: 404,
            url: "https://example.com/api".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected status 404 from https://example.com/api"
        );
    }
}
