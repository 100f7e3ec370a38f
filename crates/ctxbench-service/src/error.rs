//! Errors reported by a graph service

/// Failure of one graph service call
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("service returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Named network does not exist
    #[error("network not found: {0}")]
    NotFound(String),

    /// Call succeeded but produced nothing usable
    #[error("no result: {0}")]
    NoResult(String),

    /// Response body could not be interpreted
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Create API error from status and message
    #[inline]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether repeating the call may succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            Self::NoResult(_) => true,
            Self::NotFound(_) | Self::InvalidResponse(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_display() {
        let err = ProviderError::api(503, "busy");
        assert_eq!(err.to_string(), "service returned 503: busy");
    }

    #[test]
    fn retryable_classification() {
        assert!(ProviderError::api(500, "").is_retryable());
        assert!(ProviderError::api(429, "").is_retryable());
        assert!(!ProviderError::api(400, "").is_retryable());
        assert!(ProviderError::NoResult("empty context".to_string()).is_retryable());
        assert!(!ProviderError::NotFound("base".to_string()).is_retryable());
        assert!(!ProviderError::InvalidResponse("x".to_string()).is_retryable());
    }
}
