//! Error types for ctxbench workflows
//!
//! Provides error handling for:
//! - Configuration loading and validation
//! - Artifact and input file I/O
//! - Sampling, extraction and annotation failures
//! - Graph service failures and exhausted retries

use ctxbench_graphml::{AnnotationError, GraphmlError, ParseError, SchemaError};
use ctxbench_sampling::SamplingError;
use ctxbench_service::ProviderError;
use std::path::PathBuf;

/// Main workflow error type
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// Invalid or unreadable configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// File system failure
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Sampler or drawer misuse
    #[error("sampling error: {0}")]
    Sampling(#[from] SamplingError),

    /// Unusable GraphML input
    #[error("GraphML error: {0}")]
    Graphml(#[from] GraphmlError),

    /// Annotation payload could not be built
    #[error("annotation error: {0}")]
    Annotation(#[from] AnnotationError),

    /// Graph service call failed
    #[error("graph service error: {0}")]
    Provider(#[from] ProviderError),

    /// Too many iterations in a row failed
    #[error("giving up after {attempts} consecutive failures, last: {last_error}")]
    TooManyFailures {
        /// Consecutive failed attempts
        attempts: usize,
        /// Message of the last failure
        last_error: String,
    },
}

impl BenchError {
    /// Create configuration error
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create I/O error for `path`
    #[inline]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if error came from the graph service
    #[inline]
    #[must_use]
    pub fn is_provider(&self) -> bool {
        matches!(self, Self::Provider(_))
    }
}

impl From<ParseError> for BenchError {
    fn from(e: ParseError) -> Self {
        Self::Graphml(e.into())
    }
}

impl From<SchemaError> for BenchError {
    fn from(e: SchemaError) -> Self {
        Self::Graphml(e.into())
    }
}

/// Result alias for workflow operations
pub type BenchResult<T> = Result<T, BenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_path() {
        let err = BenchError::io(
            "/output/a.graphml",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "I/O error on /output/a.graphml: denied");
    }

    #[test]
    fn conversions() {
        let err: BenchError = ProviderError::NotFound("base".to_string()).into();
        assert!(err.is_provider());

        let err: BenchError = SamplingError::invalid_input("empty").into();
        assert!(matches!(err, BenchError::Sampling(_)));
        assert!(!err.is_provider());
    }

    #[test]
    fn too_many_failures_display() {
        let err = BenchError::TooManyFailures {
            attempts: 3,
            last_error: "service returned 503: busy".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "giving up after 3 consecutive failures, last: service returned 503: busy"
        );
    }
}
