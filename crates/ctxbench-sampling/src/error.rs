//! Error types for sampling

/// Errors raised by the drawer and the size sampler
///
/// These signal caller bugs (bad arguments), not runtime conditions, and are
/// meant to end the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SamplingError {
    /// Invalid argument
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl SamplingError {
    /// Create invalid input error
    #[inline]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
