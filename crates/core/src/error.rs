//! Unified error types for msgsearch.

use crate::config::ConfigError;

/// Unified error types for the msgsearch service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., blank search query).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// A refresh aborted on a non-retryable upstream failure.
    ///
    /// The previously published snapshot is still in place.
    #[error("REFRESH_FAILED: {0}")]
    RefreshFailed(String),

    /// Configuration could not be loaded or failed validation.
    #[error("CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "INVALID_INPUT",
            Error::RefreshFailed(_) => "REFRESH_FAILED",
            Error::Config(_) => "CONFIG_ERROR",
        }
    }
}
