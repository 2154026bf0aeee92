//! Error types for analysis runs

use std::time::Duration;
use thiserror::Error;

/// Analysis runner errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The analysis service did not answer in time
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The analysis service answered with a non-success status
    #[error("Analysis service returned {status}: {body}")]
    HttpStatus {
        status: u16,
        body: String,
    },

    /// Response body was not valid JSON for the expected shape
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Response decoded but violates the data model
    #[error("Schema mismatch: {0}")]
    SchemaError(String),

    /// Invalid ticker symbol provided
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AnalysisError {
    /// Classify a reqwest error, separating timeouts from other transport failures
    pub fn from_request(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::NetworkError(err)
        }
    }

    /// Whether this error belongs to the fetch path and is recovered by the fallback
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::NetworkError(_)
                | Self::Timeout(_)
                | Self::HttpStatus { .. }
                | Self::JsonError(_)
                | Self::SchemaError(_)
        )
    }
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
