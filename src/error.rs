//! Sentiq error types

use std::time::Duration;

use crate::types::Attempt;

/// Coarse classification of a [`SentiqError`], used for logging and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Adapter credentials or settings are missing.
    Configuration,
    /// The shared token bucket denied the attempt.
    RateLimited,
    /// Transport, protocol, timeout or cancellation failure.
    Remote,
    /// Cache backend I/O failure.
    Cache,
    /// Every provider in the ordering failed.
    AllFailed,
}

impl ErrorKind {
    /// Label used in metrics and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::Remote => "remote",
            ErrorKind::Cache => "cache",
            ErrorKind::AllFailed => "all_failed",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentiq error types
#[derive(Debug, thiserror::Error)]
pub enum SentiqError {
    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Admission errors
    #[error("rate limit exceeded for {provider}")]
    RateLimited { provider: String },

    // Remote errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("request cancelled")]
    Cancelled,

    #[error("empty response from model")]
    EmptyResponse,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Storage errors
    #[error("cache error: {0}")]
    Cache(String),

    /// Every provider in the ordering failed. Only produced when a caller
    /// converts a failed [`Generation`](crate::Generation) into a `Result`.
    #[error("all providers failed ({} attempts)", attempts.len())]
    AllProvidersFailed { attempts: Vec<Attempt> },
}

impl SentiqError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SentiqError::Configuration(_) => ErrorKind::Configuration,
            SentiqError::RateLimited { .. } => ErrorKind::RateLimited,
            SentiqError::Http(_)
            | SentiqError::Api { .. }
            | SentiqError::Timeout(_)
            | SentiqError::Cancelled
            | SentiqError::EmptyResponse
            | SentiqError::Json(_) => ErrorKind::Remote,
            SentiqError::Cache(_) => ErrorKind::Cache,
            SentiqError::AllProvidersFailed { .. } => ErrorKind::AllFailed,
        }
    }

    /// Whether the error came from the remote call itself
    /// (network, protocol, non-2xx, timeout or cancellation).
    pub fn is_remote(&self) -> bool {
        self.kind() == ErrorKind::Remote
    }
}

impl From<reqwest::Error> for SentiqError {
    fn from(err: reqwest::Error) -> Self {
        SentiqError::Http(err.to_string())
    }
}

impl From<std::io::Error> for SentiqError {
    fn from(err: std::io::Error) -> Self {
        SentiqError::Cache(err.to_string())
    }
}

/// Result type alias for Sentiq operations
pub type Result<T> = std::result::Result<T, SentiqError>;
