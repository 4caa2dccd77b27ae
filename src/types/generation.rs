//! Tagged outcome of a generation call.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::ProviderId;
use crate::error::ErrorKind;
use crate::{Result, SentiqError};

/// Reserved string returned by the legacy entry points when every provider
/// failed. Never produced by a provider or the simulation stub.
pub const FAILURE_SENTINEL: &str = "SYSTEM OVERLOAD";

/// Where a successful generation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "provider")]
pub enum Source {
    /// A provider answered; the result has been written to the cache.
    Provider(ProviderId),
    /// Served from the response cache without any provider call.
    Cache,
    /// Synthetic payload from simulation mode.
    Simulation,
}

/// One failed provider attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    pub provider: ProviderId,
    /// Adapter name (e.g. `"gemini"`).
    pub name: String,
    pub kind: ErrorKind,
    /// Rendered error message.
    pub error: String,
}

impl Attempt {
    pub(crate) fn new(provider: ProviderId, name: &str, error: &SentiqError) -> Self {
        Self {
            provider,
            name: name.to_string(),
            kind: error.kind(),
            error: error.to_string(),
        }
    }
}

/// Every provider in the ordering failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// Attempts in the order they were made.
    pub attempts: Vec<Attempt>,
}

/// Result of [`Gateway::generate`](crate::Gateway::generate).
///
/// Total failure is a value, not an error: the gateway never raises on the
/// all-failed path. Use [`into_result`](Self::into_result) to get a
/// `Result`, or [`into_legacy_string`](Self::into_legacy_string) for the
/// sentinel-string surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum Generation {
    Text { text: String, source: Source },
    Failed(Failure),
}

impl Generation {
    pub(crate) fn success(text: impl Into<String>, source: Source) -> Self {
        Generation::Text {
            text: text.into(),
            source,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Generation::Text { .. })
    }

    /// Generated text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Generation::Text { text, .. } => Some(text),
            Generation::Failed(_) => None,
        }
    }

    /// Source of the text, if any.
    pub fn source(&self) -> Option<Source> {
        match self {
            Generation::Text { source, .. } => Some(*source),
            Generation::Failed(_) => None,
        }
    }

    /// Convert into a `Result`, mapping total failure to
    /// [`SentiqError::AllProvidersFailed`].
    pub fn into_result(self) -> Result<String> {
        match self {
            Generation::Text { text, .. } => Ok(text),
            Generation::Failed(failure) => Err(SentiqError::AllProvidersFailed {
                attempts: failure.attempts,
            }),
        }
    }

    /// Text on success, [`FAILURE_SENTINEL`] on total failure.
    pub fn into_legacy_string(self) -> String {
        match self {
            Generation::Text { text, .. } => text,
            Generation::Failed(_) => FAILURE_SENTINEL.to_string(),
        }
    }

    /// Parse the generated text as JSON.
    ///
    /// The gateway itself never validates JSON; this is a convenience for
    /// callers of strict-JSON tasks.
    pub fn parse_json<T: DeserializeOwned>(&self) -> Result<T> {
        match self {
            Generation::Text { text, .. } => Ok(serde_json::from_str(text)?),
            Generation::Failed(failure) => Err(SentiqError::AllProvidersFailed {
                attempts: failure.attempts.clone(),
            }),
        }
    }
}
