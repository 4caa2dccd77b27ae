//! Generation request type.

use serde::{Deserialize, Serialize};

use super::{ProviderId, Task};

/// A single generation request.
///
/// Built once by the caller and handed to
/// [`Gateway::generate`](crate::Gateway::generate) by reference; the gateway
/// never mutates it.
///
/// ```rust
/// # use sentiq::{GenerationRequest, ProviderId, Task};
/// let request = GenerationRequest::new("Summarise this profile", "ats_analysis")
///     .prefer(ProviderId::Secondary)
///     .model("llama-3.3-70b-versatile");
/// assert_eq!(request.task, Task::AtsAnalysis);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Prompt text exactly as supplied by the caller.
    pub prompt: String,
    /// Task tag; decides strict-JSON wrapping and scopes the cache key.
    #[serde(default)]
    pub task: Task,
    /// Provider to try first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefer: Option<ProviderId>,
    /// Model identifier that overrides every provider's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_override: Option<String>,
    /// Return a synthetic payload without touching cache or providers.
    #[serde(default)]
    pub simulate: bool,
}

impl GenerationRequest {
    /// Create a request for `prompt` tagged with `task`.
    pub fn new(prompt: impl Into<String>, task: impl Into<Task>) -> Self {
        Self {
            prompt: prompt.into(),
            task: task.into(),
            prefer: None,
            model_override: None,
            simulate: false,
        }
    }

    /// Try `provider` first.
    pub fn prefer(mut self, provider: ProviderId) -> Self {
        self.prefer = Some(provider);
        self
    }

    /// Override the model for every provider.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model_override = Some(model.into());
        self
    }

    /// Enable or disable simulation mode.
    pub fn simulate(mut self, enabled: bool) -> Self {
        self.simulate = enabled;
        self
    }
}
