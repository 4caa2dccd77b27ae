//! String-in, string-out entry points.
//!
//! The call shape existing callers use: tags and preferences as plain
//! strings, and [`FAILURE_SENTINEL`](crate::FAILURE_SENTINEL) in place of an
//! error when every provider fails. New code should call
//! [`Gateway::generate`] and match on [`Generation`](crate::Generation).

use super::Gateway;
use crate::types::{CallContext, GenerationRequest, ProviderId};

impl Gateway {
    /// Generate text, returning the failure sentinel on total failure.
    ///
    /// `prefer` is parsed leniently: `"secondary"`/`"groq"` select the
    /// secondary provider first, anything else means no preference.
    pub async fn call_llm_router(
        &self,
        prompt: &str,
        task: &str,
        use_simulation: bool,
        prefer: Option<&str>,
        model_override: Option<&str>,
    ) -> String {
        let mut request = GenerationRequest::new(prompt, task).simulate(use_simulation);
        if let Some(preferred) = prefer.and_then(ProviderId::parse_preference) {
            request = request.prefer(preferred);
        }
        if let Some(model) = model_override {
            request = request.model(model);
        }
        self.generate(&request, &CallContext::new())
            .await
            .into_legacy_string()
    }

    /// [`call_llm_router`](Self::call_llm_router) with no provider preference.
    pub async fn call_llm(
        &self,
        prompt: &str,
        category: &str,
        use_simulation: bool,
        model_override: Option<&str>,
    ) -> String {
        self.call_llm_router(prompt, category, use_simulation, None, model_override)
            .await
    }
}
