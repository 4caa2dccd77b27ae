//! Groq adapter (secondary provider).
//!
//! Uses Groq's OpenAI-compatible chat completions endpoint. In JSON mode
//! (the default) every request carries a JSON-only system message and
//! `response_format = json_object`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::traits::TextProvider;
use super::{error_for_status, http_client};
use crate::ratelimit::{self, TokenBucket};
use crate::types::CallContext;
use crate::{Result, SentiqError};

/// Default base URL for the Groq API.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default Groq model.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

const JSON_SYSTEM_PROMPT: &str = "You must respond with valid JSON only.";
const TEMPERATURE: f32 = 0.3;

/// Client for the Groq chat completions API.
#[derive(Clone)]
pub struct GroqProvider {
    api_key: Option<String>,
    default_model: String,
    base_url: String,
    json_mode: bool,
    http: Client,
    limiter: Arc<TokenBucket>,
}

impl GroqProvider {
    /// Create an adapter. A `None` key leaves the adapter unusable: every
    /// call fails with `Configuration`.
    ///
    /// Fails with `Configuration` if the HTTP client cannot be built.
    pub fn new(api_key: Option<String>, limiter: Arc<TokenBucket>) -> Result<Self> {
        Ok(Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            default_model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            json_mode: true,
            http: http_client()?,
            limiter,
        })
    }

    /// Point at a different endpoint (for testing with wiremock).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the model used when the request has no override.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Enable or disable the JSON-only system message and response format.
    pub fn with_json_mode(mut self, enabled: bool) -> Self {
        self.json_mode = enabled;
        self
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| SentiqError::Configuration("GROQ_API_KEY missing".to_string()))
    }

    fn request<'a>(&self, prompt: &'a str, model: &'a str) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if self.json_mode {
            messages.push(ChatMessage {
                role: "system",
                content: JSON_SYSTEM_PROMPT,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });
        ChatRequest {
            model,
            messages,
            temperature: TEMPERATURE,
            response_format: self.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        }
    }

    async fn send(&self, api_key: &str, prompt: &str, model: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.request(prompt, model))
            .send()
            .await?;

        let response = error_for_status(response).await?;

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| SentiqError::Http(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(SentiqError::EmptyResponse)
    }
}

#[async_trait]
impl TextProvider for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn invoke(&self, prompt: &str, model: &str, ctx: &CallContext) -> Result<String> {
        let api_key = self.api_key()?;
        ratelimit::admit(&self.limiter, self.name())?;
        ctx.run(self.send(api_key, prompt, model)).await
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> GroqProvider {
        GroqProvider::new(Some("k".into()), Arc::new(TokenBucket::per_minute(60))).unwrap()
    }

    #[test]
    fn json_mode_request_shape() {
        let body = serde_json::to_value(provider().request("hi", "m")).unwrap();
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], JSON_SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["content"], "hi");
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["model"], "m");
    }

    #[test]
    fn plain_mode_request_shape() {
        let provider = provider().with_json_mode(false);
        let body = serde_json::to_value(provider.request("hi", "m")).unwrap();
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert!(body.get("response_format").is_none());
    }
}
