//! Google Gemini adapter (primary provider).
//!
//! Talks to the `generateContent` REST endpoint.
//! See: <https://ai.google.dev/api/generate-content>

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use super::traits::TextProvider;
use super::{error_for_status, http_client};
use crate::ratelimit::{self, TokenBucket};
use crate::types::CallContext;
use crate::{Result, SentiqError};

/// Default base URL for the Gemini API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Client for the Gemini API.
#[derive(Clone)]
pub struct GeminiProvider {
    api_key: Option<String>,
    default_model: String,
    base_url: String,
    http: Client,
    limiter: Arc<TokenBucket>,
}

impl GeminiProvider {
    /// Create an adapter. A `None` key leaves the adapter unusable: every
    /// call fails with `Configuration`.
    ///
    /// Fails with `Configuration` if the HTTP client cannot be built.
    pub fn new(api_key: Option<String>, limiter: Arc<TokenBucket>) -> Result<Self> {
        Ok(Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            default_model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
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

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| SentiqError::Configuration("GEMINI_API_KEY missing".to_string()))
    }

    /// `{base}/v1beta/models/{model}:generateContent`, with the model
    /// percent-encoded as a single path segment.
    fn endpoint(&self, model: &str) -> Result<Url> {
        let invalid = |reason: String| {
            SentiqError::Configuration(format!(
                "invalid Gemini base URL {}: {reason}",
                self.base_url
            ))
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .push("v1beta")
            .push("models")
            .push(&format!("{model}:generateContent"));
        Ok(url)
    }

    async fn send(&self, api_key: &str, prompt: &str, model: &str) -> Result<String> {
        let url = self.endpoint(model)?;

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&GenerateContentRequest {
                contents: vec![Content {
                    role: "user",
                    parts: vec![Part { text: prompt }],
                }],
            })
            .send()
            .await?;

        let response = error_for_status(response).await?;

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| SentiqError::Http(e.to_string()))?;

        body.text().ok_or(SentiqError::EmptyResponse)
    }
}

#[async_trait]
impl TextProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
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
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_joins_parts() {
        let body: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}], "role": "model"}
            }]
        }))
        .unwrap();
        assert_eq!(body.text().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn response_without_candidates_is_empty() {
        let body: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({"promptFeedback": {}})).unwrap();
        assert!(body.text().is_none());
    }

    #[test]
    fn endpoint_keeps_model_in_one_segment() {
        let provider = GeminiProvider::new(Some("k".into()), Arc::new(TokenBucket::per_minute(60)))
            .unwrap()
            .with_base_url("http://localhost:8080/");

        let url = provider.endpoint("gemini-2.5-flash").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );

        let url = provider.endpoint("../x?key=1#frag").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v1beta/models/..%2Fx%3Fkey=1%23frag:generateContent"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn unparseable_base_url_is_configuration_error() {
        let provider = GeminiProvider::new(Some("k".into()), Arc::new(TokenBucket::per_minute(60)))
            .unwrap()
            .with_base_url("not a url");
        assert!(matches!(
            provider.endpoint("m"),
            Err(SentiqError::Configuration(_))
        ));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let provider =
            GeminiProvider::new(Some("  ".into()), Arc::new(TokenBucket::per_minute(60))).unwrap();
        assert!(matches!(provider.api_key(), Err(SentiqError::Configuration(_))));
    }
}
