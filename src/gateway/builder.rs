//! Builder for configuring gateway instances

use std::sync::Arc;
use std::time::Duration;

use super::Gateway;
use crate::cache::{CacheConfig, ResponseCache};
use crate::config::{self, Config};
use crate::providers::{GeminiProvider, GroqProvider, TextProvider};
use crate::ratelimit::{DEFAULT_REQUESTS_PER_MINUTE, RateLimitScope, TokenBucket};
use crate::types::ProviderId;
use crate::{Result, SentiqError};

/// Main entry point for creating gateway instances.
pub struct Sentiq;

impl Sentiq {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::new()
    }
}

/// Builder for configuring gateway instances.
///
/// Missing credentials do not fail [`build`](Self::build): the affected
/// adapter reports `Configuration` on every call and the gateway fails over.
///
/// ```rust,no_run
/// # fn main() -> sentiq::Result<()> {
/// let gateway = sentiq::Sentiq::builder()
///     .gemini(std::env::var("GEMINI_API_KEY").ok())
///     .groq(std::env::var("GROQ_API_KEY").ok())
///     .requests_per_minute(60)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct GatewayBuilder {
    gemini_key: Option<String>,
    groq_key: Option<String>,
    gemini_model: Option<String>,
    groq_model: Option<String>,
    gemini_base_url: Option<String>,
    groq_base_url: Option<String>,
    groq_json_mode: Option<bool>,
    primary: Option<Arc<dyn TextProvider>>,
    secondary: Option<Arc<dyn TextProvider>>,
    requests_per_minute: u32,
    rate_limit_scope: RateLimitScope,
    limiter: Option<Arc<TokenBucket>>,
    cache_config: CacheConfig,
    cache: Option<ResponseCache>,
    default_timeout: Option<Duration>,
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GatewayBuilder {
    pub fn new() -> Self {
        Self {
            gemini_key: None,
            groq_key: None,
            gemini_model: None,
            groq_model: None,
            gemini_base_url: None,
            groq_base_url: None,
            groq_json_mode: None,
            primary: None,
            secondary: None,
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            rate_limit_scope: RateLimitScope::default(),
            limiter: None,
            cache_config: CacheConfig::default(),
            cache: None,
            default_timeout: None,
        }
    }

    /// Seed every setting from a loaded [`Config`], with credentials read
    /// from `GEMINI_API_KEY` and `GROQ_API_KEY`.
    pub fn from_config(config: &Config) -> Self {
        let primary = config.provider(ProviderId::Primary);
        let secondary = config.provider(ProviderId::Secondary);
        Self {
            gemini_key: config::api_key(ProviderId::Primary),
            groq_key: config::api_key(ProviderId::Secondary),
            gemini_model: primary.default_model.clone(),
            groq_model: secondary.default_model.clone(),
            gemini_base_url: primary.base_url.clone(),
            groq_base_url: secondary.base_url.clone(),
            groq_json_mode: secondary.json_mode,
            requests_per_minute: config.rate_limit.requests_per_minute,
            rate_limit_scope: config.rate_limit.scope,
            cache_config: config.cache.clone(),
            default_timeout: config.request_timeout(),
            ..Self::new()
        }
    }

    /// Configure the Gemini (primary) credential.
    pub fn gemini(mut self, api_key: impl Into<Option<String>>) -> Self {
        self.gemini_key = api_key.into();
        self
    }

    /// Configure the Groq (secondary) credential.
    pub fn groq(mut self, api_key: impl Into<Option<String>>) -> Self {
        self.groq_key = api_key.into();
        self
    }

    pub fn gemini_model(mut self, model: impl Into<String>) -> Self {
        self.gemini_model = Some(model.into());
        self
    }

    pub fn groq_model(mut self, model: impl Into<String>) -> Self {
        self.groq_model = Some(model.into());
        self
    }

    pub fn gemini_base_url(mut self, url: impl Into<String>) -> Self {
        self.gemini_base_url = Some(url.into());
        self
    }

    pub fn groq_base_url(mut self, url: impl Into<String>) -> Self {
        self.groq_base_url = Some(url.into());
        self
    }

    /// Toggle the Groq JSON-only system message (default: on).
    pub fn groq_json_mode(mut self, enabled: bool) -> Self {
        self.groq_json_mode = Some(enabled);
        self
    }

    /// Replace the primary slot with a custom adapter.
    ///
    /// Custom adapters own their admission control; the builder's rate
    /// limiter is only wired into the built-in adapters.
    pub fn primary(mut self, provider: Arc<dyn TextProvider>) -> Self {
        self.primary = Some(provider);
        self
    }

    /// Replace the secondary slot with a custom adapter.
    pub fn secondary(mut self, provider: Arc<dyn TextProvider>) -> Self {
        self.secondary = Some(provider);
        self
    }

    /// Quota for the token bucket (default: 120). Must be non-zero.
    pub fn requests_per_minute(mut self, rpm: u32) -> Self {
        self.requests_per_minute = rpm;
        self
    }

    pub fn rate_limit_scope(mut self, scope: RateLimitScope) -> Self {
        self.rate_limit_scope = scope;
        self
    }

    /// Use an existing bucket for both built-in adapters. Overrides
    /// `requests_per_minute` and `rate_limit_scope`.
    pub fn limiter(mut self, bucket: Arc<TokenBucket>) -> Self {
        self.limiter = Some(bucket);
        self
    }

    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Use a prebuilt cache handle. Overrides `cache_config`.
    pub fn cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Default per-call timeout, used when the caller's context has none.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    fn buckets(&self) -> Result<(Arc<TokenBucket>, Arc<TokenBucket>)> {
        if let Some(bucket) = &self.limiter {
            return Ok((bucket.clone(), bucket.clone()));
        }
        if self.requests_per_minute == 0 {
            return Err(SentiqError::Configuration(
                "requests_per_minute must be greater than zero".to_string(),
            ));
        }
        let rpm = self.requests_per_minute;
        Ok(match self.rate_limit_scope {
            RateLimitScope::Shared => {
                let bucket = Arc::new(TokenBucket::per_minute(rpm));
                (bucket.clone(), bucket)
            }
            RateLimitScope::PerProvider => (
                Arc::new(TokenBucket::per_minute(rpm)),
                Arc::new(TokenBucket::per_minute(rpm)),
            ),
        })
    }

    /// Build the gateway.
    pub fn build(self) -> Result<Gateway> {
        let (primary_bucket, secondary_bucket) = self.buckets()?;

        let primary = match self.primary {
            Some(provider) => provider,
            None => {
                let mut gemini = GeminiProvider::new(self.gemini_key, primary_bucket)?;
                if let Some(model) = self.gemini_model {
                    gemini = gemini.with_default_model(model);
                }
                if let Some(url) = self.gemini_base_url {
                    gemini = gemini.with_base_url(url);
                }
                Arc::new(gemini) as Arc<dyn TextProvider>
            }
        };

        let secondary = match self.secondary {
            Some(provider) => provider,
            None => {
                let mut groq = GroqProvider::new(self.groq_key, secondary_bucket)?;
                if let Some(model) = self.groq_model {
                    groq = groq.with_default_model(model);
                }
                if let Some(url) = self.groq_base_url {
                    groq = groq.with_base_url(url);
                }
                if let Some(enabled) = self.groq_json_mode {
                    groq = groq.with_json_mode(enabled);
                }
                Arc::new(groq) as Arc<dyn TextProvider>
            }
        };

        let cache = self
            .cache
            .unwrap_or_else(|| ResponseCache::from_config(&self.cache_config));

        Ok(Gateway::new(primary, secondary, cache, self.default_timeout))
    }
}
