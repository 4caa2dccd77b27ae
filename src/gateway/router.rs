//! The generation gateway.
//!
//! # Request flow
//!
//! ```text
//! generate(request, ctx)
//!     │
//!     ├─ simulate? ──────────────► synthetic payload (no cache, no limiter, no providers)
//!     │
//!     ├─ resolve model, compute CacheKey(task, model, original prompt)
//!     │
//!     ├─ cache hit? ─────────────► cached text (no token consumed)
//!     │
//!     ├─ wrap prompt for strict-JSON tasks
//!     │
//!     ├─ for slot in [primary, secondary] (reversed if secondary preferred):
//!     │      invoke ──ok──► cache.put(key) ─► text
//!     │        │
//!     │        └─err──► log, next slot
//!     │
//!     └─ all failed ─────────────► Generation::Failed (never an Err)
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::field::Empty;
use tracing::{Span, debug, error, instrument, warn};

use super::builder::GatewayBuilder;
use super::routing::{outgoing_prompt, provider_order, resolve_model};
use crate::cache::{CacheKey, ResponseCache};
use crate::providers::TextProvider;
use crate::providers::simulation::simulated_response;
use crate::telemetry;
use crate::types::{
    Attempt, CallContext, Failure, Generation, GenerationRequest, ProviderId, Source,
};

/// Routes generation requests across the two provider slots.
///
/// Owns the cache handle and both adapters; the adapters own the rate
/// limiter(s). Construct once at startup with [`Gateway::builder`] and
/// share by reference (or `Arc`) with every caller.
pub struct Gateway {
    primary: Arc<dyn TextProvider>,
    secondary: Arc<dyn TextProvider>,
    cache: ResponseCache,
    default_timeout: Option<Duration>,
}

impl Gateway {
    pub(crate) fn new(
        primary: Arc<dyn TextProvider>,
        secondary: Arc<dyn TextProvider>,
        cache: ResponseCache,
        default_timeout: Option<Duration>,
    ) -> Self {
        Self {
            primary,
            secondary,
            cache,
            default_timeout,
        }
    }

    /// Create a new builder for configuring the gateway.
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::new()
    }

    /// Adapter in the given slot.
    pub fn provider(&self, id: ProviderId) -> &Arc<dyn TextProvider> {
        match id {
            ProviderId::Primary => &self.primary,
            ProviderId::Secondary => &self.secondary,
        }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout
    }

    /// Model that scopes the cache key for `request`.
    pub fn resolve_model<'a>(&'a self, request: &'a GenerationRequest) -> &'a str {
        resolve_model(
            request.model_override.as_deref(),
            request.prefer,
            self.primary.default_model(),
            self.secondary.default_model(),
        )
    }

    /// Cache key for `request`, computed from the unwrapped prompt.
    pub fn cache_key(&self, request: &GenerationRequest) -> CacheKey {
        CacheKey::compute(&request.task, self.resolve_model(request), &request.prompt)
    }

    /// Turn a prompt into text.
    ///
    /// Never returns an error: individual provider failures are logged and
    /// trigger failover, and total failure comes back as
    /// [`Generation::Failed`] carrying every attempt.
    #[instrument(skip_all, fields(task = %request.task, model = Empty, simulate = request.simulate))]
    pub async fn generate(&self, request: &GenerationRequest, ctx: &CallContext) -> Generation {
        if request.simulate {
            debug!("simulation mode, skipping cache and providers");
            Self::record_outcome("simulated");
            return Generation::success(simulated_response(&request.task), Source::Simulation);
        }

        let resolved = self.resolve_model(request);
        Span::current().record("model", resolved);
        let key = CacheKey::compute(&request.task, resolved, &request.prompt);

        if let Some(text) = self.cache.get(&key, &request.task).await {
            debug!(%key, "cache hit");
            Self::record_outcome("cache_hit");
            return Generation::success(text, Source::Cache);
        }

        let prompt = outgoing_prompt(&request.task, &request.prompt);
        let ctx = ctx.or_timeout(self.default_timeout);
        let mut attempts = Vec::with_capacity(2);

        for id in provider_order(request.prefer) {
            let provider = self.provider(id);
            let model = request
                .model_override
                .as_deref()
                .unwrap_or_else(|| provider.default_model());
            let start = Instant::now();

            match provider.invoke(&prompt, model, &ctx).await {
                Ok(text) => {
                    Self::record_request(provider.name(), start, true);
                    self.cache.put(&key, &text).await;
                    Self::record_outcome("ok");
                    return Generation::success(text, Source::Provider(id));
                }
                Err(e) => {
                    Self::record_request(provider.name(), start, false);
                    warn!(
                        provider = provider.name(),
                        slot = %id,
                        model,
                        kind = %e.kind(),
                        error = %e,
                        "provider failed"
                    );
                    attempts.push(Attempt::new(id, provider.name(), &e));
                }
            }
        }

        error!(
            attempts = attempts.len(),
            last_error = attempts.last().map(|a| a.error.as_str()).unwrap_or("none"),
            "all providers failed"
        );
        Self::record_outcome("failed");
        Generation::Failed(Failure { attempts })
    }

    fn record_request(provider: &str, start: Instant, ok: bool) {
        let status = if ok { "ok" } else { "error" };
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "provider" => provider.to_owned(),
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
            "provider" => provider.to_owned(),
        )
        .record(start.elapsed().as_secs_f64());
    }

    fn record_outcome(outcome: &'static str) {
        metrics::counter!(telemetry::GENERATIONS_TOTAL, "outcome" => outcome).increment(1);
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("primary", &self.primary.name())
            .field("secondary", &self.secondary.name())
            .field("cache", &self.cache)
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}
