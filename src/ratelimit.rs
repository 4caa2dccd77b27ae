//! Reject-fast token bucket shared by the provider adapters.
//!
//! [`TokenBucket::consume`] never waits: it refills from elapsed time,
//! then either takes the tokens and returns `true` or returns `false`
//! immediately. Adapters turn a `false` into
//! [`SentiqError::RateLimited`](crate::SentiqError::RateLimited), which the
//! gateway treats as a failed attempt and moves on to the next provider.
//!
//! By default a single bucket is shared by every adapter, so the quota is
//! one global pool. [`RateLimitScope::PerProvider`] gives each adapter its
//! own bucket with the same parameters.
//!
//! Time is read from [`tokio::time::Instant`], so tests can drive refill
//! deterministically with a paused clock and `tokio::time::advance`.

use parking_lot::Mutex;
use serde::Deserialize;
use tokio::time::Instant;
use tracing::debug;

use crate::telemetry;
use crate::{Result, SentiqError};

/// Default quota: requests per minute.
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 120;

/// Whether adapters share one bucket or each get their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitScope {
    /// One bucket for all providers and callers.
    #[default]
    Shared,
    /// An independent bucket per provider.
    PerProvider,
}

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Token bucket rate limiter.
///
/// All reads and writes of the token count and refill timestamp happen
/// under one lock, so concurrent callers can never both take the last token.
#[derive(Debug)]
pub struct TokenBucket {
    capacity: f64,
    refill_per_sec: f64,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    /// Create a full bucket.
    pub fn new(capacity: f64, refill_per_sec: f64) -> Self {
        Self {
            capacity,
            refill_per_sec,
            state: Mutex::new(BucketState {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// Bucket sized for `rpm` requests per minute: capacity `rpm`, refilled
    /// at `rpm / 60` tokens per second.
    pub fn per_minute(rpm: u32) -> Self {
        let rpm = f64::from(rpm);
        Self::new(rpm, rpm / 60.0)
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn refill_per_sec(&self) -> f64 {
        self.refill_per_sec
    }

    /// Take one token.
    pub fn consume(&self) -> bool {
        self.consume_n(1.0)
    }

    /// Take `n` tokens if available. Never blocks waiting for refill.
    pub fn consume_n(&self, n: f64) -> bool {
        let mut state = self.state.lock();
        self.refill(&mut state);
        if state.tokens >= n {
            state.tokens -= n;
            true
        } else {
            false
        }
    }

    /// Tokens currently available (after refill), without consuming.
    pub fn available(&self) -> f64 {
        let mut state = self.state.lock();
        self.refill(&mut state);
        state.tokens
    }

    fn refill(&self, state: &mut BucketState) {
        let now = Instant::now();
        let elapsed = now.saturating_duration_since(state.last_refill).as_secs_f64();
        state.last_refill = now;
        state.tokens = (state.tokens + elapsed * self.refill_per_sec).min(self.capacity);
    }
}

/// Admission check used by every adapter before its remote call.
pub(crate) fn admit(bucket: &TokenBucket, provider: &str) -> Result<()> {
    if bucket.consume() {
        return Ok(());
    }
    debug!(provider, "token bucket empty");
    metrics::counter!(telemetry::RATE_LIMITED_TOTAL, "provider" => provider.to_owned())
        .increment(1);
    Err(SentiqError::RateLimited {
        provider: provider.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_minute_sizes_bucket() {
        let bucket = TokenBucket::per_minute(120);
        assert_eq!(bucket.capacity(), 120.0);
        assert_eq!(bucket.refill_per_sec(), 2.0);
    }

    #[test]
    fn starts_full() {
        let bucket = TokenBucket::new(3.0, 0.0);
        assert!(bucket.consume());
        assert!(bucket.consume());
        assert!(bucket.consume());
        assert!(!bucket.consume());
    }

    #[test]
    fn consume_n_is_all_or_nothing() {
        let bucket = TokenBucket::new(2.0, 0.0);
        assert!(!bucket.consume_n(3.0));
        assert_eq!(bucket.available(), 2.0);
        assert!(bucket.consume_n(2.0));
        assert_eq!(bucket.available(), 0.0);
    }

    #[test]
    fn admit_maps_denial_to_rate_limited() {
        let bucket = TokenBucket::new(1.0, 0.0);
        assert!(admit(&bucket, "gemini").is_ok());
        let err = admit(&bucket, "gemini").unwrap_err();
        assert!(matches!(err, SentiqError::RateLimited { ref provider } if provider == "gemini"));
    }

    #[tokio::test(start_paused = true)]
    async fn refill_is_capped_at_capacity() {
        let bucket = TokenBucket::new(5.0, 10.0);
        assert!(bucket.consume_n(5.0));
        tokio::time::advance(std::time::Duration::from_secs(60)).await;
        assert_eq!(bucket.available(), 5.0);
    }
}
