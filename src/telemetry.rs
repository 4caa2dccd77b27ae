//! Telemetry metric name constants.
//!
//! Centralised metric names for sentiq operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `sentiq_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider`: adapter name (e.g. "gemini", "groq")
//! - `status`: outcome of a provider call: "ok" or "error"
//! - `task`: task tag of the request
//! - `outcome`: how a generation ended: "simulated", "cache_hit", "ok", "failed"

/// Total provider calls attempted by the gateway.
///
/// Labels: `provider`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "sentiq_requests_total";

/// Provider call duration in seconds.
///
/// Labels: `provider`.
pub const REQUEST_DURATION_SECONDS: &str = "sentiq_request_duration_seconds";

/// Attempts rejected by the token bucket.
///
/// Labels: `provider`.
pub const RATE_LIMITED_TOTAL: &str = "sentiq_rate_limited_total";

/// Total response cache hits.
///
/// Labels: `task`.
pub const CACHE_HITS_TOTAL: &str = "sentiq_cache_hits_total";

/// Total response cache misses.
///
/// Labels: `task`.
pub const CACHE_MISSES_TOTAL: &str = "sentiq_cache_misses_total";

/// Cache backend errors swallowed by the gateway.
///
/// Labels: `op` ("get" | "put").
pub const CACHE_ERRORS_TOTAL: &str = "sentiq_cache_errors_total";

/// Completed `generate` calls.
///
/// Labels: `outcome`.
pub const GENERATIONS_TOTAL: &str = "sentiq_generations_total";
