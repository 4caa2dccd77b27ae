//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use sentiq::cache::CacheConfig;
use sentiq::telemetry;
use sentiq::{CallContext, Gateway, GenerationRequest, Result, SentiqError, TextProvider};

// ============================================================================
// Mock providers
// ============================================================================

struct EchoProvider;

#[async_trait]
impl TextProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    fn default_model(&self) -> &str {
        "echo-1"
    }

    async fn invoke(&self, prompt: &str, _model: &str, _ctx: &CallContext) -> Result<String> {
        Ok(prompt.to_string())
    }
}

struct FailingProvider;

#[async_trait]
impl TextProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    fn default_model(&self) -> &str {
        "fail-1"
    }

    async fn invoke(&self, _prompt: &str, _model: &str, _ctx: &CallContext) -> Result<String> {
        Err(SentiqError::Http("connection refused".into()))
    }
}

// ============================================================================
// Snapshot helpers
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

/// Sum all counter values matching a given metric name.
fn counter_total(snapshot: &SnapshotVec, name: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Sum counter values for `name` whose `label` equals `value`.
fn counter_with_label(snapshot: &SnapshotVec, name: &str, label: &str, value: &str) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| {
            key.kind() == MetricKind::Counter
                && key.key().name() == name
                && key
                    .key()
                    .labels()
                    .any(|l| l.key() == label && l.value() == value)
        })
        .map(|(_, _, _, v)| match v {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

fn has_histogram(snapshot: &SnapshotVec, name: &str) -> bool {
    snapshot
        .iter()
        .any(|(key, _, _, _)| key.kind() == MetricKind::Histogram && key.key().name() == name)
}

fn gateway(primary: Arc<dyn TextProvider>, secondary: Arc<dyn TextProvider>) -> Gateway {
    Gateway::builder()
        .primary(primary)
        .secondary(secondary)
        .cache_config(CacheConfig::memory())
        .build()
        .unwrap()
}

/// Runs `requests` through `gw` inside a local recorder scope.
///
/// `block_in_place` keeps the sync `with_local_recorder` closure on the
/// current thread while `block_on` drives the async work.
fn record(gw: &Gateway, requests: &[GenerationRequest]) -> SnapshotVec {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                for request in requests {
                    gw.generate(request, &CallContext::new()).await;
                }
            })
        })
    });

    snapshotter.snapshot().into_vec()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn successful_generation_records_metrics() {
    let gw = gateway(Arc::new(EchoProvider), Arc::new(FailingProvider));
    let snapshot = record(&gw, &[GenerationRequest::new("hello", "general")]);

    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 1);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "status", "ok"),
        1
    );
    assert!(has_histogram(&snapshot, telemetry::REQUEST_DURATION_SECONDS));
    assert_eq!(counter_total(&snapshot, telemetry::CACHE_MISSES_TOTAL), 1);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::GENERATIONS_TOTAL, "outcome", "ok"),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn failover_records_one_request_per_attempt() {
    let gw = gateway(Arc::new(FailingProvider), Arc::new(EchoProvider));
    let snapshot = record(&gw, &[GenerationRequest::new("hello", "general")]);

    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 2);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "provider", "failing"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::REQUESTS_TOTAL, "status", "error"),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn cache_hit_records_no_provider_request() {
    let gw = gateway(Arc::new(EchoProvider), Arc::new(EchoProvider));
    let request = GenerationRequest::new("hello", "ats_analysis");
    let snapshot = record(&gw, &[request.clone(), request]);

    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 1);
    assert_eq!(
        counter_with_label(&snapshot, telemetry::CACHE_HITS_TOTAL, "task", "ats_analysis"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::GENERATIONS_TOTAL, "outcome", "cache_hit"),
        1
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn total_failure_and_simulation_outcomes() {
    let gw = gateway(Arc::new(FailingProvider), Arc::new(FailingProvider));
    let snapshot = record(
        &gw,
        &[
            GenerationRequest::new("hello", "general"),
            GenerationRequest::new("hello", "general").simulate(true),
        ],
    );

    assert_eq!(
        counter_with_label(&snapshot, telemetry::GENERATIONS_TOTAL, "outcome", "failed"),
        1
    );
    assert_eq!(
        counter_with_label(&snapshot, telemetry::GENERATIONS_TOTAL, "outcome", "simulated"),
        1
    );
    // Simulation never reaches a provider.
    assert_eq!(counter_total(&snapshot, telemetry::REQUESTS_TOTAL), 2);
}
