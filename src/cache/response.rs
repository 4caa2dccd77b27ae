//! Fail-soft response cache used by the gateway.
//!
//! [`ResponseCache`] is a best-effort optimisation, never a correctness
//! dependency. Every backend error is logged, counted and then treated as
//! a miss (on `get`) or dropped (on `put`).
//!
//! # No single-flight
//!
//! Two concurrent requests for the same key can both miss before either
//! writes, and both will reach a provider. The later `put` simply
//! overwrites the earlier one. This is an accepted limitation.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use super::{CacheBackend, CacheKey, FileCache, MemoryCache};
use crate::telemetry;
use crate::types::Task;

/// Default directory for the persistent cache.
pub const DEFAULT_CACHE_PATH: &str = "sentiq_cache";

/// Which backend to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackendKind {
    /// Persistent [`FileCache`] under [`CacheConfig::path`].
    #[default]
    File,
    /// Process-local [`MemoryCache`].
    Memory,
    /// No caching at all.
    Disabled,
}

/// Configuration for the response cache.
///
/// ```rust
/// # use sentiq::cache::{CacheConfig, CacheBackendKind};
/// let config = CacheConfig::new().path("/var/cache/sentiq");
/// assert_eq!(config.backend, CacheBackendKind::File);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackendKind,
    /// Directory for the file backend. Default: `sentiq_cache`.
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
}

fn default_cache_path() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_PATH)
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::default(),
            path: default_cache_path(),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persistent cache under `path`.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.backend = CacheBackendKind::File;
        self.path = path.into();
        self
    }

    /// In-memory cache.
    pub fn memory() -> Self {
        Self {
            backend: CacheBackendKind::Memory,
            ..Self::default()
        }
    }

    /// No cache.
    pub fn disabled() -> Self {
        Self {
            backend: CacheBackendKind::Disabled,
            ..Self::default()
        }
    }
}

/// Gateway-facing cache handle.
#[derive(Clone)]
pub struct ResponseCache {
    backend: Option<Arc<dyn CacheBackend>>,
}

impl ResponseCache {
    /// Wrap an existing backend.
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// A cache that always misses and discards writes.
    pub fn disabled() -> Self {
        Self { backend: None }
    }

    /// Build the backend described by `config`.
    pub fn from_config(config: &CacheConfig) -> Self {
        match config.backend {
            CacheBackendKind::File => Self::new(Arc::new(FileCache::new(config.path.clone()))),
            CacheBackendKind::Memory => Self::new(Arc::new(MemoryCache::new())),
            CacheBackendKind::Disabled => Self::disabled(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Look up `key`. Backend errors are reported as a miss.
    pub async fn get(&self, key: &CacheKey, task: &Task) -> Option<String> {
        let backend = self.backend.as_ref()?;
        match backend.get(key).await {
            Ok(Some(value)) => {
                metrics::counter!(telemetry::CACHE_HITS_TOTAL, "task" => task.to_string())
                    .increment(1);
                Some(value)
            }
            Ok(None) => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "task" => task.to_string())
                    .increment(1);
                None
            }
            Err(e) => {
                warn!(backend = backend.name(), %key, error = %e, "cache read failed, treating as miss");
                metrics::counter!(telemetry::CACHE_ERRORS_TOTAL, "op" => "get").increment(1);
                None
            }
        }
    }

    /// Store `value` under `key`, overwriting. Backend errors are dropped.
    pub async fn put(&self, key: &CacheKey, value: &str) {
        let Some(backend) = self.backend.as_ref() else {
            return;
        };
        match backend.put(key, value).await {
            Ok(()) => debug!(backend = backend.name(), %key, "cached response"),
            Err(e) => {
                warn!(backend = backend.name(), %key, error = %e, "cache write failed");
                metrics::counter!(telemetry::CACHE_ERRORS_TOTAL, "op" => "put").increment(1);
            }
        }
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("backend", &self.backend.as_ref().map(|b| b.name().to_string()))
            .finish()
    }
}
