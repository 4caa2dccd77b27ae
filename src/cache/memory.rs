//! In-process cache backend.

use async_trait::async_trait;
use moka::future::Cache;

use super::{CacheBackend, CacheKey};
use crate::Result;

/// Process-local cache on top of moka.
///
/// Built without a capacity bound or TTL, matching the persistent store's
/// semantics; contents are lost when the process exits.
pub struct MemoryCache {
    entries: Cache<CacheKey, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().build(),
        }
    }

    /// Number of entries currently held.
    ///
    /// Flushes moka's pending writes first, so an entry counts as soon as
    /// its `put` has returned.
    pub async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheBackend for MemoryCache {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &CacheKey) -> Result<Option<String>> {
        Ok(self.entries.get(key).await)
    }

    async fn put(&self, key: &CacheKey, value: &str) -> Result<()> {
        self.entries.insert(key.clone(), value.to_string()).await;
        Ok(())
    }
}
