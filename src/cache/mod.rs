//! Content-addressed response cache.
//!
//! - [`CacheKey`]: SHA-256 digest of (task, resolved model, original prompt).
//! - [`CacheBackend`]: storage seam. Two implementations ship:
//!   [`FileCache`] (persistent, survives restarts) and [`MemoryCache`]
//!   (process-local, mainly for tests and ephemeral deployments).
//! - [`ResponseCache`]: what the gateway talks to. Wraps a backend and
//!   swallows every backend error, so cache trouble degrades to a miss and
//!   never fails a generation.
//!
//! The store is unbounded with no TTL and no eviction. A `put` overwrites
//! any earlier value for the same key. Nothing in this crate deletes entries.

pub mod file;
pub mod memory;
pub mod response;

pub use file::FileCache;
pub use memory::MemoryCache;
pub use response::{CacheBackendKind, CacheConfig, ResponseCache};

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::Result;
use crate::types::Task;

/// Deterministic digest identifying a logical generation request.
///
/// Computed from the task tag, the resolved model and the prompt exactly
/// as the caller supplied it (before any strict-JSON wrapping). Rendered
/// as 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Compute the key for a (task, model, prompt) triple.
    ///
    /// Each field is hashed behind its little-endian `u64` byte length, so
    /// distinct triples never feed the same bytes to the digest.
    pub fn compute(task: &Task, model: &str, prompt: &str) -> Self {
        let mut hasher = Sha256::new();
        for field in [task.as_str(), model, prompt] {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage for cached responses.
///
/// Implementations must be safe for concurrent use; no ordering between
/// concurrent `get`/`put` on the same key is required.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Backend name for logging/debugging.
    fn name(&self) -> &str;

    /// Look up a cached response. `Ok(None)` is a miss.
    async fn get(&self, key: &CacheKey) -> Result<Option<String>>;

    /// Store `value`, replacing any earlier value for `key`.
    async fn put(&self, key: &CacheKey, value: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_deterministic() {
        let k1 = CacheKey::compute(&Task::ResumeGeneration, "gemini-2.5-flash", "hello");
        let k2 = CacheKey::compute(&Task::ResumeGeneration, "gemini-2.5-flash", "hello");
        assert_eq!(k1, k2);
        assert_eq!(k1.as_str().len(), 64);
        assert!(k1.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn cache_key_differs_on_task() {
        let k1 = CacheKey::compute(&Task::ResumeGeneration, "m", "hello");
        let k2 = CacheKey::compute(&Task::AtsAnalysis, "m", "hello");
        assert_ne!(k1, k2);
    }

    #[test]
    fn cache_key_differs_on_model() {
        let k1 = CacheKey::compute(&Task::General, "model-a", "hello");
        let k2 = CacheKey::compute(&Task::General, "model-b", "hello");
        assert_ne!(k1, k2);
    }

    #[test]
    fn cache_key_differs_on_prompt() {
        let k1 = CacheKey::compute(&Task::General, "m", "hello");
        let k2 = CacheKey::compute(&Task::General, "m", "world");
        assert_ne!(k1, k2);
    }

    #[test]
    fn cache_key_matches_known_digest() {
        let key = CacheKey::compute(&Task::General, "m", "hello");
        let mut hasher = Sha256::new();
        hasher.update(7u64.to_le_bytes());
        hasher.update(b"general");
        hasher.update(1u64.to_le_bytes());
        hasher.update(b"m");
        hasher.update(5u64.to_le_bytes());
        hasher.update(b"hello");
        assert_eq!(key.as_str(), format!("{:x}", hasher.finalize()));
    }

    #[test]
    fn cache_key_field_boundaries_are_unambiguous() {
        let k1 = CacheKey::compute(&Task::General, "m", "b|c");
        let k2 = CacheKey::compute(&Task::General, "m|b", "c");
        assert_ne!(k1, k2);

        let k1 = CacheKey::compute(&Task::Other("x|m".into()), "y", "p");
        let k2 = CacheKey::compute(&Task::Other("x".into()), "m|y", "p");
        assert_ne!(k1, k2);

        let k1 = CacheKey::compute(&Task::General, "ab", "c");
        let k2 = CacheKey::compute(&Task::General, "a", "bc");
        assert_ne!(k1, k2);
    }

    #[test]
    fn unknown_task_tag_keys_by_its_text() {
        let k1 = CacheKey::compute(&Task::from("summarise"), "m", "p");
        let k2 = CacheKey::compute(&Task::Other("summarise".into()), "m", "p");
        assert_eq!(k1, k2);
    }
}
