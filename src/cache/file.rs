//! Persistent, file-per-key cache backend.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use super::{CacheBackend, CacheKey};
use crate::Result;

/// Directory-backed cache. Each entry lives in `<dir>/<hex key>`.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// reader sees either the old value or the new one, never a torn write.
/// Entries survive process restarts.
#[derive(Debug)]
pub struct FileCache {
    dir: PathBuf,
    tmp_seq: AtomicU64,
}

impl FileCache {
    /// Use `dir` as the store. The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            tmp_seq: AtomicU64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.as_str())
    }

    fn tmp_path(&self, key: &CacheKey) -> PathBuf {
        let seq = self.tmp_seq.fetch_add(1, Ordering::Relaxed);
        self.dir
            .join(format!(".{}.{}.{seq}.tmp", key.as_str(), std::process::id()))
    }
}

#[async_trait]
impl CacheBackend for FileCache {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, key: &CacheKey) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.entry_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, key: &CacheKey, value: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let tmp = self.tmp_path(key);
        if let Err(e) = tokio::fs::write(&tmp, value).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp, self.entry_path(key)).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}
