//! In-memory file cache
//!
//! Resolved path to file bytes. Entries are added on the first successful
//! read and live as long as the cache; there is no eviction or invalidation.

use crate::logger;
use hyper::body::Bytes;
use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Counters exposed for diagnostics and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from memory
    pub hits: u64,
    /// Loader invocations, i.e. disk reads attempted
    pub loads: u64,
}

#[derive(Debug, Default)]
pub struct FileCache {
    entries: RwLock<HashMap<PathBuf, Bytes>>,
    hits: AtomicU64,
    loads: AtomicU64,
}

impl FileCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, path: &Path) -> Option<Bytes> {
        self.entries.read().await.get(path).cloned()
    }

    /// Store `data` under `path`, replacing any previous entry
    pub async fn insert(&self, path: PathBuf, data: Bytes) {
        self.entries.write().await.insert(path, data);
    }

    pub async fn contains(&self, path: &Path) -> bool {
        self.entries.read().await.contains_key(path)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Return the cached bytes for `path`, loading and storing them on a miss
    ///
    /// The lock is not held while `load` runs. Concurrent misses for the same
    /// path each call `load` and the last insert wins; the bytes are the same
    /// unless the file changed in between. Load errors are returned and leave
    /// the cache untouched.
    pub async fn get_or_load<F, Fut>(&self, path: &Path, load: F) -> io::Result<Bytes>
    where
        F: FnOnce(PathBuf) -> Fut,
        Fut: Future<Output = io::Result<Vec<u8>>>,
    {
        if let Some(data) = self.get(path).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            logger::log_cache_hit(path);
            return Ok(data);
        }

        self.loads.fetch_add(1, Ordering::Relaxed);
        let data = Bytes::from(load(path.to_path_buf()).await?);
        self.insert(path.to_path_buf(), data.clone()).await;
        logger::log_cache_store(path, data.len());
        Ok(data)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
        }
    }
}
