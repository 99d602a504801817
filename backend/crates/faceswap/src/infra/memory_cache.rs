//! In-memory result cache
//!
//! Bounded, TTL-expiring LRU map from pair key to stored artifact.
//! Process-lifetime only. Expired entries are dropped when read; when full,
//! the least recently used entry makes room.

use std::num::NonZeroUsize;

use lru::LruCache;
use tokio::sync::Mutex;
use tokio::time::Duration;

use crate::domain::entities::{CacheEntry, StoredArtifact};
use crate::domain::repository::ResultCache;
use crate::domain::value_objects::PairKey;

/// In-memory implementation of [`ResultCache`]
#[derive(Debug)]
pub struct InMemoryResultCache {
    ttl: Duration,
    entries: Mutex<LruCache<PairKey, CacheEntry>>,
}

impl InMemoryResultCache {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            ttl,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of stored entries, including expired ones not yet read
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl ResultCache for InMemoryResultCache {
    async fn get(&self, key: &PairKey) -> Option<StoredArtifact> {
        let mut entries = self.entries.lock().await;
        let entry = entries.get(key)?;
        if !entry.is_expired() {
            return Some(entry.artifact.clone());
        }
        entries.pop(key);
        None
    }

    async fn put(&self, key: PairKey, artifact: StoredArtifact) {
        let mut entries = self.entries.lock().await;
        let displaced = entries.push(key.clone(), CacheEntry::new(artifact, self.ttl));
        if let Some((evicted, _)) = displaced.filter(|(old, _)| *old != key) {
            tracing::debug!(pair_key = %evicted, "Evicted least recently used cache entry");
        }
    }
}
