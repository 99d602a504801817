//! Domain Entities

use std::path::PathBuf;
use tokio::time::{Duration, Instant};

/// A finalized PNG under the public output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    /// File name relative to the output directory
    pub file_name: String,
    /// Full path on disk
    pub path: PathBuf,
}

impl StoredArtifact {
    pub fn new(file_name: String, path: PathBuf) -> Self {
        Self { file_name, path }
    }
}

/// A cached swap result and the instant it stops being served
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub artifact: StoredArtifact,
    pub expires_at: Instant,
}

impl CacheEntry {
    pub fn new(artifact: StoredArtifact, ttl: Duration) -> Self {
        Self {
            artifact,
            expires_at: Instant::now() + ttl,
        }
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}
