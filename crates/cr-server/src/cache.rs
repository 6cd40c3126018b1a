//! In-memory cache of successful resolutions, keyed by normalized URL.
//!
//! Expired entries are evicted lazily on lookup. Failures are never stored.

use std::time::{Duration, Instant};

use cr_core::ResolvedVideo;
use dashmap::DashMap;

struct CachedVideo {
    video: ResolvedVideo,
    stored_at: Instant,
}

pub struct ResultCache {
    entries: DashMap<String, CachedVideo>,
    ttl: Duration,
    enabled: bool,
}

impl ResultCache {
    pub fn new(enabled: bool, ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            enabled: enabled && !ttl.is_zero(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cached video for `key`, if present and fresh.
    pub fn get(&self, key: &str) -> Option<ResolvedVideo> {
        if !self.enabled {
            return None;
        }

        let ttl = self.ttl;
        if self
            .entries
            .remove_if(key, |_, entry| entry.stored_at.elapsed() >= ttl)
            .is_some()
        {
            tracing::debug!("Evicted expired cache entry for {key}");
            return None;
        }

        self.entries.get(key).map(|entry| entry.video.clone())
    }

    /// Store `video` under `key`, sweeping out every expired entry first.
    pub fn insert(&self, key: impl Into<String>, video: ResolvedVideo) {
        if !self.enabled {
            return;
        }

        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        let swept = before.saturating_sub(self.entries.len());
        if swept > 0 {
            tracing::debug!("Swept {swept} expired cache entries");
        }

        self.entries.insert(
            key.into(),
            CachedVideo {
                video,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
