// src/services/cache.rs
use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub keys: usize,
    pub hits: u64,
    pub misses: u64,
}

/// In-memory cache whose entries expire `ttl` after insertion.
pub struct TtlCache<V> {
    ttl: Duration,
    entries: RwLock<HashMap<String, (Instant, V)>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        TtlCache {
            ttl,
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn fresh(&self, stored_at: Instant) -> bool {
        stored_at.elapsed() < self.ttl
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        let found = {
            let entries = self.entries.read().await;
            entries
                .get(key)
                .filter(|(stored_at, _)| self.fresh(*stored_at))
                .map(|(_, value)| value.clone())
        };

        match found {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                let mut entries = self.entries.write().await;
                if let Some((stored_at, _)) = entries.get(key) {
                    if !self.fresh(*stored_at) {
                        debug!("Evicting expired cache entry {}", key);
                        entries.remove(key);
                    }
                }
                None
            }
        }
    }

    /// Stores `value` and sweeps every expired entry.
    pub async fn insert(&self, key: impl Into<String>, value: V) {
        let mut entries = self.entries.write().await;
        self.sweep(&mut entries);
        entries.insert(key.into(), (Instant::now(), value));
    }

    fn sweep(&self, entries: &mut HashMap<String, (Instant, V)>) -> usize {
        let before = entries.len();
        entries.retain(|_, (stored_at, _)| self.fresh(*stored_at));
        let removed = before - entries.len();
        if removed > 0 {
            debug!("Evicted {} expired cache entries", removed);
        }
        removed
    }

    /// Drops expired entries, returning how many were removed.
    pub async fn clear_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        self.sweep(&mut entries)
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        let entries = self.entries.read().await;
        CacheStats {
            keys: entries.values().filter(|(at, _)| self.fresh(*at)).count(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
