//! In-memory byte-budgeted LRU cache for decoded images.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::domain::entities::RequestKey;

/// Default budget for decoded pixel data (32 MiB).
pub const DEFAULT_MEMORY_BUDGET: usize = 32 * 1024 * 1024;

/// Bounded cache of decoded images, shared between the worker pool and the
/// interactive thread.
///
/// The bound is on aggregate decoded bytes, not entry count: a `put` evicts
/// least-recently-used entries until the budget holds again. An image larger
/// than the entire budget is never stored. Failed decodes store nothing, so a
/// later re-request retries from scratch.
pub struct MemoryImageCache {
    inner: Mutex<Inner>,
    budget: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

struct Inner {
    entries: LruCache<RequestKey, Arc<image::DynamicImage>>,
    bytes: usize,
}

/// Decoded footprint of an image in bytes.
fn cost_of(image: &image::DynamicImage) -> usize {
    image.as_bytes().len()
}

impl MemoryImageCache {
    /// Creates a cache bounded to `budget_bytes` of decoded pixel data.
    #[must_use]
    pub fn new(budget_bytes: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: LruCache::unbounded(),
                bytes: 0,
            }),
            budget: budget_bytes,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Looks up an image, promoting it to most-recently-used.
    pub fn get(&self, key: &RequestKey) -> Option<Arc<image::DynamicImage>> {
        let mut inner = self.inner.lock();
        if let Some(img) = inner.entries.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "memory cache hit");
            Some(img.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "memory cache miss");
            None
        }
    }

    /// Stores an image, evicting older entries to respect the byte budget.
    pub fn put(&self, key: RequestKey, image: Arc<image::DynamicImage>) {
        let cost = cost_of(&image);
        if cost > self.budget {
            debug!(key = %key, cost, budget = self.budget, "image exceeds whole budget, not cached");
            return;
        }

        let mut inner = self.inner.lock();
        if let Some(old) = inner.entries.put(key.clone(), image) {
            inner.bytes -= cost_of(&old);
        }
        inner.bytes += cost;

        while inner.bytes > self.budget {
            let Some((evicted_key, evicted)) = inner.entries.pop_lru() else {
                break;
            };
            inner.bytes -= cost_of(&evicted);
            debug!(key = %evicted_key, "evicted from memory cache");
        }
        trace!(key = %key, bytes = inner.bytes, "stored image in memory cache");
    }

    /// Drops every entry. Also used as the emergency response to a
    /// decode-time allocation failure.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.bytes = 0;
        debug!("cleared memory image cache");
    }

    /// Current number of cached images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Aggregate decoded bytes currently held.
    #[must_use]
    pub fn current_bytes(&self) -> usize {
        self.inner.lock().bytes
    }

    /// Returns cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: inner.entries.len(),
            bytes: inner.bytes,
        }
    }
}

impl Default for MemoryImageCache {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_BUDGET)
    }
}

impl std::fmt::Debug for MemoryImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryImageCache")
            .field("budget", &self.budget)
            .finish_non_exhaustive()
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of lookup hits.
    pub hits: u64,
    /// Number of lookup misses.
    pub misses: u64,
    /// Current number of cached images.
    pub entries: usize,
    /// Aggregate decoded bytes held.
    pub bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SizeClass;

    fn key(url: &str) -> RequestKey {
        RequestKey::new(url, SizeClass::Document)
    }

    fn rgb(width: u32, height: u32) -> Arc<image::DynamicImage> {
        Arc::new(image::DynamicImage::new_rgb8(width, height))
    }

    #[test]
    fn put_then_get() {
        let cache = MemoryImageCache::new(1024 * 1024);
        cache.put(key("a"), rgb(10, 10));

        let hit = cache.get(&key("a"));
        assert!(hit.is_some());
        assert_eq!(hit.unwrap().width(), 10);
        assert!(cache.get(&key("b")).is_none());
    }

    #[test]
    fn byte_budget_evicts_lru() {
        // 10x10 rgb8 = 300 bytes; budget holds two entries.
        let cache = MemoryImageCache::new(700);

        cache.put(key("a"), rgb(10, 10));
        cache.put(key("b"), rgb(10, 10));
        cache.put(key("c"), rgb(10, 10));

        assert!(cache.get(&key("a")).is_none());
        assert!(cache.get(&key("b")).is_some());
        assert!(cache.get(&key("c")).is_some());
        assert!(cache.current_bytes() <= 700);
    }

    #[test]
    fn get_promotes_recency() {
        let cache = MemoryImageCache::new(700);

        cache.put(key("a"), rgb(10, 10));
        cache.put(key("b"), rgb(10, 10));
        assert!(cache.get(&key("a")).is_some());
        cache.put(key("c"), rgb(10, 10));

        // "b" was least recently used once "a" was touched.
        assert!(cache.get(&key("b")).is_none());
        assert!(cache.get(&key("a")).is_some());
    }

    #[test]
    fn oversized_entry_is_rejected() {
        let cache = MemoryImageCache::new(100);
        cache.put(key("huge"), rgb(100, 100));

        assert!(cache.get(&key("huge")).is_none());
        assert_eq!(cache.current_bytes(), 0);
    }

    #[test]
    fn replacing_a_key_keeps_accounting_exact() {
        let cache = MemoryImageCache::new(10_000);
        cache.put(key("a"), rgb(10, 10));
        cache.put(key("a"), rgb(20, 10));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.current_bytes(), 20 * 10 * 3);
    }

    #[test]
    fn clear_empties_everything() {
        let cache = MemoryImageCache::new(1024 * 1024);
        cache.put(key("a"), rgb(10, 10));
        cache.put(key("b"), rgb(10, 10));

        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.current_bytes(), 0);
        assert!(cache.get(&key("a")).is_none());
    }

    #[test]
    fn stats_track_hits_and_misses() {
        let cache = MemoryImageCache::new(1024 * 1024);
        cache.put(key("a"), rgb(10, 10));

        let _ = cache.get(&key("a"));
        let _ = cache.get(&key("missing"));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.bytes, 300);
    }
}
