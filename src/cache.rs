//! Resolution caching.
//!
//! This module provides [`ResolutionCache`], an LRU cache from normalized path
//! to the [`Resolution`] the precedence resolver produced for it. It is gated
//! behind the `cache` feature flag and uses the [`lru`] crate internally.
//!
//! A resolution depends only on the precedence table (fixed at construction)
//! and the route table, so the router clears the cache on every
//! [`add_route`](crate::Router::add_route).
//!
//! [`CacheStats`] tracks hits, misses, and invalidations.
//!
//! # Examples
//!
//! ```
//! use shell_navigator::cache::ResolutionCache;
//! use shell_navigator::Resolution;
//!
//! let mut cache = ResolutionCache::new();
//! cache.insert("/missing".to_string(), Resolution::Unmatched);
//!
//! assert!(matches!(cache.get("/missing"), Some(Resolution::Unmatched)));
//! assert_eq!(cache.stats().hits, 1);
//! ```

use crate::resolve::Resolution;
use crate::{debug_log, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Counters tracking cache hit/miss rates and invalidations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups answered from the cache.
    pub hits: usize,
    /// Number of lookups that had to resolve.
    pub misses: usize,
    /// Number of full invalidations (via [`ResolutionCache::clear`]).
    pub invalidations: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache of path resolutions. Default capacity is 256 entries.
#[derive(Debug)]
pub struct ResolutionCache {
    entries: LruCache<String, Resolution>,
    stats: CacheStats,
}

impl ResolutionCache {
    const DEFAULT_CAPACITY: usize = 256;

    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Look up the cached resolution for `path`. Updates hit/miss stats.
    pub fn get(&mut self, path: &str) -> Option<Resolution> {
        if let Some(resolution) = self.entries.get(path) {
            self.stats.hits += 1;
            trace_log!("Resolution cache hit for '{}'", path);
            Some(resolution.clone())
        } else {
            self.stats.misses += 1;
            trace_log!("Resolution cache miss for '{}'", path);
            None
        }
    }

    /// Store the resolution for `path`, evicting the least recently used.
    pub fn insert(&mut self, path: String, resolution: Resolution) {
        self.entries.push(path, resolution);
    }

    /// Drop every entry and count an invalidation.
    pub fn clear(&mut self) {
        let removed = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Resolution cache cleared: {} entries removed ({} invalidations, hit rate {:.1}%)",
            removed,
            self.stats.invalidations,
            self.stats.hit_rate() * 100.0
        );
    }

    /// Current statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Reset all counters to zero.
    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new()
    }
}
