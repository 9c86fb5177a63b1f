// SPDX-License-Identifier: MPL-2.0
//! Image prefetch cache for faster navigation.
//!
//! This module provides background preloading of images adjacent to the
//! current selection, reducing perceived latency when navigating the lightbox.
//!
//! # Design
//!
//! - **LRU eviction**: Least recently used images are evicted first
//! - **Memory-bounded**: Total cache size limited by configurable byte limit
//! - **Path-keyed**: Images indexed by their file path
//! - **Async loading**: Prefetching runs in background without blocking UI
//!
//! # Usage
//!
//! ```ignore
//! let mut cache = PrefetchCache::new(config);
//!
//! // Check if image is already cached
//! if let Some(image_data) = cache.get(&path) {
//!     // Use cached image
//! }
//!
//! // Find which neighbors still need loading
//! let pending = cache.paths_to_prefetch(&neighbors);
//! ```

use crate::error::Result;
use crate::media::ImageData;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default cache size in megabytes.
/// Allows ~8 full HD images (8 MB each) or many smaller ones.
pub const DEFAULT_CACHE_MAX_MEGABYTES: u64 = 64;

/// Minimum cache size in megabytes.
pub const MIN_CACHE_MAX_MEGABYTES: u64 = 8;

/// Maximum cache size in megabytes.
pub const MAX_CACHE_MAX_MEGABYTES: u64 = 128;

/// Default maximum number of images to cache.
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 16;

/// Minimum images to cache.
pub const MIN_CACHE_MAX_ENTRIES: usize = 4;

/// Maximum images to cache.
pub const MAX_CACHE_MAX_ENTRIES: usize = 32;

/// Default number of images to prefetch in each direction.
pub const DEFAULT_PREFETCH_COUNT: usize = 2;

const BYTES_PER_MEGABYTE: usize = 1024 * 1024;

/// Configuration for the prefetch cache.
#[derive(Debug, Clone, Copy)]
pub struct PrefetchConfig {
    /// Maximum cache size in bytes.
    pub max_bytes: usize,

    /// Maximum number of images to cache.
    pub max_entries: usize,

    /// Number of images to prefetch in each direction (next/previous).
    pub prefetch_count: usize,

    /// Whether prefetching is enabled.
    pub enabled: bool,
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_CACHE_MAX_MEGABYTES,
            DEFAULT_CACHE_MAX_ENTRIES,
            DEFAULT_PREFETCH_COUNT,
        )
    }
}

impl PrefetchConfig {
    /// Creates a new prefetch configuration with specified limits.
    ///
    /// Values outside the supported range are clamped.
    #[must_use]
    pub fn new(max_megabytes: u64, max_entries: usize, prefetch_count: usize) -> Self {
        let megabytes = max_megabytes.clamp(MIN_CACHE_MAX_MEGABYTES, MAX_CACHE_MAX_MEGABYTES);
        Self {
            max_bytes: megabytes as usize * BYTES_PER_MEGABYTE,
            max_entries: max_entries.clamp(MIN_CACHE_MAX_ENTRIES, MAX_CACHE_MAX_ENTRIES),
            prefetch_count,
            enabled: true,
        }
    }

    /// Builds a runtime configuration from the `[cache]` settings section,
    /// filling in defaults for unset values.
    #[must_use]
    pub fn from_cache_config(cache: &crate::config::CacheConfig) -> Self {
        if !cache.enabled.unwrap_or(true) {
            return Self::disabled();
        }
        Self::new(
            cache.max_megabytes.unwrap_or(DEFAULT_CACHE_MAX_MEGABYTES),
            cache.max_entries.unwrap_or(DEFAULT_CACHE_MAX_ENTRIES),
            cache.prefetch_count.unwrap_or(DEFAULT_PREFETCH_COUNT),
        )
    }

    /// Creates a disabled prefetch configuration.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

/// Cached image entry with metadata.
#[derive(Debug, Clone)]
struct CacheEntry {
    /// The loaded image data.
    image: Arc<ImageData>,

    /// Size of this entry in bytes.
    size_bytes: usize,
}

impl CacheEntry {
    fn new(image: ImageData) -> Self {
        let size_bytes = image.byte_len();
        Self {
            image: Arc::new(image),
            size_bytes,
        }
    }
}

/// Statistics about prefetch cache performance.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefetchStats {
    /// Number of images currently in cache.
    pub image_count: usize,

    /// Total bytes currently used by cached images.
    pub total_bytes: usize,

    /// Number of cache hits (image found).
    pub hits: u64,

    /// Number of cache misses (image not found).
    pub misses: u64,

    /// Number of images evicted due to limits.
    pub evictions: u64,

    /// Number of images inserted.
    pub insertions: u64,
}

impl PrefetchStats {
    /// Returns the cache hit rate as a percentage (0.0 - 100.0).
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// LRU cache for prefetched images.
///
/// Provides memory-bounded caching with LRU eviction policy.
/// Optimized for navigation between adjacent images.
pub struct PrefetchCache {
    /// LRU cache mapping file paths to image entries.
    cache: LruCache<PathBuf, CacheEntry>,

    /// Cache configuration.
    config: PrefetchConfig,

    /// Current total size in bytes.
    current_bytes: usize,

    /// Performance statistics.
    stats: PrefetchStats,
}

impl PrefetchCache {
    /// Creates a new prefetch cache with the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if `DEFAULT_CACHE_MAX_ENTRIES` is zero, which would indicate a
    /// build configuration error.
    #[must_use]
    pub fn new(config: PrefetchConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries).unwrap_or(
            NonZeroUsize::new(DEFAULT_CACHE_MAX_ENTRIES)
                .expect("DEFAULT_CACHE_MAX_ENTRIES must be non-zero"),
        );

        Self {
            cache: LruCache::new(capacity),
            config,
            current_bytes: 0,
            stats: PrefetchStats::default(),
        }
    }

    /// Creates a new prefetch cache with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(PrefetchConfig::default())
    }

    /// Returns whether prefetching is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Returns the number of images to prefetch in each direction.
    #[must_use]
    pub fn prefetch_count(&self) -> usize {
        self.config.prefetch_count
    }

    /// Inserts an image into the cache.
    ///
    /// Returns `true` if the image was inserted, `false` if caching is disabled
    /// or the image is too large.
    pub fn insert(&mut self, path: PathBuf, image: ImageData) -> bool {
        if !self.config.enabled {
            return false;
        }

        let entry = CacheEntry::new(image);
        let image_size = entry.size_bytes;

        // Don't cache images larger than half the cache size
        if image_size > self.config.max_bytes / 2 {
            return false;
        }

        // Evict images until we have room
        while self.current_bytes + image_size > self.config.max_bytes && !self.cache.is_empty() {
            if let Some((_, evicted)) = self.cache.pop_lru() {
                self.current_bytes = self.current_bytes.saturating_sub(evicted.size_bytes);
                self.stats.evictions += 1;
            }
        }

        // Check if we already have this path (update if so)
        if let Some(existing) = self.cache.pop(&path) {
            self.current_bytes = self.current_bytes.saturating_sub(existing.size_bytes);
        }

        self.current_bytes += entry.size_bytes;
        self.cache.put(path, entry);
        self.stats.insertions += 1;
        self.stats.image_count = self.cache.len();
        self.stats.total_bytes = self.current_bytes;

        true
    }

    /// Gets an image from the cache by path.
    ///
    /// Updates LRU order on access.
    /// Returns a clone of the `ImageData` (the handle is reference-counted internally).
    pub fn get(&mut self, path: &Path) -> Option<ImageData> {
        if !self.config.enabled {
            return None;
        }

        if let Some(entry) = self.cache.get(path) {
            self.stats.hits += 1;
            // Clone the Arc's inner ImageData - this is cheap due to Arc in ImageData
            Some((*entry.image).clone())
        } else {
            self.stats.misses += 1;
            None
        }
    }

    /// Checks if an image is cached for the given path without updating LRU order.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        if !self.config.enabled {
            return false;
        }
        self.cache.contains(path)
    }

    /// Returns paths that need to be prefetched (not already in cache).
    ///
    /// Given a list of paths to prefetch, returns only those not already cached.
    #[must_use]
    pub fn paths_to_prefetch(&self, paths: &[PathBuf]) -> Vec<PathBuf> {
        if !self.config.enabled {
            return Vec::new();
        }

        paths
            .iter()
            .filter(|p| !self.cache.contains(p.as_path()))
            .cloned()
            .collect()
    }

    /// Clears all cached images.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.current_bytes = 0;
        self.stats.image_count = 0;
        self.stats.total_bytes = 0;
    }

    /// Returns the current cache statistics.
    #[must_use]
    pub fn stats(&self) -> PrefetchStats {
        self.stats
    }

    /// Returns the current number of cached images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Returns the current memory usage in bytes.
    #[must_use]
    pub fn memory_usage(&self) -> usize {
        self.current_bytes
    }

    /// Returns the cache configuration.
    #[must_use]
    pub fn config(&self) -> &PrefetchConfig {
        &self.config
    }
}

impl std::fmt::Debug for PrefetchCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefetchCache")
            .field("enabled", &self.config.enabled)
            .field("image_count", &self.cache.len())
            .field("memory_usage", &self.current_bytes)
            .field("max_bytes", &self.config.max_bytes)
            .field("max_entries", &self.config.max_entries)
            .field("prefetch_count", &self.config.prefetch_count)
            .field("stats", &self.stats)
            .finish()
    }
}

/// Returns the paths adjacent to `current`, nearest first, alternating
/// forward and backward with wraparound.
///
/// The current path itself is never included and each path appears at most
/// once, so small galleries are covered without duplicates.
#[must_use]
pub fn neighbor_paths(paths: &[PathBuf], current: usize, count: usize) -> Vec<PathBuf> {
    let len = paths.len();
    if len <= 1 || current >= len {
        return Vec::new();
    }

    let mut result: Vec<PathBuf> = Vec::new();
    for step in 1..=count.min(len - 1) {
        let forward = (current + step) % len;
        let backward = (current + len - step) % len;
        for index in [forward, backward] {
            if index != current && !result.iter().any(|p| p == &paths[index]) {
                result.push(paths[index].clone());
            }
        }
    }
    result
}

/// Loads an image for prefetching.
///
/// This is the async function called by the prefetch task.
/// Returns the path and loaded image data, or an error.
pub async fn load_image_for_prefetch(path: PathBuf) -> (PathBuf, Result<ImageData>) {
    let path_clone = path.clone();
    let result = tokio::task::spawn_blocking(move || crate::media::load_image(&path_clone))
        .await
        .unwrap_or_else(|e| {
            Err(crate::error::Error::Io(format!(
                "Prefetch task failed: {e}"
            )))
        });

    (path, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: u32, height: u32) -> ImageData {
        let pixels = vec![0u8; (width * height * 4) as usize];
        ImageData::from_rgba(width, height, pixels)
    }

    fn test_paths(count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| PathBuf::from(format!("/test/image{i}.jpg")))
            .collect()
    }

    #[test]
    fn new_cache_is_empty() {
        let cache = PrefetchCache::with_defaults();
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.memory_usage(), 0);
    }

    #[test]
    fn insert_and_get_image() {
        let mut cache = PrefetchCache::with_defaults();
        let path = PathBuf::from("/test/image.jpg");
        let image = create_test_image(100, 100);

        assert!(cache.insert(path.clone(), image));
        assert_eq!(cache.len(), 1);

        let retrieved = cache.get(&path);
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().width, 100);
    }

    #[test]
    fn disabled_cache_returns_none() {
        let mut cache = PrefetchCache::new(PrefetchConfig::disabled());
        let path = PathBuf::from("/test/image.jpg");
        let image = create_test_image(100, 100);

        assert!(!cache.insert(path.clone(), image));
        assert!(cache.get(&path).is_none());
    }

    #[test]
    fn lru_eviction_on_byte_limit() {
        let config = PrefetchConfig {
            max_bytes: 100_000, // Enough for ~10 images at 50x50 (10,000 bytes each)
            max_entries: 100,
            prefetch_count: 2,
            enabled: true,
        };
        let mut cache = PrefetchCache::new(config);

        // Inserting 15 images at 10,000 bytes each must evict some
        for i in 0..15 {
            let path = PathBuf::from(format!("/test/image{i}.jpg"));
            let image = create_test_image(50, 50);
            cache.insert(path, image);
        }

        assert!(cache.memory_usage() <= 100_000);
        assert!(cache.stats().evictions > 0);
    }

    #[test]
    fn contains_checks_without_updating_lru() {
        let mut cache = PrefetchCache::with_defaults();
        let path = PathBuf::from("/test/image.jpg");
        let image = create_test_image(100, 100);

        cache.insert(path.clone(), image);

        assert!(cache.contains(&path));
        assert!(!cache.contains(Path::new("/nonexistent")));
    }

    #[test]
    fn paths_to_prefetch_filters_cached() {
        let mut cache = PrefetchCache::with_defaults();

        let cached_path = PathBuf::from("/test/cached.jpg");
        cache.insert(cached_path.clone(), create_test_image(100, 100));

        let paths = vec![
            cached_path.clone(),
            PathBuf::from("/test/not_cached1.jpg"),
            PathBuf::from("/test/not_cached2.jpg"),
        ];

        let to_prefetch = cache.paths_to_prefetch(&paths);
        assert_eq!(to_prefetch.len(), 2);
        assert!(!to_prefetch.contains(&cached_path));
    }

    #[test]
    fn clear_removes_all_images() {
        let mut cache = PrefetchCache::with_defaults();

        for i in 0..5 {
            let path = PathBuf::from(format!("/test/image{i}.jpg"));
            cache.insert(path, create_test_image(50, 50));
        }

        assert_eq!(cache.len(), 5);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.memory_usage(), 0);
    }

    #[test]
    fn stats_track_hits_and_misses() {
        let mut cache = PrefetchCache::with_defaults();
        let path = PathBuf::from("/test/image.jpg");
        cache.insert(path.clone(), create_test_image(100, 100));

        // Hit
        let _ = cache.get(&path);
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 0);

        // Miss
        let _ = cache.get(Path::new("/nonexistent"));
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);

        // Hit rate should be 50%
        assert!((cache.stats().hit_rate() - 50.0).abs() < 0.01);
    }

    #[test]
    fn large_image_not_cached() {
        let config = PrefetchConfig::new(MIN_CACHE_MAX_MEGABYTES, 100, 2);
        let mut cache = PrefetchCache::new(config);

        // Image larger than half the cache size
        let large_image = create_test_image(2000, 2000); // 16 MB
        let path = PathBuf::from("/test/large.jpg");
        assert!(!cache.insert(path, large_image));
        assert!(cache.is_empty());
    }

    #[test]
    fn duplicate_path_updates_image() {
        let mut cache = PrefetchCache::with_defaults();
        let path = PathBuf::from("/test/image.jpg");

        let image1 = create_test_image(100, 100);
        let image2 = create_test_image(200, 200);

        cache.insert(path.clone(), image1);
        let initial_size = cache.memory_usage();

        cache.insert(path.clone(), image2);
        assert_eq!(cache.len(), 1); // Still one image
        assert!(cache.memory_usage() > initial_size); // Updated size

        let retrieved = cache.get(&path).unwrap();
        assert_eq!(retrieved.width, 200);
    }

    #[test]
    fn config_clamps_values() {
        let config = PrefetchConfig::new(0, 0, 2);
        assert_eq!(
            config.max_bytes,
            MIN_CACHE_MAX_MEGABYTES as usize * 1024 * 1024
        );
        assert_eq!(config.max_entries, MIN_CACHE_MAX_ENTRIES);

        let config = PrefetchConfig::new(u64::MAX, usize::MAX, 2);
        assert_eq!(
            config.max_bytes,
            MAX_CACHE_MAX_MEGABYTES as usize * 1024 * 1024
        );
        assert_eq!(config.max_entries, MAX_CACHE_MAX_ENTRIES);
    }

    #[test]
    fn config_from_cache_section_defaults() {
        let config = PrefetchConfig::from_cache_config(&crate::config::CacheConfig::default());
        assert!(config.enabled);
        assert_eq!(
            config.max_bytes,
            DEFAULT_CACHE_MAX_MEGABYTES as usize * 1024 * 1024
        );
        assert_eq!(config.max_entries, DEFAULT_CACHE_MAX_ENTRIES);
        assert_eq!(config.prefetch_count, DEFAULT_PREFETCH_COUNT);
    }

    #[test]
    fn config_from_disabled_cache_section() {
        let cache_config = crate::config::CacheConfig {
            enabled: Some(false),
            ..Default::default()
        };
        let config = PrefetchConfig::from_cache_config(&cache_config);
        assert!(!config.enabled);
    }

    #[test]
    fn neighbor_paths_wrap_around() {
        let paths = test_paths(3);
        let neighbors = neighbor_paths(&paths, 2, 1);
        assert_eq!(neighbors, vec![paths[0].clone(), paths[1].clone()]);
    }

    #[test]
    fn neighbor_paths_nearest_first() {
        let paths = test_paths(7);
        let neighbors = neighbor_paths(&paths, 3, 2);
        assert_eq!(
            neighbors,
            vec![
                paths[4].clone(),
                paths[2].clone(),
                paths[5].clone(),
                paths[1].clone(),
            ]
        );
    }

    #[test]
    fn neighbor_paths_cover_small_gallery_once() {
        let paths = test_paths(3);
        let neighbors = neighbor_paths(&paths, 0, 10);
        assert_eq!(neighbors.len(), 2);
        assert!(neighbors.contains(&paths[1]));
        assert!(neighbors.contains(&paths[2]));
    }

    #[test]
    fn neighbor_paths_empty_for_single_item() {
        let paths = test_paths(1);
        assert!(neighbor_paths(&paths, 0, 2).is_empty());
    }

    #[test]
    fn neighbor_paths_empty_for_out_of_range() {
        let paths = test_paths(3);
        assert!(neighbor_paths(&paths, 5, 2).is_empty());
    }
}
