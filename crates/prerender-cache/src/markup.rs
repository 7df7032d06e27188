//! Bounded markup cache

use crate::key::CacheKey;
use crate::statistics::{CacheEntryInfo, CacheStatistics};
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default maximum number of cached entries
pub const DEFAULT_CAPACITY: usize = 1000;

/// Errors produced when constructing a cache
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CacheError {
	/// A cache that can hold nothing cannot be constructed
	#[error("cache capacity must be greater than zero")]
	ZeroCapacity,
}

/// Configuration for [`MarkupCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
	/// Maximum number of entries held before eviction
	pub max_capacity: usize,
}

impl Default for CacheConfig {
	fn default() -> Self {
		Self {
			max_capacity: DEFAULT_CAPACITY,
		}
	}
}

impl CacheConfig {
	/// Create a configuration with the default capacity
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the maximum number of entries
	pub fn with_max_capacity(mut self, capacity: usize) -> Self {
		self.max_capacity = capacity;
		self
	}
}

/// Capacity-bounded key → markup store with least-recently-used eviction
///
/// All operations take `&self`; the internal lock is held only for the
/// duration of a single lookup or insert.
pub struct MarkupCache {
	entries: Mutex<LruCache<CacheKey, String>>,
	hits: AtomicU64,
	misses: AtomicU64,
	evictions: AtomicU64,
}

impl MarkupCache {
	/// Create a cache holding at most `capacity` entries
	///
	/// # Errors
	///
	/// Returns [`CacheError::ZeroCapacity`] when `capacity` is zero.
	pub fn new(capacity: usize) -> Result<Self, CacheError> {
		let capacity = NonZeroUsize::new(capacity).ok_or(CacheError::ZeroCapacity)?;
		Ok(Self {
			entries: Mutex::new(LruCache::new(capacity)),
			hits: AtomicU64::new(0),
			misses: AtomicU64::new(0),
			evictions: AtomicU64::new(0),
		})
	}

	/// Create a cache from a [`CacheConfig`]
	pub fn with_config(config: CacheConfig) -> Result<Self, CacheError> {
		Self::new(config.max_capacity)
	}

	/// Look up markup, marking the entry as most recently used
	pub fn get(&self, key: &CacheKey) -> Option<String> {
		let found = self.entries.lock().get(key).cloned();
		if found.is_some() {
			self.hits.fetch_add(1, Ordering::Relaxed);
		} else {
			self.misses.fetch_add(1, Ordering::Relaxed);
		}
		found
	}

	/// Store markup under `key`
	///
	/// Returns the key that was evicted to make room, if any. Replacing the
	/// markup of a key already present is not an eviction.
	pub fn set(&self, key: CacheKey, markup: String) -> Option<CacheKey> {
		let displaced = self.entries.lock().push(key.clone(), markup);
		match displaced {
			Some((old_key, _)) if old_key != key => {
				self.evictions.fetch_add(1, Ordering::Relaxed);
				tracing::debug!(evicted = %old_key, "markup cache evicted least recently used entry");
				Some(old_key)
			}
			_ => None,
		}
	}

	/// Look up markup without touching recency or statistics
	pub fn peek(&self, key: &CacheKey) -> Option<String> {
		self.entries.lock().peek(key).cloned()
	}

	/// Whether `key` is present, without touching recency
	pub fn contains(&self, key: &CacheKey) -> bool {
		self.entries.lock().contains(key)
	}

	/// Remove a single entry, returning its markup
	pub fn invalidate(&self, key: &CacheKey) -> Option<String> {
		self.entries.lock().pop(key)
	}

	/// Remove every entry. Statistics are kept.
	pub fn clear(&self) {
		self.entries.lock().clear();
	}

	/// Number of entries currently held
	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	/// Whether the cache holds no entries
	pub fn is_empty(&self) -> bool {
		self.entries.lock().is_empty()
	}

	/// Maximum number of entries
	pub fn capacity(&self) -> usize {
		self.entries.lock().cap().get()
	}

	/// Keys ordered from most to least recently used
	pub fn keys(&self) -> Vec<CacheKey> {
		self.entries.lock().iter().map(|(k, _)| k.clone()).collect()
	}

	/// Key and size of a single entry, without touching recency
	pub fn inspect_entry(&self, key: &CacheKey) -> Option<CacheEntryInfo> {
		self.entries.lock().peek(key).map(|markup| CacheEntryInfo {
			key: key.to_string(),
			size: markup.len(),
		})
	}

	/// Snapshot of the cache counters
	///
	/// # Examples
	///
	/// ```
	/// use prerender_cache::{CacheKey, MarkupCache};
	///
	/// let cache = MarkupCache::default();
	/// cache.set(CacheKey::new("home"), "<main></main>".to_string());
	///
	/// let _ = cache.get(&CacheKey::new("home"));
	/// let _ = cache.get(&CacheKey::new("about"));
	///
	/// let stats = cache.statistics();
	/// assert_eq!(stats.hits, 1);
	/// assert_eq!(stats.misses, 1);
	/// assert_eq!(stats.entry_count, 1);
	/// assert_eq!(stats.memory_usage, 13);
	/// ```
	pub fn statistics(&self) -> CacheStatistics {
		let (entry_count, capacity, memory_usage) = {
			let entries = self.entries.lock();
			let bytes: usize = entries.iter().map(|(_, markup)| markup.len()).sum();
			(entries.len(), entries.cap().get(), bytes)
		};
		let hits = self.hits.load(Ordering::Relaxed);
		let misses = self.misses.load(Ordering::Relaxed);
		CacheStatistics {
			hits,
			misses,
			total_requests: hits + misses,
			evictions: self.evictions.load(Ordering::Relaxed),
			entry_count: entry_count as u64,
			capacity: capacity as u64,
			memory_usage: memory_usage as u64,
		}
	}
}

impl Default for MarkupCache {
	fn default() -> Self {
		let capacity = NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN);
		Self {
			entries: Mutex::new(LruCache::new(capacity)),
			hits: AtomicU64::new(0),
			misses: AtomicU64::new(0),
			evictions: AtomicU64::new(0),
		}
	}
}

impl std::fmt::Debug for MarkupCache {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MarkupCache")
			.field("len", &self.len())
			.field("capacity", &self.capacity())
			.finish()
	}
}
