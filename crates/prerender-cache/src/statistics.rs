//! Cache statistics and entry information

/// Cache entry information for inspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntryInfo {
	/// The key of the entry
	pub key: String,
	/// Size of the markup in bytes
	pub size: usize,
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStatistics {
	/// Number of cache hits
	pub hits: u64,
	/// Number of cache misses
	pub misses: u64,
	/// Total number of lookups
	pub total_requests: u64,
	/// Entries dropped to make room for new ones
	pub evictions: u64,
	/// Current number of entries in cache
	pub entry_count: u64,
	/// Maximum number of entries
	pub capacity: u64,
	/// Approximate memory usage of stored markup in bytes
	pub memory_usage: u64,
}

impl CacheStatistics {
	/// Calculate hit rate (0.0 to 1.0)
	///
	/// # Examples
	///
	/// ```
	/// use prerender_cache::CacheStatistics;
	///
	/// let mut stats = CacheStatistics::default();
	/// stats.hits = 75;
	/// stats.misses = 25;
	/// stats.total_requests = 100;
	///
	/// assert_eq!(stats.hit_rate(), 0.75);
	/// ```
	pub fn hit_rate(&self) -> f64 {
		if self.total_requests == 0 {
			0.0
		} else {
			self.hits as f64 / self.total_requests as f64
		}
	}

	/// Calculate miss rate (0.0 to 1.0)
	pub fn miss_rate(&self) -> f64 {
		if self.total_requests == 0 {
			0.0
		} else {
			self.misses as f64 / self.total_requests as f64
		}
	}

	/// Whether the cache is at capacity
	pub fn is_full(&self) -> bool {
		self.entry_count >= self.capacity
	}
}
