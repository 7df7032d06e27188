//! # Prerender Cache
//!
//! Process-local, memory-resident cache of rendered markup.
//!
//! - [`CacheKey`]: identifies a renderable input, either supplied by the
//!   caller or derived from a canonical serialization of the input tree
//! - [`MarkupCache`]: capacity-bounded store with least-recently-used eviction
//! - [`CacheStatistics`]: hit/miss/eviction counters for monitoring
//!
//! ## Example
//!
//! ```
//! use prerender_cache::{CacheKey, MarkupCache};
//!
//! let cache = MarkupCache::new(2).unwrap();
//! cache.set(CacheKey::new("a"), "<p>a</p>".to_string());
//! cache.set(CacheKey::new("b"), "<p>b</p>".to_string());
//!
//! // Touch "a" so that "b" becomes the least recently used entry
//! assert!(cache.get(&CacheKey::new("a")).is_some());
//! cache.set(CacheKey::new("c"), "<p>c</p>".to_string());
//!
//! assert!(cache.contains(&CacheKey::new("a")));
//! assert!(!cache.contains(&CacheKey::new("b")));
//! ```

mod key;
mod markup;
mod statistics;

pub use key::CacheKey;
pub use markup::{CacheConfig, CacheError, DEFAULT_CAPACITY, MarkupCache};
pub use statistics::{CacheEntryInfo, CacheStatistics};
