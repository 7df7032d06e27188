//! Render orchestration over the markup cache.

use super::clock::{Clock, SystemClock};
use super::engine::{RenderEngine, RenderError};
use super::metadata::{DocumentMetadata, HeadCollector};
use prerender_cache::{CacheKey, MarkupCache};
use prerender_conf::{Environment, PrerenderSettings, TimingScope};
use prerender_stats::{CACHE_MISS, NoopStatEmitter, SLOW_RENDER, STAT_GROUP, StatEmitter};
use serde::{Serialize, Serializer};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

/// Default slow-render threshold.
pub const DEFAULT_SLOW_RENDER_THRESHOLD: Duration = Duration::from_millis(15);

/// Orchestrator behaviour switches
///
/// # Examples
///
/// ```
/// use prerender_conf::{Environment, TimingScope};
/// use prerender_pages::ssr::RenderOptions;
/// use std::time::Duration;
///
/// let options = RenderOptions::new()
///     .environment(Environment::Production)
///     .slow_render_threshold(Duration::from_millis(50))
///     .timing_scope(TimingScope::RenderOnly);
///
/// assert!(options.environment.is_production());
/// assert_eq!(options.slow_render_threshold, Duration::from_millis(50));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
	/// Selects the failure policy of [`CachedRenderer::render_with_fallback`]
	pub environment: Environment,
	/// Renders taking strictly longer emit a slow-render stat
	pub slow_render_threshold: Duration,
	/// What the timer covers
	pub timing_scope: TimingScope,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			environment: Environment::Development,
			slow_render_threshold: DEFAULT_SLOW_RENDER_THRESHOLD,
			timing_scope: TimingScope::Total,
		}
	}
}

impl RenderOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_settings(settings: &PrerenderSettings) -> Self {
		Self {
			environment: settings.env.clone(),
			slow_render_threshold: settings.slow_render_threshold(),
			timing_scope: settings.timing_scope,
		}
	}

	pub fn environment(mut self, environment: Environment) -> Self {
		self.environment = environment;
		self
	}

	pub fn slow_render_threshold(mut self, threshold: Duration) -> Self {
		self.slow_render_threshold = threshold;
		self
	}

	pub fn timing_scope(mut self, scope: TimingScope) -> Self {
		self.timing_scope = scope;
		self
	}
}

/// Outcome of one render call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderResult {
	/// Rendered markup
	pub markup: String,
	/// Measured time, see [`TimingScope`]
	#[serde(rename = "timing_ms", serialize_with = "serialize_millis")]
	pub timing: Duration,
	/// Metadata reported by the engine; always `None` on a cache hit
	#[serde(skip_serializing_if = "Option::is_none")]
	pub metadata: Option<DocumentMetadata>,
	/// Whether the markup came from the cache
	pub cache_hit: bool,
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
	serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}

/// Memoizing front end to a [`RenderEngine`]
///
/// Each call derives a cache key (explicit, or from the serialized tree),
/// serves the cached markup when present and otherwise runs the engine and
/// stores its output. A cache miss emits `ssr/cache-miss`; a call slower than
/// the configured threshold emits `ssr/over-15ms-rendertostring`.
///
/// # Examples
///
/// ```
/// use prerender_pages::page::{IntoPage, PageElement};
/// use prerender_pages::ssr::{CachedRenderer, SsrRenderer};
///
/// let renderer = CachedRenderer::new(SsrRenderer::new());
/// let page = PageElement::new("p").child("hello").into_page();
///
/// let first = renderer.render(&page, None).unwrap();
/// let second = renderer.render(&page, None).unwrap();
///
/// assert_eq!(first.markup, "<p>hello</p>");
/// assert!(!first.cache_hit);
/// assert!(second.cache_hit);
/// assert_eq!(second.markup, first.markup);
/// ```
pub struct CachedRenderer<E: RenderEngine> {
	engine: E,
	cache: MarkupCache,
	stats: Arc<dyn StatEmitter>,
	clock: Arc<dyn Clock>,
	options: RenderOptions,
}

impl<E: RenderEngine> CachedRenderer<E> {
	/// Creates an orchestrator with a default-sized cache, no stats and the
	/// system clock.
	pub fn new(engine: E) -> Self {
		Self {
			engine,
			cache: MarkupCache::default(),
			stats: Arc::new(NoopStatEmitter),
			clock: Arc::new(SystemClock::new()),
			options: RenderOptions::default(),
		}
	}

	pub fn with_cache(mut self, cache: MarkupCache) -> Self {
		self.cache = cache;
		self
	}

	pub fn with_stats(mut self, stats: impl StatEmitter + 'static) -> Self {
		self.stats = Arc::new(stats);
		self
	}

	pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
		self.clock = Arc::new(clock);
		self
	}

	pub fn with_options(mut self, options: RenderOptions) -> Self {
		self.options = options;
		self
	}

	pub fn engine(&self) -> &E {
		&self.engine
	}

	pub fn cache(&self) -> &MarkupCache {
		&self.cache
	}

	pub fn options(&self) -> &RenderOptions {
		&self.options
	}

	/// Drops the cached markup for `key`. Returns whether an entry existed.
	pub fn invalidate(&self, key: &CacheKey) -> bool {
		self.cache.invalidate(key).is_some()
	}

	/// Drops all cached markup.
	pub fn invalidate_all(&self) {
		self.cache.clear();
	}

	/// Renders `tree`, serving cached markup when available.
	///
	/// Without an explicit `key` the key is derived from the serialized tree.
	/// Engine failures, including panics, are returned as [`RenderError`].
	pub fn render(&self, tree: &E::Tree, key: Option<CacheKey>) -> Result<RenderResult, RenderError> {
		let key = match key {
			Some(key) => key,
			None => CacheKey::from_tree(tree)?,
		};

		let started = self.clock.now();
		let mut head = HeadCollector::new();
		let mut render_time = Duration::ZERO;

		let (markup, cache_hit) = match self.cache.get(&key) {
			Some(markup) => (markup, true),
			None => {
				self.stats.emit(STAT_GROUP, CACHE_MISS);
				tracing::debug!(key = %key, "markup cache miss");

				let render_started = self.clock.now();
				let markup = self.run_engine(tree, &mut head)?;
				render_time = self.clock.now().saturating_sub(render_started);

				self.cache.set(key.clone(), markup.clone());
				(markup, false)
			}
		};

		let timing = match self.options.timing_scope {
			TimingScope::Total => self.clock.now().saturating_sub(started),
			TimingScope::RenderOnly => render_time,
		};

		let metadata = if head.peek() {
			head.extract_and_reset()
		} else {
			None
		};

		if timing > self.options.slow_render_threshold {
			self.stats.emit(STAT_GROUP, SLOW_RENDER);
			tracing::warn!(
				key = %key,
				elapsed_ms = timing.as_millis() as u64,
				threshold_ms = self.options.slow_render_threshold.as_millis() as u64,
				"slow server-side render"
			);
		}

		Ok(RenderResult {
			markup,
			timing,
			metadata,
			cache_hit,
		})
	}

	/// [`render`](Self::render) with the environment's failure policy applied.
	///
	/// In development a failure is returned to the caller. In every other
	/// environment it is logged and `Ok(None)` is returned, so the page can
	/// fall back to client-side rendering.
	pub fn render_with_fallback(
		&self,
		tree: &E::Tree,
		key: Option<CacheKey>,
	) -> Result<Option<RenderResult>, RenderError> {
		match self.render(tree, key) {
			Ok(result) => Ok(Some(result)),
			Err(error) if self.options.environment.is_development() => Err(error),
			Err(error) => {
				tracing::error!(
					error = %error,
					environment = %self.options.environment,
					"server-side render failed, falling back to client rendering"
				);
				Ok(None)
			}
		}
	}

	fn run_engine(&self, tree: &E::Tree, head: &mut HeadCollector) -> Result<String, RenderError> {
		let result = panic::catch_unwind(AssertUnwindSafe(|| {
			self.engine.render_to_markup(tree, head)
		}));

		match result {
			Ok(rendered) => rendered,
			Err(payload) => Err(RenderError::Panicked(panic_message(payload.as_ref()))),
		}
	}
}

impl<E: RenderEngine + std::fmt::Debug> std::fmt::Debug for CachedRenderer<E> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CachedRenderer")
			.field("engine", &self.engine)
			.field("cache", &self.cache)
			.field("options", &self.options)
			.finish()
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		(*message).to_string()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"unknown panic payload".to_string()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::page::{Head, IntoPage, Page, PageElement};
	use crate::ssr::SsrRenderer;
	use crate::testing::{CountingEngine, FnEngine, ManualClock};
	use prerender_stats::RecordingStatEmitter;
	use rstest::rstest;

	fn page(text: &'static str) -> Page {
		PageElement::new("div").child(text).into_page()
	}

	#[rstest]
	fn test_miss_then_hit() {
		// Arrange
		let engine = Arc::new(CountingEngine::new(SsrRenderer::new()));
		let stats = Arc::new(RecordingStatEmitter::new());
		let renderer = CachedRenderer::new(engine.clone()).with_stats(stats.clone());

		// Act
		let first = renderer.render(&page("hi"), None).unwrap();
		let second = renderer.render(&page("hi"), None).unwrap();

		// Assert
		assert_eq!(engine.calls(), 1);
		assert_eq!(first.markup, second.markup);
		assert_eq!(stats.count(STAT_GROUP, CACHE_MISS), 1);
	}

	#[rstest]
	fn test_explicit_key_decides_hit() {
		let engine = Arc::new(CountingEngine::new(SsrRenderer::new()));
		let renderer = CachedRenderer::new(engine.clone());
		let key = CacheKey::new("/themes");

		let first = renderer.render(&page("one"), Some(key.clone())).unwrap();
		let second = renderer.render(&page("two"), Some(key)).unwrap();

		assert_eq!(engine.calls(), 1);
		assert_eq!(second.markup, first.markup);
		assert_eq!(second.markup, "<div>one</div>");
	}

	#[rstest]
	fn test_metadata_only_on_render() {
		let renderer = CachedRenderer::new(SsrRenderer::new());
		let tree = page("body").with_head(Head::new().title("Title"));

		let first = renderer.render(&tree, None).unwrap();
		let second = renderer.render(&tree, None).unwrap();

		assert_eq!(first.metadata.unwrap().title.as_deref(), Some("Title"));
		assert!(second.metadata.is_none());
	}

	/// Advances the shared clock whenever a stat is emitted.
	struct SlowStats {
		clock: Arc<ManualClock>,
		cost: Duration,
	}

	impl StatEmitter for SlowStats {
		fn emit(&self, _group: &str, _name: &str) {
			self.clock.advance(self.cost);
		}
	}

	#[rstest]
	#[case(TimingScope::Total, Duration::from_millis(7))]
	#[case(TimingScope::RenderOnly, Duration::from_millis(5))]
	fn test_timing_scope(#[case] scope: TimingScope, #[case] expected: Duration) {
		// Arrange
		let clock = Arc::new(ManualClock::new());
		let engine_clock = clock.clone();
		let engine = FnEngine::new(move |_: &Page, _: &mut HeadCollector| {
			engine_clock.advance(Duration::from_millis(5));
			Ok("<p></p>".to_string())
		});
		let renderer = CachedRenderer::new(engine)
			.with_clock(clock.clone())
			.with_stats(SlowStats {
				clock: clock.clone(),
				cost: Duration::from_millis(2),
			})
			.with_options(
				RenderOptions::new()
					.timing_scope(scope)
					.slow_render_threshold(Duration::from_secs(1)),
			);

		// Act
		let result = renderer.render(&Page::empty(), None).unwrap();

		// Assert
		assert_eq!(result.timing, expected);
	}

	#[rstest]
	fn test_render_only_timing_is_zero_on_hit() {
		let renderer = CachedRenderer::new(SsrRenderer::new())
			.with_clock(ManualClock::new())
			.with_options(RenderOptions::new().timing_scope(TimingScope::RenderOnly));

		renderer.render(&page("x"), None).unwrap();
		let hit = renderer.render(&page("x"), None).unwrap();

		assert!(hit.cache_hit);
		assert_eq!(hit.timing, Duration::ZERO);
	}

	#[rstest]
	fn test_panic_becomes_error() {
		let engine = FnEngine::new(|_: &Page, _: &mut HeadCollector| -> Result<String, RenderError> {
			panic!("component blew up")
		});
		let renderer = CachedRenderer::new(engine);

		let err = renderer.render(&Page::empty(), None).unwrap_err();

		match err {
			RenderError::Panicked(message) => assert_eq!(message, "component blew up"),
			other => panic!("unexpected error: {other}"),
		}
		assert!(renderer.cache().is_empty());
	}

	#[rstest]
	fn test_failed_render_is_not_cached() {
		let engine = FnEngine::new(|_: &Page, _: &mut HeadCollector| Err(RenderError::engine("boom")));
		let renderer = CachedRenderer::new(engine);

		assert!(renderer.render(&Page::empty(), None).is_err());
		assert!(renderer.cache().is_empty());
	}

	#[rstest]
	fn test_invalidate_forces_rerender() {
		let engine = Arc::new(CountingEngine::new(SsrRenderer::new()));
		let renderer = CachedRenderer::new(engine.clone());
		let key = CacheKey::new("k");

		renderer.render(&page("a"), Some(key.clone())).unwrap();
		assert!(renderer.invalidate(&key));
		assert!(!renderer.invalidate(&key));
		renderer.render(&page("a"), Some(key.clone())).unwrap();
		renderer.invalidate_all();
		renderer.render(&page("a"), Some(key)).unwrap();

		assert_eq!(engine.calls(), 3);
	}

	#[rstest]
	fn test_options_from_settings() {
		let settings = PrerenderSettings {
			env: Environment::Production,
			slow_render_threshold_ms: 40,
			timing_scope: TimingScope::RenderOnly,
			..Default::default()
		};

		let options = RenderOptions::from_settings(&settings);

		assert_eq!(options.environment, Environment::Production);
		assert_eq!(options.slow_render_threshold, Duration::from_millis(40));
		assert_eq!(options.timing_scope, TimingScope::RenderOnly);
	}

	#[rstest]
	fn test_result_serializes_timing_in_millis() {
		let result = RenderResult {
			markup: "<p></p>".to_string(),
			timing: Duration::from_micros(2500),
			metadata: None,
			cache_hit: false,
		};

		let json = serde_json::to_value(&result).unwrap();

		assert_eq!(json["markup"], "<p></p>");
		assert_eq!(json["timing_ms"], 2.5);
		assert!(json.get("metadata").is_none());
	}
}
