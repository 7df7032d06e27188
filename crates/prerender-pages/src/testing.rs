//! Test doubles for the render pipeline.
//!
//! Enabled with the `testing` feature.

use crate::ssr::{
	Clock, HeadCollector, RenderEngine, RenderError, ResponseContext, TemplateResponder,
};
use parking_lot::Mutex;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub use prerender_stats::RecordingStatEmitter;

/// Clock that only moves when told to.
///
/// # Examples
///
/// ```
/// use prerender_pages::ssr::Clock;
/// use prerender_pages::testing::ManualClock;
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// clock.advance(Duration::from_millis(20));
/// assert_eq!(clock.now(), Duration::from_millis(20));
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
	now: Mutex<Duration>,
}

impl ManualClock {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn advance(&self, by: Duration) {
		*self.now.lock() += by;
	}

	pub fn set(&self, to: Duration) {
		*self.now.lock() = to;
	}
}

impl Clock for ManualClock {
	fn now(&self) -> Duration {
		*self.now.lock()
	}
}

/// Wraps an engine and counts how often it runs.
#[derive(Debug, Default)]
pub struct CountingEngine<E> {
	inner: E,
	calls: AtomicUsize,
}

impl<E> CountingEngine<E> {
	pub fn new(inner: E) -> Self {
		Self {
			inner,
			calls: AtomicUsize::new(0),
		}
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

impl<E: RenderEngine> RenderEngine for CountingEngine<E> {
	type Tree = E::Tree;

	fn render_to_markup(
		&self,
		tree: &Self::Tree,
		head: &mut HeadCollector,
	) -> Result<String, RenderError> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		self.inner.render_to_markup(tree, head)
	}
}

/// Engine backed by a closure.
///
/// # Examples
///
/// ```
/// use prerender_pages::ssr::{HeadCollector, RenderEngine};
/// use prerender_pages::testing::FnEngine;
/// use serde_json::{json, Value};
///
/// let engine = FnEngine::new(|tree: &Value, _: &mut HeadCollector| {
///     Ok(format!("<p>{}</p>", tree["text"].as_str().unwrap_or_default()))
/// });
///
/// let mut head = HeadCollector::new();
/// let markup = engine.render_to_markup(&json!({"text": "hi"}), &mut head).unwrap();
/// assert_eq!(markup, "<p>hi</p>");
/// ```
pub struct FnEngine<T, F> {
	render: F,
	_tree: PhantomData<fn(&T)>,
}

impl<T, F> FnEngine<T, F>
where
	F: Fn(&T, &mut HeadCollector) -> Result<String, RenderError>,
{
	pub fn new(render: F) -> Self {
		Self {
			render,
			_tree: PhantomData,
		}
	}
}

impl<T, F> RenderEngine for FnEngine<T, F>
where
	T: Serialize,
	F: Fn(&T, &mut HeadCollector) -> Result<String, RenderError> + Send + Sync,
{
	type Tree = T;

	fn render_to_markup(&self, tree: &T, head: &mut HeadCollector) -> Result<String, RenderError> {
		(self.render)(tree, head)
	}
}

impl<T, F> std::fmt::Debug for FnEngine<T, F> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FnEngine").finish_non_exhaustive()
	}
}

/// Responder that hands back the template name and the context it received.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoResponder;

impl TemplateResponder for EchoResponder {
	type Output = (String, ResponseContext);
	type Error = std::convert::Infallible;

	fn render(
		&self,
		template: &str,
		context: &ResponseContext,
	) -> Result<Self::Output, Self::Error> {
		Ok((template.to_string(), context.clone()))
	}
}
