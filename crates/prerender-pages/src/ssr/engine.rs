//! Render engines.

use super::metadata::HeadCollector;
use crate::page::Page;
use serde::Serialize;
use std::error::Error as StdError;

/// Errors raised while producing markup
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
	#[error("Render engine failed: {0}")]
	Engine(#[source] Box<dyn StdError + Send + Sync>),

	#[error("Failed to serialize render tree: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("Render engine panicked: {0}")]
	Panicked(String),
}

impl RenderError {
	/// Wraps an engine-specific failure.
	pub fn engine(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
		Self::Engine(error.into())
	}
}

/// Synchronous tree → markup transformation.
///
/// Rendering must be deterministic for a given tree: the result is cached
/// and served for every later request with the same key. Any document
/// metadata the tree declares is reported to `head`.
pub trait RenderEngine: Send + Sync {
	/// Renderable input. Serialized to derive default cache keys.
	type Tree: Serialize;

	fn render_to_markup(
		&self,
		tree: &Self::Tree,
		head: &mut HeadCollector,
	) -> Result<String, RenderError>;
}

impl<E: RenderEngine + ?Sized> RenderEngine for std::sync::Arc<E> {
	type Tree = E::Tree;

	fn render_to_markup(
		&self,
		tree: &Self::Tree,
		head: &mut HeadCollector,
	) -> Result<String, RenderError> {
		(**self).render_to_markup(tree, head)
	}
}

/// Renders a [`Page`] tree to an HTML fragment.
///
/// # Examples
///
/// ```
/// use prerender_pages::page::{Head, IntoPage, PageElement};
/// use prerender_pages::ssr::{HeadCollector, RenderEngine, SsrRenderer};
///
/// let page = PageElement::new("h1")
///     .child("Themes")
///     .into_page()
///     .with_head(Head::new().title("Themes"));
///
/// let mut head = HeadCollector::new();
/// let markup = SsrRenderer::new().render_to_markup(&page, &mut head).unwrap();
///
/// assert_eq!(markup, "<h1>Themes</h1>");
/// assert!(head.peek());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SsrRenderer;

impl SsrRenderer {
	pub fn new() -> Self {
		Self
	}
}

impl RenderEngine for SsrRenderer {
	type Tree = Page;

	fn render_to_markup(&self, tree: &Page, head: &mut HeadCollector) -> Result<String, RenderError> {
		if let Some(found) = tree.find_topmost_head() {
			head.record(found.clone());
		}
		Ok(tree.render_to_string())
	}
}
