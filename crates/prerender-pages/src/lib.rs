//! # Prerender Pages
//!
//! Server-side rendering of page trees with a bounded markup cache.
//!
//! - [`page`]: the renderable [`Page`](page::Page) tree and its head declarations
//! - [`ssr`]: render engine, cached orchestrator, response composer and the
//!   HTML document responder
//! - `testing` (feature `testing`): manual clock and fake engines
//!
//! ## Example
//!
//! ```
//! use prerender_pages::page::{Head, IntoPage, PageElement};
//! use prerender_pages::ssr::{
//!     CachedRenderer, HtmlPageResponder, RenderContext, ResponseComposer, SsrRenderer,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let renderer = Arc::new(CachedRenderer::new(SsrRenderer::new()));
//! let composer = ResponseComposer::new(renderer, HtmlPageResponder::new());
//!
//! let layout = PageElement::new("h1")
//!     .child("Free themes")
//!     .into_page()
//!     .with_head(Head::new().title("Themes"));
//! let context = RenderContext::new("/themes?tier=free", json!({"ui": {}, "users": []}))
//!     .with_layout(layout);
//!
//! let html = composer.compose(context).unwrap();
//!
//! assert!(html.contains("<title>Themes</title>"));
//! assert!(html.contains("<div id=\"app\"><h1>Free themes</h1></div>"));
//! assert!(html.contains(r#"{"ui":{}}"#));
//! ```

pub mod page;
pub mod ssr;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use page::{Head, IntoPage, Page, PageElement};
pub use ssr::{
	CachedRenderer, ComposeError, HtmlPageResponder, RenderContext, RenderEngine, RenderError,
	RenderOptions, RenderResult, ResponseComposer, ResponseContext, SsrRenderer,
};
