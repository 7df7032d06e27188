//! # Prerender
//!
//! Server-side prerendering of page trees behind a bounded LRU markup cache.
//!
//! A request's layout is rendered once per distinct (previous layout, path,
//! projected state) combination, cached, and merged into the response
//! context together with any title, meta and link declarations the layout
//! made. Cache misses and slow renders are reported as fire-and-forget
//! stats. Production deployments degrade to client-side rendering when
//! the engine fails; development surfaces the failure.
//!
//! ## Crates
//!
//! - [`conf`]: layered settings (`prerender-conf`)
//! - [`cache`]: the markup cache and key derivation (`prerender-cache`)
//! - [`stats`]: stat emitters (`prerender-stats`)
//! - [`page`] and [`ssr`]: the page tree, render orchestrator and response
//!   composer (`prerender-pages`)
//!
//! ## Quick Start
//!
//! ```
//! use prerender::prelude::*;
//! use serde_json::json;
//!
//! let settings = PrerenderSettings::default();
//! let composer = prerender::composer_from_settings(&settings).unwrap();
//!
//! let layout = PageElement::new("h1").child("Themes").into_page();
//! let context = RenderContext::new("/themes", json!({"ui": {}})).with_layout(layout);
//!
//! let html = composer.compose(context).unwrap();
//! assert!(html.contains("<div id=\"app\"><h1>Themes</h1></div>"));
//! ```

pub mod logging;
mod wiring;

pub use prerender_cache as cache;
pub use prerender_conf as conf;
pub use prerender_pages::{page, ssr};
pub use prerender_stats as stats;

#[cfg(feature = "testing")]
pub use prerender_pages::testing;

pub use wiring::{
	BuildError, DefaultComposer, composer_from_env, composer_from_settings, renderer_from_settings,
};

/// Commonly used types.
pub mod prelude {
	pub use crate::cache::{CacheKey, CacheStatistics, MarkupCache};
	pub use crate::conf::{Environment, PrerenderSettings, TimingScope};
	pub use crate::page::{Head, IntoPage, LinkTag, MetaTag, Page, PageElement};
	pub use crate::ssr::{
		CachedRenderer, ComposeError, HtmlPageResponder, RenderContext, RenderEngine,
		RenderError, RenderOptions, RenderResult, ResponseComposer, ResponseContext, SsrRenderer,
		TemplateResponder,
	};
	pub use crate::stats::{NoopStatEmitter, PixelStatEmitter, StatEmitter};
	pub use crate::{BuildError, DefaultComposer};
}
