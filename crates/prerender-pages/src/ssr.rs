//! Cached server-side rendering.
//!
//! The pieces, from the inside out:
//!
//! - [`RenderEngine`]: the expensive tree → markup transformation
//!   ([`SsrRenderer`] renders a [`Page`](crate::page::Page))
//! - [`HeadCollector`]: per-call capture of the document metadata an engine
//!   reports while rendering
//! - [`CachedRenderer`]: memoizes an engine behind a [`MarkupCache`], emits
//!   cache-miss and slow-render stats, and applies the environment's failure
//!   policy
//! - [`ResponseComposer`]: derives the cache key for a request, merges the
//!   render result into the response context and hands off to a
//!   [`TemplateResponder`]
//! - [`HtmlPageResponder`]: a responder producing a complete HTML document
//!
//! [`MarkupCache`]: prerender_cache::MarkupCache

mod cached;
mod clock;
mod composer;
mod document;
mod engine;
mod metadata;

pub use cached::{CachedRenderer, RenderOptions, RenderResult};
pub use clock::{Clock, SystemClock};
pub use composer::{
	ComposeError, RenderContext, ResponseComposer, ResponseContext, StateStore, TemplateResponder,
	project_state, request_path,
};
pub use document::{HtmlPageResponder, INITIAL_STATE_SCRIPT_ID};
pub use engine::{RenderEngine, RenderError, SsrRenderer};
pub use metadata::{DocumentMetadata, HeadCollector};
