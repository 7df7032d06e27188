//! Settings-driven assembly of the render pipeline.

use crate::cache::{CacheError, MarkupCache};
use crate::conf::settings::validation::validate;
use crate::conf::{PrerenderSettings, SettingsError};
use crate::ssr::{
	CachedRenderer, HtmlPageResponder, RenderEngine, RenderOptions, ResponseComposer, SsrRenderer,
};
use crate::stats::{PixelStatEmitter, StatError};
use std::sync::Arc;

/// Composer rendering [`Page`](crate::page::Page) layouts into complete HTML documents.
pub type DefaultComposer = ResponseComposer<SsrRenderer, HtmlPageResponder>;

/// Errors raised while assembling the pipeline from settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
	#[error("Invalid settings: {0}")]
	Settings(#[from] SettingsError),

	#[error("Failed to create markup cache: {0}")]
	Cache(#[from] CacheError),

	#[error("Failed to create stat emitter: {0}")]
	Stats(#[from] StatError),
}

/// Wraps `engine` in a [`CachedRenderer`] configured from `settings`.
///
/// The cache holds `cache_capacity` entries and stats go to the configured
/// pixel endpoint, which only transmits in production.
pub fn renderer_from_settings<E: RenderEngine>(
	engine: E,
	settings: &PrerenderSettings,
) -> Result<CachedRenderer<E>, BuildError> {
	validate(settings).map_err(SettingsError::from)?;

	let cache = MarkupCache::new(settings.cache_capacity)?;
	let stats = PixelStatEmitter::from_settings(settings)?;

	tracing::debug!(
		env = %settings.env,
		capacity = settings.cache_capacity,
		threshold_ms = settings.slow_render_threshold_ms,
		stats_enabled = stats.is_enabled(),
		"Prerender pipeline configured"
	);

	Ok(CachedRenderer::new(engine)
		.with_cache(cache)
		.with_stats(stats)
		.with_options(RenderOptions::from_settings(settings)))
}

/// Builds the default pipeline: [`SsrRenderer`] behind the markup cache,
/// composed into [`HtmlPageResponder`] documents.
pub fn composer_from_settings(settings: &PrerenderSettings) -> Result<DefaultComposer, BuildError> {
	let renderer = renderer_from_settings(SsrRenderer::new(), settings)?;
	Ok(ResponseComposer::from_settings(
		Arc::new(renderer),
		HtmlPageResponder::from_settings(settings),
		settings,
	))
}

/// Like [`composer_from_settings`], with settings loaded by
/// [`PrerenderSettings::from_env`].
pub fn composer_from_env() -> Result<DefaultComposer, BuildError> {
	let settings = PrerenderSettings::from_env()?;
	composer_from_settings(&settings)
}
