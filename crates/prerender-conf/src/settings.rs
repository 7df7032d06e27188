//! Settings for the server-side render cache
//!
//! [`PrerenderSettings`] is the single typed view of all recognized options.
//! It is normally produced by a [`SettingsBuilder`] from layered
//! [`ConfigSource`](sources::ConfigSource)s, but every field has a default so
//! `PrerenderSettings::default()` is a valid development configuration.

pub mod builder;
pub mod env;
pub mod environment;
pub mod prelude;
pub mod sources;
pub mod validation;

pub use builder::SettingsBuilder;
pub use environment::Environment;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Prefix used by [`PrerenderSettings::from_env`] for environment variables.
pub const DEFAULT_ENV_PREFIX: &str = "PRERENDER_";

/// Default telemetry pixel endpoint.
pub const DEFAULT_STATS_ENDPOINT: &str = "http://pixel.wp.com/g.gif";

/// Which part of a render call the slow-render timer covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimingScope {
	/// Cache lookup plus render (the figure reported on every call).
	#[default]
	Total,
	/// The render engine call alone; zero on a cache hit.
	RenderOnly,
}

/// All recognized prerender options
///
/// # Examples
///
/// ```
/// use prerender_conf::{Environment, PrerenderSettings};
///
/// let settings = PrerenderSettings::default();
/// assert_eq!(settings.env, Environment::Development);
/// assert_eq!(settings.cache_capacity, 1000);
/// assert_eq!(settings.state_keys, vec!["ui", "themes"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrerenderSettings {
	/// Deployment environment.
	pub env: Environment,
	/// Master switch for server-side rendering in the response composer.
	pub server_side_rendering: bool,
	/// Maximum number of cached markup entries.
	pub cache_capacity: usize,
	/// Renders slower than this (strictly) emit a slow-render stat.
	pub slow_render_threshold_ms: u64,
	/// What the slow-render timer measures.
	pub timing_scope: TimingScope,
	/// Telemetry pixel endpoint.
	pub stats_endpoint: String,
	/// Template handed to the responder.
	pub template_name: String,
	/// Top-level application state keys embedded in the page and the cache key.
	pub state_keys: Vec<String>,
	/// `lang` attribute of the rendered document.
	pub lang: String,
}

impl Default for PrerenderSettings {
	fn default() -> Self {
		Self {
			env: Environment::Development,
			server_side_rendering: true,
			cache_capacity: 1000,
			slow_render_threshold_ms: 15,
			timing_scope: TimingScope::Total,
			stats_endpoint: DEFAULT_STATS_ENDPOINT.to_string(),
			template_name: "index.html".to_string(),
			state_keys: vec!["ui".to_string(), "themes".to_string()],
			lang: "en".to_string(),
		}
	}
}

impl PrerenderSettings {
	/// Loads settings from defaults, an optional `.env` file and
	/// `PRERENDER_`-prefixed environment variables.
	pub fn from_env() -> Result<Self, SettingsError> {
		SettingsBuilder::new()
			.add_source(sources::DefaultSource::new())
			.add_source(sources::DotEnvSource::new())
			.add_source(sources::EnvSource::new().with_prefix(DEFAULT_ENV_PREFIX))
			.build()
	}

	/// Slow-render threshold as a [`Duration`].
	pub fn slow_render_threshold(&self) -> Duration {
		Duration::from_millis(self.slow_render_threshold_ms)
	}
}

/// Errors raised while assembling settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("Configuration source error: {0}")]
	Source(#[from] sources::SourceError),

	#[error("Failed to deserialize settings: {0}")]
	Deserialize(#[from] serde_json::Error),

	#[error(transparent)]
	Validation(#[from] validation::ValidationError),
}
