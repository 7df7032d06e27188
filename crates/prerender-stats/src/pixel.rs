//! Tracking-pixel stat emitter

use crate::StatEmitter;
use crate::error::StatError;
use prerender_conf::settings::DEFAULT_STATS_ENDPOINT;
use prerender_conf::{Environment, PrerenderSettings};
use std::time::Duration;
use url::Url;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Sends each stat as a GET request to a tracking pixel
///
/// Only active in production; in every other environment [`emit`] is a no-op.
/// Requests are spawned onto the ambient Tokio runtime and never awaited by
/// the caller. Without a runtime the stat is dropped.
///
/// [`emit`]: StatEmitter::emit
#[derive(Debug, Clone)]
pub struct PixelStatEmitter {
	client: reqwest::Client,
	endpoint: Url,
	enabled: bool,
}

impl PixelStatEmitter {
	/// Create an emitter for `endpoint`, active only when `env` is production
	///
	/// # Examples
	///
	/// ```
	/// use prerender_conf::Environment;
	/// use prerender_stats::PixelStatEmitter;
	///
	/// let emitter = PixelStatEmitter::new("http://pixel.wp.com/g.gif", &Environment::Development).unwrap();
	/// assert!(!emitter.is_enabled());
	///
	/// assert!(PixelStatEmitter::new("not a url", &Environment::Production).is_err());
	/// ```
	pub fn new(endpoint: &str, env: &Environment) -> Result<Self, StatError> {
		let parsed = Url::parse(endpoint).map_err(|e| StatError::InvalidEndpoint {
			endpoint: endpoint.to_string(),
			reason: e.to_string(),
		})?;
		if !matches!(parsed.scheme(), "http" | "https") {
			return Err(StatError::InvalidEndpoint {
				endpoint: endpoint.to_string(),
				reason: format!("unsupported scheme '{}'", parsed.scheme()),
			});
		}
		let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
		Ok(Self {
			client,
			endpoint: parsed,
			enabled: env.is_production(),
		})
	}

	/// Emitter for the default pixel endpoint
	pub fn with_default_endpoint(env: &Environment) -> Result<Self, StatError> {
		Self::new(DEFAULT_STATS_ENDPOINT, env)
	}

	/// Emitter configured from settings
	pub fn from_settings(settings: &PrerenderSettings) -> Result<Self, StatError> {
		Self::new(&settings.stats_endpoint, &settings.env)
	}

	/// Override the environment gate
	pub fn with_enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}

	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	/// URL requested for one stat
	///
	/// The `t` parameter carries a random number so that intermediaries never
	/// serve the pixel from cache.
	pub fn stat_url(&self, group: &str, name: &str) -> Url {
		let mut url = self.endpoint.clone();
		url.query_pairs_mut()
			.append_pair("v", "wpcom-no-pv")
			.append_pair(&format!("x_{}", group), name)
			.append_pair("t", &rand::random::<f64>().to_string());
		url
	}
}

impl StatEmitter for PixelStatEmitter {
	fn emit(&self, group: &str, name: &str) {
		if !self.enabled {
			return;
		}

		let url = self.stat_url(group, name);
		let handle = match tokio::runtime::Handle::try_current() {
			Ok(handle) => handle,
			Err(_) => {
				tracing::debug!(group, name, "no async runtime available, dropping stat");
				return;
			}
		};

		let client = self.client.clone();
		handle.spawn(async move {
			match client.get(url.clone()).send().await {
				Ok(response) if !response.status().is_success() => {
					tracing::debug!(%url, status = %response.status(), "stat endpoint rejected request");
				}
				Ok(_) => {}
				Err(e) => {
					tracing::debug!(%url, error = %e, "failed to send stat");
				}
			}
		});
	}
}
