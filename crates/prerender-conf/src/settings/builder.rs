//! Settings builder
//!
//! Collects [`ConfigSource`]s, merges their entries by ascending priority
//! (later, higher-priority sources override earlier ones), deserializes the
//! merged document and validates the result.

use super::sources::ConfigSource;
use super::{PrerenderSettings, SettingsError, validation};
use serde_json::{Map, Value};

/// Builder assembling [`PrerenderSettings`] from layered sources
///
/// # Examples
///
/// ```
/// use prerender_conf::settings::prelude::*;
///
/// let settings = SettingsBuilder::new()
///     .add_source(DefaultSource::new())
///     .build()
///     .unwrap();
///
/// assert_eq!(settings, PrerenderSettings::default());
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	/// Create an empty builder
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a configuration source
	pub fn add_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Descriptions of the registered sources in merge order
	pub fn describe(&self) -> Vec<String> {
		let mut sources: Vec<_> = self.sources.iter().collect();
		sources.sort_by_key(|s| s.priority());
		sources.iter().map(|s| s.description()).collect()
	}

	/// Merge all sources into a single JSON object
	pub fn merged(&self) -> Result<Map<String, Value>, SettingsError> {
		let mut sources: Vec<_> = self.sources.iter().collect();
		// Stable sort keeps registration order among equal priorities
		sources.sort_by_key(|s| s.priority());

		let mut merged = Map::new();
		for source in sources {
			let entries = source.load()?;
			tracing::debug!(
				source = %source.description(),
				entries = entries.len(),
				"merging configuration source"
			);
			merged.extend(entries);
		}
		Ok(merged)
	}

	/// Merge, deserialize and validate
	pub fn build(self) -> Result<PrerenderSettings, SettingsError> {
		let merged = self.merged()?;
		let settings: PrerenderSettings = serde_json::from_value(Value::Object(merged))?;
		validation::validate(&settings)?;
		Ok(settings)
	}
}
