//! Configuration sources for the layered settings system
//!
//! Provides different sources of configuration that can be merged together
//! in priority order (environment variables > .env files > config files > defaults).

use super::PrerenderSettings;
use super::env::{Env, EnvError};
use super::environment::Environment;
use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Keys whose environment values are always parsed as booleans.
const BOOL_KEYS: &[&str] = &["server_side_rendering"];

/// Keys whose environment values are comma-separated lists.
const LIST_KEYS: &[&str] = &["state_keys"];

/// Keys whose environment values are kept as strings even when numeric.
const STRING_KEYS: &[&str] = &[
	"env",
	"timing_scope",
	"stats_endpoint",
	"template_name",
	"lang",
];

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("Environment error: {0}")]
	Env(#[from] EnvError),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	#[error(".env file error: {0}")]
	DotEnv(#[from] dotenv::Error),
}

/// Built-in defaults, lowest priority
#[derive(Debug, Clone, Default)]
pub struct DefaultSource {
	defaults: PrerenderSettings,
}

impl DefaultSource {
	/// Source serving [`PrerenderSettings::default()`]
	pub fn new() -> Self {
		Self::default()
	}

	/// Source serving custom baseline settings
	pub fn with_settings(defaults: PrerenderSettings) -> Self {
		Self { defaults }
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		object_entries(serde_json::to_value(&self.defaults)?)
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}

/// Environment variable configuration source
///
/// Typed values are read through [`Env`]; a malformed boolean fails the
/// load with [`SourceError::Env`].
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
	env: Env,
}

impl EnvSource {
	/// Create a new environment variable configuration source
	///
	/// # Examples
	///
	/// ```
	/// use prerender_conf::settings::sources::EnvSource;
	///
	/// let source = EnvSource::new().with_prefix("PRERENDER_");
	/// ```
	pub fn new() -> Self {
		Self { env: Env::new() }
	}

	/// Set a prefix filter for environment variables
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env = self.env.with_prefix(prefix);
		self
	}

	/// Reads variable `name` (prefix stripped) as the value of settings `key`.
	fn read_value(&self, name: &str, key: &str, raw: String) -> Result<Value, EnvError> {
		if BOOL_KEYS.contains(&key) {
			return self.env.bool(name).map(Value::Bool);
		}
		if LIST_KEYS.contains(&key) {
			return self
				.env
				.list(name)
				.map(|items| Value::Array(items.into_iter().map(Value::String).collect()));
		}
		if key == "env" {
			return self
				.env
				.environment(name)
				.map(|environment| Value::String(environment.to_string()));
		}
		if STRING_KEYS.contains(&key) {
			return Ok(Value::String(raw));
		}
		if let Ok(num) = raw.trim().parse::<i64>() {
			Ok(Value::Number(num.into()))
		} else if let Ok(b) = raw.trim().parse::<bool>() {
			Ok(Value::Bool(b))
		} else {
			Ok(Value::String(raw))
		}
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let mut config = IndexMap::new();

		for (key, value) in std::env::vars() {
			let name = match self.env.prefix.as_deref() {
				Some(prefix) => match key.strip_prefix(prefix) {
					Some(stripped) => stripped,
					None => continue,
				},
				None => key.as_str(),
			};

			let lower_key = name.to_lowercase();
			let parsed_value = self.read_value(name, &lower_key, value)?;
			config.insert(lower_key, parsed_value);
		}

		Ok(config)
	}

	fn priority(&self) -> u8 {
		100
	}

	fn description(&self) -> String {
		match &self.env.prefix {
			Some(prefix) => format!("Environment variables (prefix: {})", prefix),
			None => "Environment variables".to_string(),
		}
	}
}

/// .env file configuration source
///
/// Loads the file into the process environment without overwriting
/// variables that are already set; the values are then picked up by
/// [`EnvSource`]. A missing file is not an error.
#[derive(Debug, Clone, Default)]
pub struct DotEnvSource {
	path: Option<PathBuf>,
	environment: Option<Environment>,
}

impl DotEnvSource {
	/// Source reading `.env` from the working directory
	pub fn new() -> Self {
		Self::default()
	}

	/// Set a specific path for the .env file
	pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.path = Some(path.into());
		self
	}

	/// Read `.env.<environment>` instead of `.env`
	///
	/// # Examples
	///
	/// ```
	/// use prerender_conf::Environment;
	/// use prerender_conf::settings::sources::DotEnvSource;
	///
	/// let source = DotEnvSource::new().with_environment(Environment::Production);
	/// // Will load .env.production
	/// ```
	pub fn with_environment(mut self, environment: Environment) -> Self {
		self.environment = Some(environment);
		self
	}

	fn resolved_path(&self) -> PathBuf {
		match (&self.path, &self.environment) {
			(Some(path), _) => path.clone(),
			(None, Some(environment)) => PathBuf::from(environment.env_file_name()),
			(None, None) => PathBuf::from(".env"),
		}
	}
}

impl ConfigSource for DotEnvSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		let path = self.resolved_path();
		if path.exists() {
			dotenv::from_path(&path)?;
			tracing::debug!(path = %path.display(), "loaded .env file");
		}
		Ok(IndexMap::new())
	}

	fn priority(&self) -> u8 {
		90
	}

	fn description(&self) -> String {
		format!(".env file: {}", self.resolved_path().display())
	}
}

/// TOML file configuration source
pub struct TomlFileSource {
	path: PathBuf,
}

impl TomlFileSource {
	/// Create a new TOML file configuration source
	///
	/// # Examples
	///
	/// ```
	/// use prerender_conf::settings::sources::TomlFileSource;
	///
	/// let source = TomlFileSource::new("prerender.toml");
	/// ```
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		let toml_value: toml::Value = toml::from_str(&content)?;
		object_entries(serde_json::to_value(toml_value)?)
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// JSON file configuration source
pub struct JsonFileSource {
	path: PathBuf,
}

impl JsonFileSource {
	/// Create a new JSON file configuration source
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}
}

impl ConfigSource for JsonFileSource {
	fn load(&self) -> Result<IndexMap<String, Value>, SourceError> {
		if !self.path.exists() {
			return Ok(IndexMap::new());
		}

		let content = fs::read_to_string(&self.path)?;
		object_entries(serde_json::from_str(&content)?)
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("JSON file: {}", self.path.display())
	}
}

fn object_entries(value: Value) -> Result<IndexMap<String, Value>, SourceError> {
	match value {
		Value::Object(map) => Ok(map.into_iter().collect()),
		_ => Err(SourceError::Parse("Expected object at root".to_string())),
	}
}
