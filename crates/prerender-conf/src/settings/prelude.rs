//! Prelude module for convenient imports

pub use super::builder::SettingsBuilder;
pub use super::env::{Env, EnvError, parse_bool, parse_list};
pub use super::environment::Environment;
pub use super::sources::{
	ConfigSource, DefaultSource, DotEnvSource, EnvSource, JsonFileSource, SourceError,
	TomlFileSource,
};
pub use super::validation::{ValidationError, ValidationResult, validate};
pub use super::{DEFAULT_ENV_PREFIX, PrerenderSettings, SettingsError, TimingScope};
