//! Environment variable handling
//!
//! Typed reads of process environment variables with optional prefix
//! support. Used by [`EnvSource`](super::sources::EnvSource) and available to
//! applications that wire their own settings.

use super::environment::Environment;
use std::env;

/// Environment variable reader with prefix support
#[derive(Debug, Clone, Default)]
pub struct Env {
	/// Optional prefix for environment variables (e.g., "PRERENDER_")
	pub prefix: Option<String>,
}

impl Env {
	/// Create a new Env instance
	pub fn new() -> Self {
		Self { prefix: None }
	}

	/// Set a prefix for all environment variable lookups
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	fn get_key_name(&self, key: &str) -> String {
		match &self.prefix {
			Some(prefix) => format!("{}{}", prefix, key),
			None => key.to_string(),
		}
	}

	fn lookup(&self, key: &str) -> Result<(String, Option<String>), EnvError> {
		let full_key = self.get_key_name(key);
		validate_env_var_name(&full_key)?;
		let value = env::var(&full_key).ok();
		Ok((full_key, value))
	}

	/// Read a string value from environment
	pub fn str(&self, key: &str) -> Result<String, EnvError> {
		self.str_with_default(key, None)
	}

	/// Read a string value with a default
	pub fn str_with_default(&self, key: &str, default: Option<&str>) -> Result<String, EnvError> {
		match self.lookup(key)? {
			(_, Some(val)) => Ok(val),
			(full_key, None) => default
				.map(str::to_string)
				.ok_or(EnvError::MissingVariable(full_key)),
		}
	}

	/// Read a boolean value from environment
	pub fn bool(&self, key: &str) -> Result<bool, EnvError> {
		self.bool_with_default(key, None)
	}

	/// Read a boolean value with a default
	pub fn bool_with_default(&self, key: &str, default: Option<bool>) -> Result<bool, EnvError> {
		match self.lookup(key)? {
			(full_key, Some(val)) => parse_bool(&val).map_err(|e| EnvError::ParseError {
				key: full_key,
				value_len: val.len(),
				error: e,
			}),
			(full_key, None) => default.ok_or(EnvError::MissingVariable(full_key)),
		}
	}

	/// Read an integer value from environment
	pub fn int(&self, key: &str) -> Result<i64, EnvError> {
		self.int_with_default(key, None)
	}

	/// Read an integer value with a default
	pub fn int_with_default(&self, key: &str, default: Option<i64>) -> Result<i64, EnvError> {
		match self.lookup(key)? {
			(full_key, Some(val)) => val.trim().parse::<i64>().map_err(|e| EnvError::ParseError {
				key: full_key,
				value_len: val.len(),
				error: e.to_string(),
			}),
			(full_key, None) => default.ok_or(EnvError::MissingVariable(full_key)),
		}
	}

	/// Read a list value from environment (comma-separated)
	pub fn list(&self, key: &str) -> Result<Vec<String>, EnvError> {
		self.list_with_default(key, None)
	}

	/// Read a list value with a default
	pub fn list_with_default(
		&self,
		key: &str,
		default: Option<Vec<String>>,
	) -> Result<Vec<String>, EnvError> {
		match self.lookup(key)? {
			(_, Some(val)) => Ok(parse_list(&val)),
			(full_key, None) => default.ok_or(EnvError::MissingVariable(full_key)),
		}
	}

	/// Read a deployment environment name, e.g. `PRERENDER_ENV=production`
	pub fn environment(&self, key: &str) -> Result<Environment, EnvError> {
		self.str(key).map(Environment::from)
	}
}

/// Parses the usual spellings of a boolean flag.
pub fn parse_bool(value: &str) -> Result<bool, String> {
	match value.trim().to_ascii_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Ok(true),
		"false" | "0" | "no" | "off" | "" => Ok(false),
		other => Err(format!("'{}' is not a boolean", other)),
	}
}

/// Splits a comma-separated list, trimming items and dropping empty ones.
pub fn parse_list(value: &str) -> Vec<String> {
	value
		.split(',')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(str::to_string)
		.collect()
}

/// Validates an environment variable name.
///
/// Rejects names that are empty, contain control characters, or contain
/// the `=` character (which is used as the key-value separator).
pub fn validate_env_var_name(name: &str) -> Result<(), EnvError> {
	if name.is_empty() {
		return Err(EnvError::InvalidVariableName {
			name: name.to_string(),
			reason: "environment variable name must not be empty".to_string(),
		});
	}

	if let Some(pos) = name.find(|c: char| c.is_control()) {
		return Err(EnvError::InvalidVariableName {
			name: name.to_string(),
			reason: format!(
				"environment variable name contains control character at position {}",
				pos
			),
		});
	}

	if name.contains('=') {
		return Err(EnvError::InvalidVariableName {
			name: name.to_string(),
			reason: "environment variable name must not contain '='".to_string(),
		});
	}

	Ok(())
}

/// Environment variable errors
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
	#[error("Missing environment variable: {0}")]
	MissingVariable(String),

	#[error("Failed to parse environment variable '{key}' (value length: {value_len}): {error}")]
	ParseError {
		key: String,
		/// Length of the original value (stored instead of the raw value)
		value_len: usize,
		error: String,
	},

	#[error("Invalid environment variable name '{name}': {reason}")]
	InvalidVariableName { name: String, reason: String },
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;

	#[rstest]
	#[serial(env)]
	fn test_env_str() {
		// SAFETY: serialized with every other test touching the environment
		unsafe {
			env::set_var("PRERENDER_TEST_STR", "hello");
		}
		let env = Env::new();
		assert_eq!(env.str("PRERENDER_TEST_STR").unwrap(), "hello");
		// SAFETY: see above
		unsafe {
			env::remove_var("PRERENDER_TEST_STR");
		}
	}

	#[rstest]
	fn test_env_str_with_default() {
		let env = Env::new();
		assert_eq!(
			env.str_with_default("PRERENDER_NONEXISTENT", Some("default"))
				.unwrap(),
			"default"
		);
	}

	#[rstest]
	#[serial(env)]
	fn test_env_bool_and_int_with_prefix() {
		// SAFETY: serialized with every other test touching the environment
		unsafe {
			env::set_var("PRERENDER_T_FLAG", "on");
			env::set_var("PRERENDER_T_CAPACITY", "250");
		}
		let env = Env::new().with_prefix("PRERENDER_T_");

		assert!(env.bool("FLAG").unwrap());
		assert_eq!(env.int("CAPACITY").unwrap(), 250);

		// SAFETY: see above
		unsafe {
			env::remove_var("PRERENDER_T_FLAG");
			env::remove_var("PRERENDER_T_CAPACITY");
		}
	}

	#[rstest]
	#[serial(env)]
	fn test_env_environment() {
		// SAFETY: serialized with every other test touching the environment
		unsafe {
			env::set_var("PRERENDER_T_ENV", "production");
		}
		let env = Env::new().with_prefix("PRERENDER_T_");
		assert_eq!(env.environment("ENV").unwrap(), Environment::Production);
		// SAFETY: see above
		unsafe {
			env::remove_var("PRERENDER_T_ENV");
		}
	}

	#[rstest]
	#[serial(env)]
	fn test_env_bool_parse_error_does_not_leak_value() {
		// SAFETY: serialized with every other test touching the environment
		unsafe {
			env::set_var("PRERENDER_T_BAD_FLAG", "maybe");
		}
		let env = Env::new();

		let err = env.bool("PRERENDER_T_BAD_FLAG").unwrap_err();

		assert!(matches!(err, EnvError::ParseError { value_len: 5, .. }));
		// SAFETY: see above
		unsafe {
			env::remove_var("PRERENDER_T_BAD_FLAG");
		}
	}

	#[rstest]
	fn test_missing_variable() {
		let env = Env::new();
		let err = env.int("PRERENDER_SURELY_UNSET_INT").unwrap_err();
		assert!(matches!(err, EnvError::MissingVariable(name) if name == "PRERENDER_SURELY_UNSET_INT"));
	}

	#[rstest]
	#[case("a,b,c", vec!["a", "b", "c"])]
	#[case(" ui , themes ", vec!["ui", "themes"])]
	#[case("ui,,", vec!["ui"])]
	#[case("", vec![])]
	fn test_parse_list(#[case] input: &str, #[case] expected: Vec<&str>) {
		assert_eq!(parse_list(input), expected);
	}

	#[rstest]
	fn test_validate_env_var_name_rejects_empty() {
		// Arrange & Act
		let result = validate_env_var_name("");

		// Assert
		assert!(matches!(
			result.unwrap_err(),
			EnvError::InvalidVariableName { .. }
		));
	}

	#[rstest]
	fn test_validate_env_var_name_rejects_control_chars() {
		// Arrange & Act
		let result = validate_env_var_name("MY\x00VAR");

		// Assert
		match result.unwrap_err() {
			EnvError::InvalidVariableName { reason, .. } => {
				assert!(reason.contains("control character"));
			}
			_ => panic!("Expected InvalidVariableName error"),
		}
	}

	#[rstest]
	fn test_validate_env_var_name_rejects_equals_sign() {
		match validate_env_var_name("MY=VAR").unwrap_err() {
			EnvError::InvalidVariableName { reason, .. } => {
				assert!(reason.contains("'='"));
			}
			_ => panic!("Expected InvalidVariableName error"),
		}
	}

	#[rstest]
	fn test_env_rejects_empty_key_name() {
		let env = Env::new();
		assert!(matches!(
			env.str("").unwrap_err(),
			EnvError::InvalidVariableName { .. }
		));
	}
}
