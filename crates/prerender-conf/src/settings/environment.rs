//! Deployment environment of the running process.
//!
//! The environment drives two policies: whether render failures are surfaced
//! to the caller (development) or degrade to client-side rendering, and
//! whether telemetry is actually sent (production only).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deployment environment
///
/// Unknown names are preserved in [`Environment::Other`] so that
/// configuration such as `env = "staging"` round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Environment {
	/// Local development: failures are loud, telemetry is off.
	#[default]
	Development,
	/// Production: failures degrade silently, telemetry is on.
	Production,
	/// Automated test runs.
	Test,
	/// Any other named environment (e.g. "staging").
	Other(String),
}

impl Environment {
	/// Returns the canonical lowercase name.
	///
	/// # Examples
	///
	/// ```
	/// use prerender_conf::Environment;
	///
	/// assert_eq!(Environment::Production.as_str(), "production");
	/// assert_eq!(Environment::Other("staging".into()).as_str(), "staging");
	/// ```
	pub fn as_str(&self) -> &str {
		match self {
			Environment::Development => "development",
			Environment::Production => "production",
			Environment::Test => "test",
			Environment::Other(name) => name,
		}
	}

	/// Whether render failures should propagate to the caller.
	pub fn is_development(&self) -> bool {
		matches!(self, Environment::Development)
	}

	/// Whether telemetry should be emitted.
	pub fn is_production(&self) -> bool {
		matches!(self, Environment::Production)
	}

	/// Name of the .env file associated with this environment
	///
	/// # Examples
	///
	/// ```
	/// use prerender_conf::Environment;
	///
	/// assert_eq!(Environment::Production.env_file_name(), ".env.production");
	/// ```
	pub fn env_file_name(&self) -> String {
		format!(".env.{}", self.as_str())
	}
}

/// Only the exact lowercase names map to the known variants; anything else,
/// including `"dev"` or `"Production"`, is kept verbatim in
/// [`Environment::Other`].
impl From<&str> for Environment {
	fn from(value: &str) -> Self {
		match value {
			"development" => Environment::Development,
			"production" => Environment::Production,
			"test" => Environment::Test,
			_ => Environment::Other(value.to_string()),
		}
	}
}

impl From<String> for Environment {
	fn from(value: String) -> Self {
		Environment::from(value.as_str())
	}
}

impl From<Environment> for String {
	fn from(value: Environment) -> Self {
		value.as_str().to_string()
	}
}

impl FromStr for Environment {
	type Err = std::convert::Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Environment::from(s))
	}
}

impl fmt::Display for Environment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("development", Environment::Development)]
	#[case("production", Environment::Production)]
	#[case("test", Environment::Test)]
	#[case("staging", Environment::Other("staging".to_string()))]
	#[case("dev", Environment::Other("dev".to_string()))]
	#[case("Production", Environment::Other("Production".to_string()))]
	#[case(" production ", Environment::Other(" production ".to_string()))]
	#[case("testing", Environment::Other("testing".to_string()))]
	fn test_environment_from_str(#[case] input: &str, #[case] expected: Environment) {
		// Act
		let env: Environment = input.parse().unwrap();

		// Assert
		assert_eq!(env, expected);
	}

	#[rstest]
	#[case("dev")]
	#[case("prod")]
	#[case("Development")]
	fn test_aliases_round_trip_unchanged(#[case] name: &str) {
		// Act
		let env = Environment::from(name);

		// Assert
		assert!(!env.is_development());
		assert!(!env.is_production());
		assert_eq!(env.to_string(), name);
	}

	#[rstest]
	fn test_only_development_is_development() {
		assert!(Environment::Development.is_development());
		assert!(!Environment::Production.is_development());
		assert!(!Environment::Test.is_development());
		assert!(!Environment::Other("staging".into()).is_development());
	}

	#[rstest]
	fn test_only_production_is_production() {
		assert!(Environment::Production.is_production());
		assert!(!Environment::Development.is_production());
		assert!(!Environment::Other("production-eu".into()).is_production());
	}

	#[rstest]
	fn test_environment_serde_as_plain_string() {
		// Arrange
		let env = Environment::Other("staging".to_string());

		// Act
		let json = serde_json::to_string(&env).unwrap();
		let back: Environment = serde_json::from_str("\"production\"").unwrap();

		// Assert
		assert_eq!(json, "\"staging\"");
		assert_eq!(back, Environment::Production);
	}
}
