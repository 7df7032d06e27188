//! Settings validation
//!
//! Checks run after deserialization so that a misconfigured process fails
//! at startup instead of on the first request.

use super::PrerenderSettings;

/// Validation result
pub type ValidationResult = Result<(), ValidationError>;

/// Validation error
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
	#[error("Invalid value for '{key}': {message}")]
	InvalidValue { key: String, message: String },

	#[error("Multiple validation errors: {0:?}")]
	Multiple(Vec<ValidationError>),
}

impl ValidationError {
	fn invalid(key: &str, message: impl Into<String>) -> Self {
		ValidationError::InvalidValue {
			key: key.to_string(),
			message: message.into(),
		}
	}
}

/// Validates a complete settings value
///
/// # Examples
///
/// ```
/// use prerender_conf::PrerenderSettings;
/// use prerender_conf::settings::validation::validate;
///
/// assert!(validate(&PrerenderSettings::default()).is_ok());
///
/// let broken = PrerenderSettings { cache_capacity: 0, ..Default::default() };
/// assert!(validate(&broken).is_err());
/// ```
pub fn validate(settings: &PrerenderSettings) -> ValidationResult {
	let mut errors = Vec::new();

	if settings.cache_capacity == 0 {
		errors.push(ValidationError::invalid(
			"cache_capacity",
			"must be greater than zero",
		));
	}

	match url::Url::parse(&settings.stats_endpoint) {
		Ok(url) if matches!(url.scheme(), "http" | "https") => {}
		Ok(url) => errors.push(ValidationError::invalid(
			"stats_endpoint",
			format!("unsupported scheme '{}'", url.scheme()),
		)),
		Err(e) => errors.push(ValidationError::invalid("stats_endpoint", e.to_string())),
	}

	if settings.template_name.trim().is_empty() {
		errors.push(ValidationError::invalid("template_name", "must not be empty"));
	}

	if settings.state_keys.iter().any(|k| k.trim().is_empty()) {
		errors.push(ValidationError::invalid(
			"state_keys",
			"must not contain empty keys",
		));
	}

	match errors.len() {
		0 => Ok(()),
		1 => Err(errors.remove(0)),
		_ => Err(ValidationError::Multiple(errors)),
	}
}
