/// Errors raised while constructing an emitter
///
/// Emission itself never fails.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StatError {
	#[error("Invalid stats endpoint '{endpoint}': {reason}")]
	InvalidEndpoint { endpoint: String, reason: String },

	#[error("Failed to build HTTP client: {0}")]
	Client(#[from] reqwest::Error),
}
