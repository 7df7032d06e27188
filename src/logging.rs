//! Log output for processes embedding the renderer.
//!
//! The library crates only emit `tracing` events. Installing a subscriber is
//! left to the application; [`init`] covers the common case.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Installs a global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence; when it is unset or unparsable,
/// `default_level` applies to every target. Returns `false` if a global
/// subscriber was already installed, so repeated calls are harmless.
///
/// # Examples
///
/// ```
/// use tracing::level_filters::LevelFilter;
///
/// prerender::logging::init(LevelFilter::WARN);
/// assert!(!prerender::logging::init(LevelFilter::DEBUG));
/// ```
pub fn init(default_level: LevelFilter) -> bool {
	let filter = env_filter(default_level);
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(true)
		.try_init()
		.is_ok()
}

fn env_filter(default_level: LevelFilter) -> EnvFilter {
	EnvFilter::builder()
		.with_default_directive(default_level.into())
		.from_env_lossy()
}
