//! # Prerender Configuration
//!
//! Settings management for the prerender server-side rendering cache.
//!
//! Settings are assembled from layered sources, merged in priority order
//! (environment variables > .env files > config files > defaults), then
//! deserialized into a typed [`PrerenderSettings`] and validated.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use prerender_conf::settings::prelude::*;
//!
//! let settings = SettingsBuilder::new()
//!     .add_source(DefaultSource::new())
//!     .add_source(TomlFileSource::new("prerender.toml"))
//!     .add_source(EnvSource::new().with_prefix("PRERENDER_"))
//!     .build()
//!     .unwrap();
//!
//! assert!(settings.cache_capacity > 0);
//! ```
//!
//! ## Module Organization
//!
//! - [`settings`]: Settings types, sources, environment helpers and validation

pub mod settings;

pub use settings::{
	Environment, PrerenderSettings, SettingsBuilder, SettingsError, TimingScope,
	DEFAULT_ENV_PREFIX,
};
