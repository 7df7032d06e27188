//! # Prerender Stats
//!
//! Fire-and-forget telemetry counters for the server-side renderer.
//!
//! Emission never blocks the caller and never reports failure: a stat is
//! either delivered in the background or silently dropped.
//!
//! ## Emitters
//!
//! - [`PixelStatEmitter`]: GET request to a tracking pixel, production only
//! - [`NoopStatEmitter`]: discards everything
//! - `RecordingStatEmitter` (feature `testing`): keeps every stat for assertions

mod emitter;
mod error;
mod pixel;
#[cfg(any(test, feature = "testing"))]
mod recording;

pub use emitter::{NoopStatEmitter, StatEmitter};
pub use error::StatError;
pub use pixel::PixelStatEmitter;
#[cfg(any(test, feature = "testing"))]
pub use recording::RecordingStatEmitter;

/// Stat group used by the render orchestrator
pub const STAT_GROUP: &str = "ssr";

/// Emitted whenever a render misses the markup cache
pub const CACHE_MISS: &str = "cache-miss";

/// Emitted whenever a render exceeds the slow-render threshold
pub const SLOW_RENDER: &str = "over-15ms-rendertostring";
