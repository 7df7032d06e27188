use std::sync::Arc;

/// Sink for named telemetry counters
///
/// Implementations must return promptly: any network or I/O work happens
/// in the background, and failures are absorbed.
pub trait StatEmitter: Send + Sync {
	/// Record one occurrence of `name` within `group`
	fn emit(&self, group: &str, name: &str);
}

impl<T: StatEmitter + ?Sized> StatEmitter for Arc<T> {
	fn emit(&self, group: &str, name: &str) {
		(**self).emit(group, name);
	}
}

impl<T: StatEmitter + ?Sized> StatEmitter for Box<T> {
	fn emit(&self, group: &str, name: &str) {
		(**self).emit(group, name);
	}
}

/// Emitter that discards every stat
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStatEmitter;

impl StatEmitter for NoopStatEmitter {
	fn emit(&self, _group: &str, _name: &str) {}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::RecordingStatEmitter;

	#[test]
	fn test_arc_forwards_to_inner() {
		let recorder = Arc::new(RecordingStatEmitter::new());
		let shared: Arc<dyn StatEmitter> = recorder.clone();

		shared.emit("ssr", "cache-miss");
		Arc::clone(&recorder).emit("ssr", "cache-miss");

		assert_eq!(recorder.count("ssr", "cache-miss"), 2);
	}

	#[test]
	fn test_noop_is_object_safe() {
		let emitter: Box<dyn StatEmitter> = Box::new(NoopStatEmitter);
		emitter.emit("ssr", "cache-miss");
	}
}
