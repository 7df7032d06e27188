use crate::StatEmitter;
use parking_lot::Mutex;

/// Emitter that keeps every `(group, name)` pair in memory
#[derive(Debug, Default)]
pub struct RecordingStatEmitter {
	records: Mutex<Vec<(String, String)>>,
}

impl RecordingStatEmitter {
	pub fn new() -> Self {
		Self::default()
	}

	/// All recorded stats in emission order
	pub fn records(&self) -> Vec<(String, String)> {
		self.records.lock().clone()
	}

	/// How many times `(group, name)` was emitted
	pub fn count(&self, group: &str, name: &str) -> usize {
		self.records
			.lock()
			.iter()
			.filter(|(g, n)| g == group && n == name)
			.count()
	}

	pub fn len(&self) -> usize {
		self.records.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.lock().is_empty()
	}

	pub fn clear(&self) {
		self.records.lock().clear();
	}
}

impl StatEmitter for RecordingStatEmitter {
	fn emit(&self, group: &str, name: &str) {
		self.records
			.lock()
			.push((group.to_string(), name.to_string()));
	}
}
