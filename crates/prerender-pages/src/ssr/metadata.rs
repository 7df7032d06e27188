//! Document metadata produced as a side effect of rendering.

use crate::page::{Head, LinkTag, MetaTag};
use serde::{Deserialize, Serialize};

/// Title, meta and link data extracted after a render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
	pub title: Option<String>,
	pub meta: Vec<MetaTag>,
	pub link: Vec<LinkTag>,
}

impl From<Head> for DocumentMetadata {
	fn from(head: Head) -> Self {
		Self {
			title: head.title,
			meta: head.meta_tags,
			link: head.links,
		}
	}
}

/// Captures the head an engine reports during a single render call.
///
/// A collector is created fresh for every call, so metadata from one render
/// can never leak into the result of another.
///
/// # Examples
///
/// ```
/// use prerender_pages::page::Head;
/// use prerender_pages::ssr::HeadCollector;
///
/// let mut collector = HeadCollector::new();
/// assert!(!collector.peek());
///
/// collector.record(Head::new().title("Themes"));
/// assert!(collector.peek());
///
/// let metadata = collector.extract_and_reset().unwrap();
/// assert_eq!(metadata.title.as_deref(), Some("Themes"));
/// assert!(!collector.peek());
/// ```
#[derive(Debug, Default)]
pub struct HeadCollector {
	head: Option<Head>,
}

impl HeadCollector {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records a head reported by the engine.
	///
	/// The first head recorded wins; engines report the outermost head first.
	pub fn record(&mut self, head: Head) {
		if self.head.is_none() {
			self.head = Some(head);
		}
	}

	/// Whether metadata is pending.
	pub fn peek(&self) -> bool {
		self.head.is_some()
	}

	/// Takes the pending metadata, leaving the collector empty.
	pub fn extract_and_reset(&mut self) -> Option<DocumentMetadata> {
		self.head.take().map(DocumentMetadata::from)
	}
}
