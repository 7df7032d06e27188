//! Document head declarations.
//!
//! A [`Head`] is attached to a page subtree with [`Page::with_head`] and
//! describes the `<title>`, `<meta>` and `<link>` elements the page wants in
//! the surrounding document. The render engine reports it through a
//! [`HeadCollector`](crate::ssr::HeadCollector).
//!
//! [`Page::with_head`]: super::Page::with_head

use super::util::html_escape;
use serde::{Deserialize, Serialize};

/// Title, meta and link elements requested by a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Head {
	/// Document title.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// `<meta>` elements.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub meta_tags: Vec<MetaTag>,
	/// `<link>` elements.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub links: Vec<LinkTag>,
}

impl Head {
	/// Creates an empty head.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the title.
	pub fn title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	/// Adds a meta tag.
	pub fn meta(mut self, meta: MetaTag) -> Self {
		self.meta_tags.push(meta);
		self
	}

	/// Adds a link tag.
	pub fn link(mut self, link: LinkTag) -> Self {
		self.links.push(link);
		self
	}

	/// Whether nothing was declared.
	pub fn is_empty(&self) -> bool {
		self.title.is_none() && self.meta_tags.is_empty() && self.links.is_empty()
	}
}

/// A `<meta>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaTag {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub property: Option<String>,
	pub content: String,
}

impl MetaTag {
	/// `<meta name=".." content="..">`
	pub fn name(name: impl Into<String>, content: impl Into<String>) -> Self {
		Self {
			name: Some(name.into()),
			property: None,
			content: content.into(),
		}
	}

	/// `<meta property=".." content="..">`, as used by Open Graph.
	pub fn property(property: impl Into<String>, content: impl Into<String>) -> Self {
		Self {
			name: None,
			property: Some(property.into()),
			content: content.into(),
		}
	}

	/// Renders the element followed by a newline.
	pub fn to_html(&self) -> String {
		let mut html = String::from("<meta");
		if let Some(name) = &self.name {
			html.push_str(&format!(" name=\"{}\"", html_escape(name)));
		}
		if let Some(property) = &self.property {
			html.push_str(&format!(" property=\"{}\"", html_escape(property)));
		}
		html.push_str(&format!(" content=\"{}\">\n", html_escape(&self.content)));
		html
	}
}

/// A `<link>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTag {
	pub rel: String,
	pub href: String,
	#[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
	pub mime_type: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub media: Option<String>,
}

impl LinkTag {
	pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
		Self {
			rel: rel.into(),
			href: href.into(),
			mime_type: None,
			media: None,
		}
	}

	/// `<link rel="stylesheet" href="..">`
	pub fn stylesheet(href: impl Into<String>) -> Self {
		Self::new("stylesheet", href)
	}

	/// `<link rel="canonical" href="..">`
	pub fn canonical(href: impl Into<String>) -> Self {
		Self::new("canonical", href)
	}

	pub fn with_type(mut self, mime_type: impl Into<String>) -> Self {
		self.mime_type = Some(mime_type.into());
		self
	}

	pub fn with_media(mut self, media: impl Into<String>) -> Self {
		self.media = Some(media.into());
		self
	}

	/// Renders the element followed by a newline.
	pub fn to_html(&self) -> String {
		let mut html = format!(
			"<link rel=\"{}\" href=\"{}\"",
			html_escape(&self.rel),
			html_escape(&self.href)
		);
		if let Some(mime_type) = &self.mime_type {
			html.push_str(&format!(" type=\"{}\"", html_escape(mime_type)));
		}
		if let Some(media) = &self.media {
			html.push_str(&format!(" media=\"{}\"", html_escape(media)));
		}
		html.push_str(">\n");
		html
	}
}
