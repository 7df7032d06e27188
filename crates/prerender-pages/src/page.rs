//! Page tree.
//!
//! [`Page`] is the renderable tree consumed by [`SsrRenderer`]. It can
//! represent elements, text nodes, fragments, empty nodes and subtrees that
//! carry a [`Head`].
//!
//! Pages are plain data: they serialize with serde, which is how the
//! render cache derives a key from a tree.
//!
//! ## Example
//!
//! ```
//! use prerender_pages::page::{Head, IntoPage, Page, PageElement};
//!
//! let page = PageElement::new("div")
//!     .attr("class", "container")
//!     .child("Hello, World!")
//!     .into_page()
//!     .with_head(Head::new().title("Greeting"));
//!
//! assert_eq!(page.render_to_string(), "<div class=\"container\">Hello, World!</div>");
//! assert_eq!(page.find_topmost_head().unwrap().title.as_deref(), Some("Greeting"));
//! ```
//!
//! [`SsrRenderer`]: crate::ssr::SsrRenderer

pub mod head;
mod util;

pub use head::{Head, LinkTag, MetaTag};
pub use util::{BOOLEAN_ATTRS, escape_json_for_script, html_escape, is_boolean_attr_truthy};

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A unified representation of renderable content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
	/// A DOM element.
	Element(PageElement),
	/// A text node.
	Text(Cow<'static, str>),
	/// Multiple pages without a wrapper element.
	Fragment(Vec<Page>),
	/// Renders nothing.
	Empty,
	/// A subtree with an associated head section.
	WithHead {
		/// The head section for this subtree.
		head: Head,
		/// The actual content.
		view: Box<Page>,
	},
}

/// A DOM element in the page tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageElement {
	tag: Cow<'static, str>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	attrs: Vec<(Cow<'static, str>, Cow<'static, str>)>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	children: Vec<Page>,
	#[serde(default)]
	is_void: bool,
}

impl PageElement {
	/// Creates a new element.
	pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
		let tag = tag.into();
		let is_void = util::is_void_element(&tag);
		Self {
			tag,
			attrs: Vec::new(),
			children: Vec::new(),
			is_void,
		}
	}

	/// Adds an attribute.
	pub fn attr(
		mut self,
		name: impl Into<Cow<'static, str>>,
		value: impl Into<Cow<'static, str>>,
	) -> Self {
		self.attrs.push((name.into(), value.into()));
		self
	}

	/// Adds a boolean attribute.
	///
	/// When `value` is true the attribute is added with its own name as value
	/// (e.g. `disabled="disabled"`); otherwise nothing is added.
	pub fn bool_attr(self, name: impl Into<Cow<'static, str>>, value: bool) -> Self {
		if value {
			let name = name.into();
			self.attr(name.clone(), name)
		} else {
			self
		}
	}

	/// Adds a child.
	pub fn child(mut self, child: impl IntoPage) -> Self {
		self.children.push(child.into_page());
		self
	}

	/// Adds multiple children.
	pub fn children(mut self, children: impl IntoIterator<Item = impl IntoPage>) -> Self {
		self.children
			.extend(children.into_iter().map(|c| c.into_page()));
		self
	}

	pub fn tag_name(&self) -> &str {
		&self.tag
	}

	pub fn attrs(&self) -> &[(Cow<'static, str>, Cow<'static, str>)] {
		&self.attrs
	}

	pub fn child_views(&self) -> &[Page] {
		&self.children
	}

	pub fn is_void(&self) -> bool {
		self.is_void
	}
}

impl Page {
	/// Creates an element.
	pub fn element(tag: impl Into<Cow<'static, str>>) -> PageElement {
		PageElement::new(tag)
	}

	/// Creates a text node.
	pub fn text(content: impl Into<Cow<'static, str>>) -> Self {
		Self::Text(content.into())
	}

	/// Creates a fragment.
	pub fn fragment(children: impl IntoIterator<Item = impl IntoPage>) -> Self {
		Self::Fragment(children.into_iter().map(|c| c.into_page()).collect())
	}

	/// Creates an empty page.
	pub fn empty() -> Self {
		Self::Empty
	}

	/// Attaches a head section to this page.
	pub fn with_head(self, head: Head) -> Self {
		Page::WithHead {
			head,
			view: Box::new(self),
		}
	}

	/// Finds the topmost head section in the tree.
	///
	/// The outermost (page-level) head takes precedence over heads declared
	/// by nested components:
	///
	/// 1. A `WithHead` node returns its own head
	/// 2. Fragments and elements search their children in order
	/// 3. Text and empty nodes have no head
	pub fn find_topmost_head(&self) -> Option<&Head> {
		match self {
			Page::WithHead { head, .. } => Some(head),
			Page::Fragment(children) => children.iter().find_map(|v| v.find_topmost_head()),
			Page::Element(el) => el.children.iter().find_map(|v| v.find_topmost_head()),
			Page::Text(_) | Page::Empty => None,
		}
	}

	/// Renders the tree to an HTML string.
	pub fn render_to_string(&self) -> String {
		let mut output = String::new();
		self.render_to_string_inner(&mut output);
		output
	}

	fn render_to_string_inner(&self, output: &mut String) {
		match self {
			Page::Element(el) => {
				output.push('<');
				output.push_str(el.tag_name());

				for (name, value) in el.attrs() {
					let name_str: &str = name.as_ref();
					if BOOLEAN_ATTRS.contains(&name_str) && !is_boolean_attr_truthy(value) {
						continue;
					}

					output.push(' ');
					output.push_str(name);
					output.push_str("=\"");
					output.push_str(&html_escape(value));
					output.push('"');
				}

				if el.is_void() {
					output.push_str(" />");
				} else {
					output.push('>');
					for child in el.child_views() {
						child.render_to_string_inner(output);
					}
					output.push_str("</");
					output.push_str(el.tag_name());
					output.push('>');
				}
			}
			Page::Text(text) => {
				output.push_str(&html_escape(text));
			}
			Page::Fragment(children) => {
				for child in children {
					child.render_to_string_inner(output);
				}
			}
			Page::Empty => {}
			Page::WithHead { view, .. } => {
				// Heads are reported separately; only the content is rendered here
				view.render_to_string_inner(output);
			}
		}
	}
}

/// Types that can be converted into a [`Page`].
pub trait IntoPage {
	fn into_page(self) -> Page;
}

impl IntoPage for Page {
	fn into_page(self) -> Page {
		self
	}
}

impl IntoPage for PageElement {
	fn into_page(self) -> Page {
		Page::Element(self)
	}
}

impl IntoPage for String {
	fn into_page(self) -> Page {
		Page::Text(Cow::Owned(self))
	}
}

impl IntoPage for &String {
	fn into_page(self) -> Page {
		Page::Text(Cow::Owned(self.clone()))
	}
}

impl IntoPage for &'static str {
	fn into_page(self) -> Page {
		Page::Text(Cow::Borrowed(self))
	}
}

impl<T: IntoPage> IntoPage for Option<T> {
	fn into_page(self) -> Page {
		match self {
			Some(v) => v.into_page(),
			None => Page::Empty,
		}
	}
}

impl<T: IntoPage> IntoPage for Vec<T> {
	fn into_page(self) -> Page {
		Page::Fragment(self.into_iter().map(|v| v.into_page()).collect())
	}
}

impl IntoPage for () {
	fn into_page(self) -> Page {
		Page::Empty
	}
}

impl<A: IntoPage, B: IntoPage> IntoPage for (A, B) {
	fn into_page(self) -> Page {
		Page::Fragment(vec![self.0.into_page(), self.1.into_page()])
	}
}

impl<A: IntoPage, B: IntoPage, C: IntoPage> IntoPage for (A, B, C) {
	fn into_page(self) -> Page {
		Page::Fragment(vec![
			self.0.into_page(),
			self.1.into_page(),
			self.2.into_page(),
		])
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_element_renders_attributes_and_children() {
		let page = PageElement::new("a")
			.attr("href", "/themes?sort=popular&tier=free")
			.child("Browse <themes>")
			.into_page();

		assert_eq!(
			page.render_to_string(),
			"<a href=\"/themes?sort=popular&amp;tier=free\">Browse &lt;themes&gt;</a>"
		);
	}

	#[rstest]
	fn test_void_element_self_closes() {
		let page = PageElement::new("img").attr("src", "/logo.png").into_page();
		assert_eq!(page.render_to_string(), "<img src=\"/logo.png\" />");
	}

	#[rstest]
	#[case("false", "<input />")]
	#[case("0", "<input />")]
	#[case("", "<input />")]
	#[case("disabled", "<input disabled=\"disabled\" />")]
	fn test_boolean_attributes(#[case] value: &'static str, #[case] expected: &str) {
		let page = PageElement::new("input").attr("disabled", value).into_page();
		assert_eq!(page.render_to_string(), expected);
	}

	#[rstest]
	fn test_bool_attr_builder() {
		let on = PageElement::new("button").bool_attr("disabled", true).into_page();
		let off = PageElement::new("button").bool_attr("disabled", false).into_page();
		assert_eq!(on.render_to_string(), "<button disabled=\"disabled\"></button>");
		assert_eq!(off.render_to_string(), "<button></button>");
	}

	#[rstest]
	fn test_fragment_and_empty() {
		let page = ("one", Page::empty(), PageElement::new("br")).into_page();
		assert_eq!(page.render_to_string(), "one<br />");
	}

	#[rstest]
	fn test_with_head_renders_only_content() {
		let page = Page::text("body").with_head(Head::new().title("Title"));
		assert_eq!(page.render_to_string(), "body");
	}

	#[rstest]
	fn test_find_topmost_head_prefers_outermost() {
		// Arrange
		let inner = Page::text("inner").with_head(Head::new().title("Inner"));
		let page = PageElement::new("main")
			.child(inner)
			.into_page()
			.with_head(Head::new().title("Outer"));

		// Act
		let head = page.find_topmost_head();

		// Assert
		assert_eq!(head.unwrap().title.as_deref(), Some("Outer"));
	}

	#[rstest]
	fn test_find_topmost_head_searches_element_children() {
		let page = PageElement::new("main")
			.child(Page::text("x"))
			.child(Page::text("nested").with_head(Head::new().title("Nested")))
			.into_page();

		assert_eq!(
			page.find_topmost_head().unwrap().title.as_deref(),
			Some("Nested")
		);
		assert!(Page::text("plain").find_topmost_head().is_none());
	}

	#[rstest]
	fn test_page_serde_round_trip_preserves_structure() {
		let page = PageElement::new("ul")
			.children(vec!["a", "b"].into_iter().map(|s| PageElement::new("li").child(s)))
			.into_page();

		let json = serde_json::to_string(&page).unwrap();
		let back: Page = serde_json::from_str(&json).unwrap();

		assert_eq!(back, page);
	}
}
