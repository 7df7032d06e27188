//! Complete HTML document responder.

use super::composer::{ResponseContext, TemplateResponder};
use crate::page::{LinkTag, MetaTag, escape_json_for_script, html_escape};
use prerender_conf::PrerenderSettings;

/// `id` of the script element carrying the initial state.
pub const INITIAL_STATE_SCRIPT_ID: &str = "initial-state";

/// Wraps the prerendered layout in a full HTML document.
///
/// The template name is ignored: the document shape is fixed. Head fields
/// and the initial state are read from the response context.
///
/// # Examples
///
/// ```
/// use prerender_pages::ssr::{HtmlPageResponder, ResponseContext, TemplateResponder};
///
/// let mut context = ResponseContext::new();
/// context.insert(ResponseContext::RENDERED_LAYOUT, "<h1>Themes</h1>");
/// context.insert(ResponseContext::HEAD_TITLE, "Themes");
///
/// let html = HtmlPageResponder::new().render("index.html", &context).unwrap();
///
/// assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
/// assert!(html.contains("<title>Themes</title>"));
/// assert!(html.contains("<div id=\"app\"><h1>Themes</h1></div>"));
/// ```
#[derive(Debug, Clone)]
pub struct HtmlPageResponder {
	lang: String,
}

impl Default for HtmlPageResponder {
	fn default() -> Self {
		Self {
			lang: "en".to_string(),
		}
	}
}

impl HtmlPageResponder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn from_settings(settings: &PrerenderSettings) -> Self {
		Self::new().lang(settings.lang.clone())
	}

	/// Sets the `lang` attribute of the document.
	pub fn lang(mut self, lang: impl Into<String>) -> Self {
		self.lang = lang.into();
		self
	}
}

impl TemplateResponder for HtmlPageResponder {
	type Output = String;
	type Error = serde_json::Error;

	fn render(&self, _template: &str, context: &ResponseContext) -> Result<String, serde_json::Error> {
		let content = context.rendered_layout().unwrap_or_default();
		let meta_tags: Vec<MetaTag> = match context.get(ResponseContext::HEAD_META) {
			Some(value) => serde_json::from_value(value.clone())?,
			None => Vec::new(),
		};
		let links: Vec<LinkTag> = match context.get(ResponseContext::HEAD_LINK) {
			Some(value) => serde_json::from_value(value.clone())?,
			None => Vec::new(),
		};

		let mut html = String::with_capacity(content.len() + 1024);

		html.push_str("<!DOCTYPE html>\n");
		html.push_str(&format!("<html lang=\"{}\">\n", html_escape(&self.lang)));

		html.push_str("<head>\n");
		html.push_str("<meta charset=\"UTF-8\">\n");
		html.push_str(
			"<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
		);
		if let Some(title) = context.head_title() {
			html.push_str(&format!("<title>{}</title>\n", html_escape(title)));
		}
		for meta in &meta_tags {
			html.push_str(&meta.to_html());
		}
		for link in &links {
			html.push_str(&link.to_html());
		}
		html.push_str("</head>\n");

		html.push_str("<body>\n");
		html.push_str("<div id=\"app\">");
		html.push_str(content);
		html.push_str("</div>\n");

		if let Some(state) = context.initial_state() {
			let json = serde_json::to_string(state)?;
			html.push_str(&format!(
				"<script id=\"{}\" type=\"application/json\">{}</script>\n",
				INITIAL_STATE_SCRIPT_ID,
				escape_json_for_script(&json)
			));
		}

		html.push_str("</body>\n");
		html.push_str("</html>");
		Ok(html)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_full_document() {
		// Arrange
		let mut context = ResponseContext::new();
		context.insert(ResponseContext::RENDERED_LAYOUT, "<main>hi</main>");
		context.insert(ResponseContext::HEAD_TITLE, "A & B");
		context.insert(
			ResponseContext::HEAD_META,
			json!([{"name": "description", "content": "Themes"}]),
		);
		context.insert(
			ResponseContext::HEAD_LINK,
			json!([{"rel": "canonical", "href": "https://example.com/"}]),
		);
		context.insert(ResponseContext::INITIAL_STATE, json!({"ui": {"x": 1}}));

		// Act
		let html = HtmlPageResponder::new().lang("fr").render("index.html", &context).unwrap();

		// Assert
		assert_eq!(
			html,
			"<!DOCTYPE html>\n\
			 <html lang=\"fr\">\n\
			 <head>\n\
			 <meta charset=\"UTF-8\">\n\
			 <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
			 <title>A &amp; B</title>\n\
			 <meta name=\"description\" content=\"Themes\">\n\
			 <link rel=\"canonical\" href=\"https://example.com/\">\n\
			 </head>\n\
			 <body>\n\
			 <div id=\"app\"><main>hi</main></div>\n\
			 <script id=\"initial-state\" type=\"application/json\">{\"ui\":{\"x\":1}}</script>\n\
			 </body>\n\
			 </html>"
		);
	}

	#[rstest]
	fn test_state_script_is_escaped() {
		let mut context = ResponseContext::new();
		context.insert(
			ResponseContext::INITIAL_STATE,
			json!({"ui": "</script><script>alert(1)</script>"}),
		);

		let html = HtmlPageResponder::new().render("index.html", &context).unwrap();

		assert!(!html.contains("</script><script>alert(1)"));
		assert!(html.contains("<\\/script><script>alert(1)<\\/script>"));
	}

	#[rstest]
	fn test_empty_context_renders_shell() {
		let html = HtmlPageResponder::new()
			.render("index.html", &ResponseContext::new())
			.unwrap();

		assert!(html.contains("<div id=\"app\"></div>"));
		assert!(!html.contains("<title>"));
		assert!(!html.contains(INITIAL_STATE_SCRIPT_ID));
	}

	#[rstest]
	fn test_malformed_head_meta_is_an_error() {
		let mut context = ResponseContext::new();
		context.insert(ResponseContext::HEAD_META, json!("not a list"));

		assert!(HtmlPageResponder::new().render("index.html", &context).is_err());
	}
}
