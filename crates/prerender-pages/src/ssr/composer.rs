//! Request-level composition of a render into a response.

use super::cached::{CachedRenderer, RenderResult};
use super::engine::{RenderEngine, RenderError};
use prerender_cache::CacheKey;
use prerender_conf::PrerenderSettings;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::error::Error as StdError;
use std::sync::Arc;
use url::Url;

/// Errors raised while composing a response
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
	#[error(transparent)]
	Render(#[from] RenderError),

	#[error("Invalid request URL '{url}': {source}")]
	InvalidUrl {
		url: String,
		#[source]
		source: url::ParseError,
	},

	#[error("Template responder failed: {0}")]
	Responder(#[source] Box<dyn StdError + Send + Sync>),
}

/// Source of the application state embedded in a page.
pub trait StateStore: Send + Sync {
	fn get_state(&self) -> Value;
}

impl StateStore for Value {
	fn get_state(&self) -> Value {
		self.clone()
	}
}

impl<S: StateStore + ?Sized> StateStore for Arc<S> {
	fn get_state(&self) -> Value {
		(**self).get_state()
	}
}

/// Key/value bag handed to the template responder.
///
/// The composer owns four keys ([`RENDERED_LAYOUT`](Self::RENDERED_LAYOUT),
/// [`HEAD_TITLE`](Self::HEAD_TITLE), [`HEAD_META`](Self::HEAD_META),
/// [`HEAD_LINK`](Self::HEAD_LINK)) plus [`INITIAL_STATE`](Self::INITIAL_STATE);
/// every other entry belongs to the caller and is passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseContext {
	values: Map<String, Value>,
}

impl ResponseContext {
	pub const RENDERED_LAYOUT: &'static str = "rendered_layout";
	pub const HEAD_TITLE: &'static str = "head_title";
	pub const HEAD_META: &'static str = "head_meta";
	pub const HEAD_LINK: &'static str = "head_link";
	pub const INITIAL_STATE: &'static str = "initial_state";

	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.values.get(key)
	}

	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.values.insert(key.into(), value.into())
	}

	pub fn remove(&mut self, key: &str) -> Option<Value> {
		self.values.remove(key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.values.contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn as_map(&self) -> &Map<String, Value> {
		&self.values
	}

	pub fn into_map(self) -> Map<String, Value> {
		self.values
	}

	pub fn rendered_layout(&self) -> Option<&str> {
		self.get(Self::RENDERED_LAYOUT).and_then(Value::as_str)
	}

	pub fn head_title(&self) -> Option<&str> {
		self.get(Self::HEAD_TITLE).and_then(Value::as_str)
	}

	pub fn initial_state(&self) -> Option<&Value> {
		self.get(Self::INITIAL_STATE)
	}

	/// Merges the fields of a render result.
	///
	/// The layout is always written; head fields only when the result carries
	/// metadata. Other keys are left alone.
	pub fn merge_result(&mut self, result: &RenderResult) -> Result<(), serde_json::Error> {
		self.insert(Self::RENDERED_LAYOUT, result.markup.clone());
		if let Some(metadata) = &result.metadata {
			self.insert(
				Self::HEAD_TITLE,
				metadata.title.clone().map_or(Value::Null, Value::String),
			);
			self.insert(Self::HEAD_META, serde_json::to_value(&metadata.meta)?);
			self.insert(Self::HEAD_LINK, serde_json::to_value(&metadata.link)?);
		}
		Ok(())
	}
}

impl From<Map<String, Value>> for ResponseContext {
	fn from(values: Map<String, Value>) -> Self {
		Self { values }
	}
}

/// Per-request input to [`ResponseComposer::compose`].
pub struct RenderContext<T> {
	/// Request URL, absolute or origin-relative
	pub url: String,
	/// Tree to prerender; without one only the initial state is prepared
	pub layout: Option<T>,
	/// Application state
	pub store: Arc<dyn StateStore>,
	/// Values handed to the responder
	pub response: ResponseContext,
}

impl<T> RenderContext<T> {
	pub fn new(url: impl Into<String>, store: impl StateStore + 'static) -> Self {
		Self {
			url: url.into(),
			layout: None,
			store: Arc::new(store),
			response: ResponseContext::new(),
		}
	}

	pub fn with_layout(mut self, layout: T) -> Self {
		self.layout = Some(layout);
		self
	}

	pub fn with_response(mut self, response: ResponseContext) -> Self {
		self.response = response;
		self
	}
}

/// Final step turning a response context into a response.
pub trait TemplateResponder {
	type Output;
	type Error: StdError + Send + Sync + 'static;

	fn render(&self, template: &str, context: &ResponseContext) -> Result<Self::Output, Self::Error>;
}

/// Prerenders a request's layout and hands the merged context to a responder
///
/// When server-side rendering is switched off the context passes through
/// to the responder unchanged.
pub struct ResponseComposer<E: RenderEngine, R> {
	renderer: Arc<CachedRenderer<E>>,
	responder: R,
	server_side_rendering: bool,
	template_name: String,
	state_keys: Vec<String>,
}

impl<E: RenderEngine, R: TemplateResponder> ResponseComposer<E, R> {
	pub fn new(renderer: Arc<CachedRenderer<E>>, responder: R) -> Self {
		let defaults = PrerenderSettings::default();
		Self {
			renderer,
			responder,
			server_side_rendering: defaults.server_side_rendering,
			template_name: defaults.template_name,
			state_keys: defaults.state_keys,
		}
	}

	pub fn from_settings(
		renderer: Arc<CachedRenderer<E>>,
		responder: R,
		settings: &PrerenderSettings,
	) -> Self {
		Self {
			renderer,
			responder,
			server_side_rendering: settings.server_side_rendering,
			template_name: settings.template_name.clone(),
			state_keys: settings.state_keys.clone(),
		}
	}

	pub fn server_side_rendering(mut self, enabled: bool) -> Self {
		self.server_side_rendering = enabled;
		self
	}

	pub fn template_name(mut self, name: impl Into<String>) -> Self {
		self.template_name = name.into();
		self
	}

	pub fn state_keys<I, S>(mut self, keys: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.state_keys = keys.into_iter().map(Into::into).collect();
		self
	}

	pub fn renderer(&self) -> &Arc<CachedRenderer<E>> {
		&self.renderer
	}

	pub fn responder(&self) -> &R {
		&self.responder
	}

	/// Runs the request through the prerender step and the responder.
	pub fn compose(&self, mut context: RenderContext<E::Tree>) -> Result<R::Output, ComposeError> {
		if self.server_side_rendering {
			self.prerender(&mut context)?;
		}
		self.responder
			.render(&self.template_name, &context.response)
			.map_err(|e| ComposeError::Responder(Box::new(e)))
	}

	/// Fills `context.response` with the initial state and, when a layout is
	/// present, the render result.
	///
	/// The cache key combines the previously rendered layout, the request path
	/// and the initial state, so the same layout prerendered for two paths or
	/// two states is cached separately.
	pub fn prerender(&self, context: &mut RenderContext<E::Tree>) -> Result<(), ComposeError> {
		let initial_state = project_state(&context.store.get_state(), &self.state_keys);
		context
			.response
			.insert(ResponseContext::INITIAL_STATE, initial_state.clone());

		let path = request_path(&context.url)?;
		let previous = context
			.response
			.get(ResponseContext::RENDERED_LAYOUT)
			.cloned()
			.unwrap_or(Value::Null);
		let key = CacheKey::new(format!("{}{}{}", previous, path, initial_state));

		let Some(layout) = context.layout.as_ref() else {
			tracing::debug!(url = %context.url, "no layout to prerender");
			return Ok(());
		};

		if let Some(result) = self.renderer.render_with_fallback(layout, Some(key))? {
			context
				.response
				.merge_result(&result)
				.map_err(RenderError::from)?;
		}
		Ok(())
	}
}

/// Object containing only `keys` of `state`; missing keys are skipped.
///
/// # Examples
///
/// ```
/// use prerender_pages::ssr::project_state;
/// use serde_json::json;
///
/// let state = json!({"ui": {"section": "themes"}, "users": [1, 2], "themes": {}});
/// let keys = vec!["ui".to_string(), "themes".to_string(), "sites".to_string()];
///
/// assert_eq!(
///     project_state(&state, &keys),
///     json!({"ui": {"section": "themes"}, "themes": {}})
/// );
/// ```
pub fn project_state(state: &Value, keys: &[String]) -> Value {
	let mut projected = Map::new();
	if let Value::Object(fields) = state {
		for key in keys {
			if let Some(value) = fields.get(key) {
				projected.insert(key.clone(), value.clone());
			}
		}
	}
	Value::Object(projected)
}

/// Path plus query of a request URL.
///
/// Origin-relative URLs are resolved against a placeholder origin, so both
/// `https://example.com/themes?s=1` and `/themes?s=1` yield `/themes?s=1`.
pub fn request_path(raw: &str) -> Result<String, ComposeError> {
	let invalid = |source| ComposeError::InvalidUrl {
		url: raw.to_string(),
		source,
	};
	let url = match Url::parse(raw) {
		Ok(url) => url,
		Err(url::ParseError::RelativeUrlWithoutBase) => {
			let base = Url::parse("http://localhost/").map_err(invalid)?;
			base.join(raw).map_err(invalid)?
		}
		Err(e) => return Err(invalid(e)),
	};

	Ok(match url.query() {
		Some(query) => format!("{}?{}", url.path(), query),
		None => url.path().to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("https://example.com/themes?sort=new", "/themes?sort=new")]
	#[case("/themes?sort=new", "/themes?sort=new")]
	#[case("/design/", "/design/")]
	#[case("themes", "/themes")]
	#[case("https://example.com", "/")]
	fn test_request_path(#[case] url: &str, #[case] expected: &str) {
		assert_eq!(request_path(url).unwrap(), expected);
	}

	#[rstest]
	fn test_request_path_rejects_garbage() {
		let err = request_path("http://[::1").unwrap_err();
		assert!(matches!(err, ComposeError::InvalidUrl { .. }));
	}

	#[rstest]
	fn test_project_state_non_object() {
		assert_eq!(project_state(&json!([1, 2]), &["ui".to_string()]), json!({}));
	}

	#[rstest]
	fn test_merge_result_without_metadata_keeps_other_fields() {
		// Arrange
		let mut context = ResponseContext::new();
		context.insert("user", "anonymous");
		context.insert(ResponseContext::HEAD_TITLE, "Existing");
		let result = RenderResult {
			markup: "<main></main>".to_string(),
			timing: std::time::Duration::ZERO,
			metadata: None,
			cache_hit: true,
		};

		// Act
		context.merge_result(&result).unwrap();

		// Assert
		assert_eq!(context.rendered_layout(), Some("<main></main>"));
		assert_eq!(context.head_title(), Some("Existing"));
		assert_eq!(context.get("user"), Some(&json!("anonymous")));
	}
}
