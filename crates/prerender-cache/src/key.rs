//! Cache key derivation

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::borrow::Borrow;
use std::fmt;

/// Prefix marking keys derived from a tree digest.
const DIGEST_PREFIX: &str = "sha256:";

/// Identifies a renderable input in the markup cache
///
/// Two inputs that render identically should share a key; two inputs that
/// may render differently must not, otherwise stale markup is served.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
	/// Wraps an explicit, caller-built key
	pub fn new(key: impl Into<String>) -> Self {
		Self(key.into())
	}

	/// Derives a key from the canonical serialization of a tree
	///
	/// The tree is serialized to a JSON value first, which orders object keys,
	/// so field or map insertion order never changes the key. The canonical
	/// text is then digested with SHA-256.
	///
	/// # Examples
	///
	/// ```
	/// use prerender_cache::CacheKey;
	/// use serde_json::json;
	///
	/// let a = CacheKey::from_tree(&json!({"tag": "div", "text": "hi"})).unwrap();
	/// let b = CacheKey::from_tree(&json!({"text": "hi", "tag": "div"})).unwrap();
	/// let c = CacheKey::from_tree(&json!({"tag": "div", "text": "bye"})).unwrap();
	///
	/// assert_eq!(a, b);
	/// assert_ne!(a, c);
	/// assert!(a.is_digest());
	/// ```
	pub fn from_tree<T: Serialize + ?Sized>(tree: &T) -> Result<Self, serde_json::Error> {
		let canonical = serde_json::to_string(&serde_json::to_value(tree)?)?;
		Ok(Self::digest(canonical.as_bytes()))
	}

	/// Digest of arbitrary bytes
	pub fn digest(bytes: &[u8]) -> Self {
		let mut hasher = Sha256::new();
		hasher.update(bytes);
		Self(format!("{}{}", DIGEST_PREFIX, hex::encode(hasher.finalize())))
	}

	/// Whether this key was produced by [`CacheKey::from_tree`] / [`CacheKey::digest`]
	pub fn is_digest(&self) -> bool {
		self.0.starts_with(DIGEST_PREFIX)
	}

	/// Key as a string slice
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Consumes the key, returning the inner string
	pub fn into_string(self) -> String {
		self.0
	}
}

impl fmt::Display for CacheKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<String> for CacheKey {
	fn from(value: String) -> Self {
		Self(value)
	}
}

impl From<&str> for CacheKey {
	fn from(value: &str) -> Self {
		Self(value.to_string())
	}
}

impl AsRef<str> for CacheKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl Borrow<str> for CacheKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;
	use std::collections::BTreeMap;
	use std::collections::HashMap;

	#[rstest]
	fn test_from_tree_is_stable() {
		let tree = json!({"tag": "div", "children": ["a", "b"]});
		assert_eq!(
			CacheKey::from_tree(&tree).unwrap(),
			CacheKey::from_tree(&tree).unwrap()
		);
	}

	#[rstest]
	fn test_from_tree_ignores_map_insertion_order() {
		// Arrange
		let mut first = HashMap::new();
		first.insert("ui", 1);
		first.insert("themes", 2);
		first.insert("sites", 3);
		let mut second = BTreeMap::new();
		second.insert("sites", 3);
		second.insert("themes", 2);
		second.insert("ui", 1);

		// Act & Assert
		assert_eq!(
			CacheKey::from_tree(&first).unwrap(),
			CacheKey::from_tree(&second).unwrap()
		);
	}

	#[rstest]
	fn test_from_tree_distinguishes_child_order() {
		let a = CacheKey::from_tree(&json!(["a", "b"])).unwrap();
		let b = CacheKey::from_tree(&json!(["b", "a"])).unwrap();
		assert_ne!(a, b);
	}

	#[rstest]
	fn test_digest_format() {
		let key = CacheKey::digest(b"");
		assert_eq!(
			key.as_str(),
			"sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
		);
	}

	#[rstest]
	fn test_explicit_key_is_not_digest() {
		let key = CacheKey::new("\"<div></div>\"/themes{\"ui\":{}}");
		assert!(!key.is_digest());
		assert_eq!(key.to_string(), "\"<div></div>\"/themes{\"ui\":{}}");
	}
}
