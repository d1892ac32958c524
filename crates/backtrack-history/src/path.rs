//! URL path utilities.
//!
//! Conversions between a structured [`Path`] (`pathname`, `search`, `hash`)
//! and a single URL string. Both directions are pure functions and never
//! normalize separators: the `?` and `#` prefixes live inside the `search`
//! and `hash` fields themselves.
//!
//! ## Example
//!
//! ```
//! use backtrack_history::path::{create_path, parse_path, PartialPath};
//!
//! let path = parse_path("/users/42?tab=posts#top");
//! assert_eq!(path.pathname, "/users/42");
//! assert_eq!(path.search, "?tab=posts");
//! assert_eq!(path.hash, "#top");
//!
//! assert_eq!(create_path(&PartialPath::from(path)), "/users/42?tab=posts#top");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fully resolved URL path.
///
/// `search` carries its leading `?` and `hash` its leading `#` when non-empty.
/// Both are empty strings when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path {
	/// Path component, e.g. `/users/42`.
	pub pathname: String,
	/// Query string including the leading `?`, or empty.
	pub search: String,
	/// Fragment including the leading `#`, or empty.
	pub hash: String,
}

impl Path {
	/// Creates a path from its three components.
	pub fn new(
		pathname: impl Into<String>,
		search: impl Into<String>,
		hash: impl Into<String>,
	) -> Self {
		Self {
			pathname: pathname.into(),
			search: search.into(),
			hash: hash.into(),
		}
	}
}

impl fmt::Display for Path {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}{}{}", self.pathname, self.search, self.hash)
	}
}

/// A path where every component is optional.
///
/// Missing components are defaulted by [`create_path`]: `pathname` to `/`,
/// `search` and `hash` to the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartialPath {
	/// Path component.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pathname: Option<String>,
	/// Query string including the leading `?`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub search: Option<String>,
	/// Fragment including the leading `#`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub hash: Option<String>,
}

impl PartialPath {
	/// Creates an empty partial path.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the pathname.
	pub fn with_pathname(mut self, pathname: impl Into<String>) -> Self {
		self.pathname = Some(pathname.into());
		self
	}

	/// Sets the search string (including the leading `?`).
	pub fn with_search(mut self, search: impl Into<String>) -> Self {
		self.search = Some(search.into());
		self
	}

	/// Sets the hash (including the leading `#`).
	pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
		self.hash = Some(hash.into());
		self
	}

	/// Fills in missing components with their defaults.
	pub fn resolve(&self) -> Path {
		Path {
			pathname: self.pathname.clone().unwrap_or_else(|| "/".to_string()),
			search: self.search.clone().unwrap_or_default(),
			hash: self.hash.clone().unwrap_or_default(),
		}
	}
}

impl From<Path> for PartialPath {
	fn from(path: Path) -> Self {
		Self {
			pathname: Some(path.pathname),
			search: Some(path.search),
			hash: Some(path.hash),
		}
	}
}

/// Concatenates `pathname`, `search` and `hash` into a URL string.
///
/// `pathname` defaults to `/`; `search` and `hash` default to the empty
/// string. No separators are inserted.
pub fn create_path(path: &PartialPath) -> String {
	path.resolve().to_string()
}

/// Splits a URL string into its [`Path`] components.
///
/// The first `#` is located before any `?` is searched for, so a `?` that
/// follows a `#` belongs to the hash rather than the query string. Input with
/// neither separator is returned entirely as `pathname`.
pub fn parse_path(url: &str) -> Path {
	let (rest, hash) = match url.find('#') {
		Some(pos) => url.split_at(pos),
		None => (url, ""),
	};

	let (pathname, search) = match rest.find('?') {
		Some(pos) => rest.split_at(pos),
		None => (rest, ""),
	};

	Path::new(pathname, search, hash)
}
