//! Locations, navigation targets and persisted entry payloads.

use crate::path::{PartialPath, Path, create_path, parse_path};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bound for application state carried by a [`Location`].
///
/// The history only clones, serializes and deserializes it; it never inspects
/// its shape.
pub trait StateValue: Clone + Serialize + DeserializeOwned + 'static {}

impl<T> StateValue for T where T: Clone + Serialize + DeserializeOwned + 'static {}

/// Why the current location last changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
	/// Back/forward traversal, or the initial location.
	Pop,
	/// A new entry was appended.
	Push,
	/// The current entry was overwritten.
	Replace,
}

impl Action {
	/// Canonical upper-case name.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Pop => "POP",
			Self::Push => "PUSH",
			Self::Replace => "REPLACE",
		}
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A path together with its application state and history-minted key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location<S> {
	/// Path component.
	pub pathname: String,
	/// Query string including the leading `?`, or empty.
	pub search: String,
	/// Fragment including the leading `#`, or empty.
	pub hash: String,
	/// Application state attached to the entry.
	pub state: Option<S>,
	/// Identifier minted by the history for this entry.
	pub key: String,
}

impl<S> Location<S> {
	/// Builds a location from a resolved path.
	pub fn new(path: Path, state: Option<S>, key: impl Into<String>) -> Self {
		Self {
			pathname: path.pathname,
			search: path.search,
			hash: path.hash,
			state,
			key: key.into(),
		}
	}

	/// The path components of this location.
	pub fn path(&self) -> Path {
		Path::new(
			self.pathname.clone(),
			self.search.clone(),
			self.hash.clone(),
		)
	}

	/// The URL string written to the platform stack.
	pub fn href(&self) -> String {
		format!("{}{}{}", self.pathname, self.search, self.hash)
	}
}

/// Payload persisted into each platform stack entry.
///
/// `idx` is this history's own dense index into the stack and is never
/// assumed to match any platform counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry<S> {
	/// Position of the entry as tracked by the history.
	pub idx: usize,
	/// Key of the location stored in the entry.
	pub key: String,
	/// Application state.
	pub usr: Option<S>,
}

/// Wire shape read before the state is decoded as `S`.
#[derive(Deserialize)]
struct RawEntry {
	idx: usize,
	#[serde(default)]
	key: Option<String>,
	#[serde(default)]
	usr: serde_json::Value,
}

impl<S: StateValue> HistoryEntry<S> {
	/// Encodes the entry as a platform payload.
	pub fn to_payload(&self) -> serde_json::Result<serde_json::Value> {
		serde_json::to_value(self)
	}

	/// Decodes a platform payload.
	///
	/// Returns `None` when the payload is absent or lacks a usable `idx`,
	/// i.e. the entry was not written by a history. A missing key falls back
	/// to `default_key`. State that does not decode as `S` is dropped, so an
	/// entry written with an older state shape still keeps its position.
	pub fn from_payload(payload: Option<serde_json::Value>, default_key: &str) -> Option<Self> {
		let raw: RawEntry = serde_json::from_value(payload?).ok()?;
		if isize::try_from(raw.idx).is_err() {
			return None;
		}

		let usr = match serde_json::from_value::<Option<S>>(raw.usr) {
			Ok(usr) => usr,
			Err(err) => {
				tracing::debug!(idx = raw.idx, error = %err, "dropping undecodable entry state");
				None
			}
		};
		Some(Self {
			idx: raw.idx,
			key: raw.key.unwrap_or_else(|| default_key.to_string()),
			usr,
		})
	}
}

/// Payload delivered to listeners after a transition commits.
#[derive(Debug, Clone, PartialEq)]
pub struct Update<S> {
	/// Kind of transition.
	pub action: Action,
	/// The new current location.
	pub location: Location<S>,
}

/// A navigation target: a raw URL string or a partial path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum To {
	/// URL string, parsed with [`parse_path`].
	Url(String),
	/// Structured path; missing components take their defaults.
	Path(PartialPath),
}

impl To {
	/// Resolves the target into concrete path components.
	pub fn to_path(&self) -> Path {
		match self {
			Self::Url(url) => parse_path(url),
			Self::Path(path) => path.resolve(),
		}
	}

	/// The URL this target renders to, without navigating.
	pub fn to_href(&self) -> String {
		match self {
			Self::Url(url) => url.clone(),
			Self::Path(path) => create_path(path),
		}
	}
}

impl From<&str> for To {
	fn from(url: &str) -> Self {
		Self::Url(url.to_string())
	}
}

impl From<String> for To {
	fn from(url: String) -> Self {
		Self::Url(url)
	}
}

impl From<&String> for To {
	fn from(url: &String) -> Self {
		Self::Url(url.clone())
	}
}

impl From<PartialPath> for To {
	fn from(path: PartialPath) -> Self {
		Self::Path(path)
	}
}

impl From<Path> for To {
	fn from(path: Path) -> Self {
		Self::Path(path.into())
	}
}
