//! Platform history stack boundary.
//!
//! A [`PlatformStack`] is the host's back/forward list: a cursor over entries
//! that each carry a URL and an opaque payload. The history is its intended
//! sole writer but tolerates other writers.
//!
//! - [`MemoryStack`]: in-memory stack with browser-like semantics, used for
//!   tests and non-browser hosts.
//! - `BrowserStack` (in `backtrack-web`): the DOM History API.

pub mod memory;

pub use memory::{MemoryEntry, MemoryStack};

use crate::error::Result;
use crate::path::Path;

/// Callback fired by the platform after a back/forward traversal.
pub type PopCallback = Box<dyn Fn()>;

/// The host's session history.
///
/// All methods take `&self`; implementations use interior mutability since
/// the history shares the stack with the pop notification path.
pub trait PlatformStack {
	/// Payload of the current entry, if any.
	fn current_payload(&self) -> Option<serde_json::Value>;

	/// URL components of the current entry.
	fn current_path(&self) -> Path;

	/// Appends an entry after the cursor, discarding any forward entries.
	fn push_entry(&self, payload: serde_json::Value, url: &str) -> Result<()>;

	/// Overwrites the current entry in place.
	fn replace_entry(&self, payload: serde_json::Value, url: &str) -> Result<()>;

	/// Moves the cursor by `delta` entries.
	///
	/// The move is observed later through the [`on_pop`](Self::on_pop)
	/// callback, never through a return value.
	fn go(&self, delta: isize);

	/// Number of entries in the stack.
	fn len(&self) -> usize;

	/// Returns `true` when the stack holds no entries.
	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Installs the pop notification callback, replacing any previous one.
	fn on_pop(&self, callback: PopCallback);
}
