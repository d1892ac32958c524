//! In-memory platform stack.

use super::{PlatformStack, PopCallback};
use crate::error::Result;
use crate::path::{Path, parse_path};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Upper bound on events delivered by one [`MemoryStack::dispatch_all`].
const MAX_DISPATCH_ROUNDS: usize = 1024;

/// One entry of a [`MemoryStack`].
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryEntry {
	/// URL of the entry.
	pub url: String,
	/// Payload written with the entry.
	pub payload: Option<serde_json::Value>,
}

impl MemoryEntry {
	fn foreign(url: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			payload: None,
		}
	}
}

struct StackState {
	entries: Vec<MemoryEntry>,
	index: usize,
	pending: usize,
	go_log: Vec<isize>,
	callback: Option<Rc<dyn Fn()>>,
}

/// A session history kept in memory.
///
/// Mirrors browser semantics closely enough to exercise the history state
/// machine:
///
/// - `push_entry` truncates forward entries.
/// - `go` clamps to the stack bounds, moves the cursor immediately and
///   queues one pop event, unless the clamped move is a no-op.
/// - Queued events are only delivered by [`dispatch`](Self::dispatch), the
///   stand-in for the host event loop.
///
/// Cloning yields another handle to the same stack, so a test can keep one
/// handle while the history owns another.
#[derive(Clone)]
pub struct MemoryStack {
	state: Rc<RefCell<StackState>>,
}

impl Default for MemoryStack {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for MemoryStack {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.state.borrow();
		f.debug_struct("MemoryStack")
			.field("entries", &state.entries)
			.field("index", &state.index)
			.field("pending", &state.pending)
			.finish()
	}
}

impl MemoryStack {
	/// A stack holding a single foreign entry at `/`.
	pub fn new() -> Self {
		Self::with_url("/")
	}

	/// A stack holding a single foreign entry at `url`.
	pub fn with_url(url: impl Into<String>) -> Self {
		Self::with_entries([url.into()], 0)
	}

	/// A stack of foreign entries with the cursor at `index`.
	///
	/// An empty list yields a single `/` entry. `index` is clamped to the
	/// last entry.
	pub fn with_entries<I, U>(urls: I, index: usize) -> Self
	where
		I: IntoIterator<Item = U>,
		U: Into<String>,
	{
		let mut entries: Vec<MemoryEntry> = urls.into_iter().map(MemoryEntry::foreign).collect();
		if entries.is_empty() {
			entries.push(MemoryEntry::foreign("/"));
		}
		let index = index.min(entries.len() - 1);

		Self {
			state: Rc::new(RefCell::new(StackState {
				entries,
				index,
				pending: 0,
				go_log: Vec::new(),
				callback: None,
			})),
		}
	}

	/// Cursor position.
	pub fn index(&self) -> usize {
		self.state.borrow().index
	}

	/// Entry at `index`.
	pub fn entry(&self, index: usize) -> Option<MemoryEntry> {
		self.state.borrow().entries.get(index).cloned()
	}

	/// Entry under the cursor.
	pub fn current_entry(&self) -> MemoryEntry {
		let state = self.state.borrow();
		state.entries[state.index].clone()
	}

	/// Every `go` delta requested so far, oldest first.
	pub fn go_log(&self) -> Vec<isize> {
		self.state.borrow().go_log.clone()
	}

	/// Number of pop events waiting for [`dispatch`](Self::dispatch).
	pub fn pending_events(&self) -> usize {
		self.state.borrow().pending
	}

	/// Appends an entry without a payload, as a script unaware of the
	/// history would.
	pub fn simulate_external_push(&self, url: impl Into<String>) {
		let mut state = self.state.borrow_mut();
		let next = state.index + 1;
		state.entries.truncate(next);
		state.entries.push(MemoryEntry::foreign(url));
		state.index = next;
	}

	/// Drops every entry past the first `len`, as a writer replacing the
	/// session would. The cursor is clamped without queueing a pop event.
	pub fn truncate(&self, len: usize) {
		let mut state = self.state.borrow_mut();
		let len = len.max(1);
		state.entries.truncate(len);
		state.index = state.index.min(state.entries.len() - 1);
	}

	/// Delivers one queued pop event.
	///
	/// Returns `false` when nothing was queued. The callback runs without any
	/// internal borrow held, so it may call back into the stack.
	pub fn dispatch(&self) -> bool {
		let callback = {
			let mut state = self.state.borrow_mut();
			if state.pending == 0 {
				return false;
			}
			state.pending -= 1;
			state.callback.clone()
		};

		if let Some(callback) = callback {
			callback();
		}
		true
	}

	/// Delivers queued events until none remain, including events queued
	/// while dispatching. Returns how many were delivered.
	pub fn dispatch_all(&self) -> usize {
		let mut delivered = 0;
		while delivered < MAX_DISPATCH_ROUNDS && self.dispatch() {
			delivered += 1;
		}
		if delivered == MAX_DISPATCH_ROUNDS {
			tracing::warn!(
				rounds = MAX_DISPATCH_ROUNDS,
				"memory stack stopped dispatching pop events"
			);
		}
		delivered
	}
}

impl PlatformStack for MemoryStack {
	fn current_payload(&self) -> Option<serde_json::Value> {
		self.current_entry().payload
	}

	fn current_path(&self) -> Path {
		parse_path(&self.current_entry().url)
	}

	fn push_entry(&self, payload: serde_json::Value, url: &str) -> Result<()> {
		let mut state = self.state.borrow_mut();
		let next = state.index + 1;
		state.entries.truncate(next);
		state.entries.push(MemoryEntry {
			url: url.to_string(),
			payload: Some(payload),
		});
		state.index = next;
		Ok(())
	}

	fn replace_entry(&self, payload: serde_json::Value, url: &str) -> Result<()> {
		let mut state = self.state.borrow_mut();
		let index = state.index;
		state.entries[index] = MemoryEntry {
			url: url.to_string(),
			payload: Some(payload),
		};
		Ok(())
	}

	fn go(&self, delta: isize) {
		let mut state = self.state.borrow_mut();
		state.go_log.push(delta);

		let last = state.entries.len() as isize - 1;
		let target = (state.index as isize).saturating_add(delta).clamp(0, last) as usize;
		if target != state.index {
			state.index = target;
			state.pending += 1;
		}
	}

	fn len(&self) -> usize {
		self.state.borrow().entries.len()
	}

	fn on_pop(&self, callback: PopCallback) {
		self.state.borrow_mut().callback = Some(Rc::from(callback));
	}
}
