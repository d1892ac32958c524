//! `window.history` backed platform stack.

use backtrack_history::{
	History, HistoryConfig, HistoryError, Path, PlatformStack, PopCallback, Result, StateValue,
};
use std::cell::RefCell;
use std::fmt;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, Window};

/// A [`History`] driven by the browser.
pub type BrowserHistory<S = serde_json::Value> = History<S, BrowserStack>;

type PopstateHandler = Closure<dyn FnMut(Event)>;

/// The DOM session history of the current window.
///
/// Dropping the stack removes its `popstate` listener.
pub struct BrowserStack {
	window: Window,
	history: web_sys::History,
	popstate: RefCell<Option<PopstateHandler>>,
}

impl fmt::Debug for BrowserStack {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BrowserStack")
			.field("listening", &self.popstate.borrow().is_some())
			.finish_non_exhaustive()
	}
}

fn platform_error(err: JsValue) -> HistoryError {
	HistoryError::Platform(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

impl BrowserStack {
	/// Binds to the global `window`.
	pub fn new() -> Result<Self> {
		let window = web_sys::window()
			.ok_or_else(|| HistoryError::Platform("No window object".to_string()))?;
		let history = window.history().map_err(platform_error)?;
		Ok(Self {
			window,
			history,
			popstate: RefCell::new(None),
		})
	}

	fn encode(payload: &serde_json::Value) -> Result<JsValue> {
		let json = serde_json::to_string(payload)?;
		js_sys::JSON::parse(&json).map_err(platform_error)
	}

	fn remove_listener(&self) {
		if let Some(handler) = self.popstate.borrow_mut().take() {
			let removed = self
				.window
				.remove_event_listener_with_callback("popstate", handler.as_ref().unchecked_ref());
			if let Err(err) = removed {
				tracing::warn!(error = ?err, "failed to remove popstate listener");
			}
		}
	}
}

impl PlatformStack for BrowserStack {
	fn current_payload(&self) -> Option<serde_json::Value> {
		let state = self.history.state().ok()?;
		if state.is_null() || state.is_undefined() {
			return None;
		}
		let json: String = js_sys::JSON::stringify(&state).ok()?.into();
		match serde_json::from_str(&json) {
			Ok(value) => Some(value),
			Err(err) => {
				tracing::debug!(error = %err, "history state is not JSON");
				None
			}
		}
	}

	fn current_path(&self) -> Path {
		let location = self.window.location();
		Path::new(
			location.pathname().unwrap_or_else(|_| "/".to_string()),
			location.search().unwrap_or_default(),
			location.hash().unwrap_or_default(),
		)
	}

	fn push_entry(&self, payload: serde_json::Value, url: &str) -> Result<()> {
		let data = Self::encode(&payload)?;
		self.history
			.push_state_with_url(&data, "", Some(url))
			.map_err(platform_error)
	}

	fn replace_entry(&self, payload: serde_json::Value, url: &str) -> Result<()> {
		let data = Self::encode(&payload)?;
		self.history
			.replace_state_with_url(&data, "", Some(url))
			.map_err(platform_error)
	}

	fn go(&self, delta: isize) {
		let Ok(delta) = i32::try_from(delta) else {
			tracing::warn!(delta, "traversal delta out of range");
			return;
		};
		if let Err(err) = self.history.go_with_delta(delta) {
			tracing::warn!(delta, error = ?err, "history.go failed");
		}
	}

	fn len(&self) -> usize {
		self.history.length().map(|len| len as usize).unwrap_or(0)
	}

	fn on_pop(&self, callback: PopCallback) {
		self.remove_listener();

		let handler = Closure::wrap(Box::new(move |_event: Event| {
			callback();
		}) as Box<dyn FnMut(Event)>);

		let added = self
			.window
			.add_event_listener_with_callback("popstate", handler.as_ref().unchecked_ref());
		match added {
			Ok(()) => *self.popstate.borrow_mut() = Some(handler),
			Err(err) => tracing::warn!(error = ?err, "failed to install popstate listener"),
		}
	}
}

impl Drop for BrowserStack {
	fn drop(&mut self) {
		self.remove_listener();
	}
}

/// Creates a history over `window.history` with the default configuration.
pub fn create_browser_history<S: StateValue>() -> Result<BrowserHistory<S>> {
	create_browser_history_with_config(HistoryConfig::default())
}

/// Creates a history over `window.history`.
pub fn create_browser_history_with_config<S: StateValue>(
	config: HistoryConfig,
) -> Result<BrowserHistory<S>> {
	History::with_config(BrowserStack::new()?, config)
}
