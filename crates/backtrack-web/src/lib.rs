//! Browser bindings for `backtrack-history`.
//!
//! [`BrowserStack`] implements [`PlatformStack`](backtrack_history::PlatformStack)
//! over `window.history`, storing entry payloads as structured-clone JSON and
//! forwarding `popstate` events to the history's pop handler.
//!
//! Everything in this crate is only compiled for `wasm32` targets.
//!
//! ## Example
//!
//! ```ignore
//! use backtrack_web::create_browser_history;
//!
//! let history = create_browser_history::<serde_json::Value>()?;
//! let _listener = history.listen(|update| {
//!     tracing::info!(pathname = %update.location.pathname, "navigated");
//! });
//! history.push("/inbox", None)?;
//! ```

#[cfg(target_arch = "wasm32")]
mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::{
	BrowserHistory, BrowserStack, create_browser_history, create_browser_history_with_config,
};
