//! # Backtrack
//!
//! Client-side navigation history with blockable, retryable transitions.
//!
//! Backtrack keeps an application's idea of "where am I" in step with the
//! host's back/forward stack. Every entry it writes carries an index and a
//! unique key, so native traversals can be reconciled, and any registered
//! blocker can hold a transition until the user confirms it.
//!
//! ## Feature Flags
//!
//! - `web` (default) - `window.history` bindings via `backtrack-web`. Only has
//!   an effect on `wasm32` targets.
//!
//! ## Quick Example
//!
//! ```
//! use backtrack::{Action, History, MemoryStack};
//!
//! let stack = MemoryStack::new();
//! let history: History = History::new(stack.clone()).unwrap();
//!
//! let _listener = history.listen(|update| {
//!     println!("{} {}", update.action, update.location.href());
//! });
//!
//! history.push("/inbox", None).unwrap();
//! history.go_back();
//! stack.dispatch_all();
//! assert_eq!(history.action(), Action::Pop);
//! ```
//!
//! In the browser:
//!
//! ```rust,ignore
//! use backtrack::web::create_browser_history;
//!
//! let history = create_browser_history::<serde_json::Value>()?;
//! history.push("/settings", None)?;
//! ```

pub use backtrack_history::{
	Action, History, HistoryConfig, HistoryEntry, HistoryError, Location, MemoryEntry, MemoryStack,
	NavigationOutcome, Params, PartialPath, Path, PathMatcher, PlatformStack, PopCallback,
	PopOutcome, Registry, Result, StateValue, SubscriptionId, To, Transition, Unsubscribe, Update,
	create_path, parse_path,
};

/// Configuration, errors and lower-level building blocks.
pub mod history {
	pub use backtrack_history::{config, error, location, matcher, path, platform, registry, transition};
}

/// Browser History API bindings.
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web {
	pub use backtrack_web::{
		BrowserHistory, BrowserStack, create_browser_history, create_browser_history_with_config,
	};
}

/// Commonly used types.
pub mod prelude {
	pub use crate::{Action, History, Location, NavigationOutcome, To, Transition, Update};
}
