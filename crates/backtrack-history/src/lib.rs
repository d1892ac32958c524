//! Backtrack History - client-side navigation history
//!
//! A single coherent notion of "current location" over a platform's session
//! history, with navigation (`push`/`replace`/`go`), observation
//! (`listen`) and the ability to block and conditionally re-apply a
//! navigation that is already in flight (`block`).
//!
//! ## Architecture
//!
//! - [`path`]: URL string <-> [`Path`] conversions
//! - [`registry`]: ordered subscriber list behind listeners and blockers
//! - [`location`]: locations, targets, persisted entry payloads
//! - [`platform`]: the [`PlatformStack`] boundary and the in-memory [`MemoryStack`]
//! - [`history`]: the [`History`] facade and its navigation state machine
//! - [`matcher`]: the opaque path-pattern matcher boundary
//!
//! ## Blocking
//!
//! Any registered blocker turns every push/replace into a held
//! [`Transition`]. A native back/forward traversal has already moved the
//! platform by the time it is observed, so it is undone with a corrective
//! `go` and the transition is released to the blockers once that move lands.
//! Calling [`Transition::retry`] re-applies it.
//!
//! ```
//! use backtrack_history::{History, MemoryStack, NavigationOutcome};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let history: History = History::new(MemoryStack::new()).unwrap();
//!
//! let held = Rc::new(RefCell::new(None));
//! let sink = held.clone();
//! let unblock = history.block(move |tx| *sink.borrow_mut() = Some(tx.clone()));
//!
//! assert_eq!(history.push("/settings", None).unwrap(), NavigationOutcome::Blocked);
//! assert_eq!(history.location().pathname, "/");
//!
//! // The user confirmed: drop the blocker and resume.
//! unblock.unsubscribe();
//! held.borrow_mut().take().unwrap().retry();
//! assert_eq!(history.location().pathname, "/settings");
//! ```

pub mod config;
pub mod error;
pub mod history;
pub mod location;
pub mod matcher;
pub mod path;
pub mod platform;
pub mod registry;
mod state;
pub mod transition;

pub use config::HistoryConfig;
pub use error::{HistoryError, Result};
pub use history::{History, NavigationOutcome, PopOutcome};
pub use location::{Action, HistoryEntry, Location, StateValue, To, Update};
pub use matcher::{Params, PathMatcher};
pub use path::{PartialPath, Path, create_path, parse_path};
pub use platform::{MemoryEntry, MemoryStack, PlatformStack, PopCallback};
pub use registry::{Registry, SubscriptionId, Unsubscribe};
pub use transition::Transition;
