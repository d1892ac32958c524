//! The history facade and its navigation state machine.
//!
//! [`History`] owns the cached `{action, index, location}` triple and keeps it
//! in step with a [`PlatformStack`]:
//!
//! - `push`/`replace` consult the blockers, write through to the platform and
//!   then notify listeners.
//! - Native back/forward traversals arrive through [`History::handle_pop`].
//!   Without blockers they are committed. With blockers the platform is moved
//!   back with a corrective `go`, and the held transition is released to the
//!   blockers once that corrective move lands.
//!
//! While no blocked traversal is in flight, [`History::index`] equals the
//! `idx` stored in the platform's current entry.
//!
//! ## Example
//!
//! ```
//! use backtrack_history::{Action, History, MemoryStack};
//! use serde_json::json;
//!
//! let stack = MemoryStack::new();
//! let history: History = History::new(stack.clone()).unwrap();
//!
//! history.push("/inbox?page=2", Some(json!({"from": "nav"}))).unwrap();
//! assert_eq!(history.action(), Action::Push);
//! assert_eq!(history.location().search, "?page=2");
//! assert_eq!(history.index(), 1);
//!
//! history.go_back();
//! // Traversals are observed asynchronously.
//! assert_eq!(history.index(), 1);
//! stack.dispatch_all();
//! assert_eq!(history.index(), 0);
//! assert_eq!(history.action(), Action::Pop);
//! ```

use crate::config::HistoryConfig;
use crate::error::{HistoryError, Result};
use crate::location::{Action, HistoryEntry, Location, StateValue, To, Update};
use crate::matcher::{Params, PathMatcher};
use crate::platform::{MemoryStack, PlatformStack};
use crate::registry::{Registry, Unsubscribe};
use crate::state::{NavState, PopPhase, Retry};
use crate::transition::Transition;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type ListenerFn<S> = dyn Fn(&Update<S>);
type BlockerFn<S> = dyn Fn(&Transition<S>);

fn signed(index: usize) -> isize {
	isize::try_from(index).unwrap_or(isize::MAX)
}

/// Result of [`History::push`] and [`History::replace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
	/// The entry was written and listeners were notified.
	Committed,
	/// A blocker is registered; nothing changed until it retries.
	Blocked,
}

impl NavigationOutcome {
	/// Returns `true` for [`NavigationOutcome::Committed`].
	pub fn is_committed(&self) -> bool {
		matches!(self, Self::Committed)
	}
}

/// Branch taken by [`History::handle_pop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopOutcome {
	/// The traversal was adopted and listeners were notified.
	Committed,
	/// Blockers are registered; a corrective `go` was issued.
	Reverted,
	/// The corrective `go` landed and the held transition went to the
	/// blockers.
	Delivered,
	/// The current entry was not written by this history; nothing changed.
	Foreign,
}

struct Shared<S, P> {
	platform: P,
	config: HistoryConfig,
	nav: RefCell<NavState<S>>,
	listeners: Registry<ListenerFn<S>>,
	blockers: Registry<BlockerFn<S>>,
}

/// Navigation history over a platform stack.
///
/// Cloning yields another handle to the same history. All access happens on
/// one thread; callbacks may re-enter the history freely.
pub struct History<S = serde_json::Value, P = MemoryStack> {
	shared: Rc<Shared<S, P>>,
}

impl<S, P> Clone for History<S, P> {
	fn clone(&self) -> Self {
		Self {
			shared: Rc::clone(&self.shared),
		}
	}
}

impl<S: fmt::Debug, P> fmt::Debug for History<S, P> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let nav = self.shared.nav.borrow();
		f.debug_struct("History")
			.field("action", &nav.action)
			.field("index", &nav.index)
			.field("location", &nav.location)
			.field("phase", &nav.phase.name())
			.field("listeners", &self.shared.listeners.len())
			.field("blockers", &self.shared.blockers.len())
			.finish()
	}
}

impl<S: StateValue, P: PlatformStack + 'static> History<S, P> {
	/// Creates a history with the default configuration.
	///
	/// See [`with_config`](Self::with_config).
	pub fn new(platform: P) -> Result<Self> {
		Self::with_config(platform, HistoryConfig::default())
	}

	/// Creates a history over `platform`.
	///
	/// If the current entry was written by a history, its `idx`, key and
	/// state are adopted. Otherwise the entry is silently rewritten with
	/// `idx = 0` and a freshly minted key, keeping its existing payload as
	/// state when it decodes as `S`; listeners are not involved.
	pub fn with_config(platform: P, config: HistoryConfig) -> Result<Self> {
		let path = platform.current_path();
		let payload = platform.current_payload();
		let adopted = HistoryEntry::<S>::from_payload(payload.clone(), &config.default_key);
		let (index, location) = match adopted {
			Some(entry) => (entry.idx, Location::new(path, entry.usr, entry.key)),
			None => {
				let usr = payload.and_then(|payload| serde_json::from_value::<S>(payload).ok());
				let location = Location::new(path, usr, config.mint_key());
				let entry = HistoryEntry::<S> {
					idx: 0,
					key: location.key.clone(),
					usr: location.state.clone(),
				};
				platform.replace_entry(entry.to_payload()?, &location.href())?;
				tracing::debug!(
					pathname = %location.pathname,
					"bootstrapped history over unmanaged entry"
				);
				(0, location)
			}
		};

		let shared = Rc::new(Shared {
			platform,
			config,
			nav: RefCell::new(NavState::new(index, location)),
			listeners: Registry::new(),
			blockers: Registry::new(),
		});

		let weak = Rc::downgrade(&shared);
		shared.platform.on_pop(Box::new(move || {
			if let Some(shared) = weak.upgrade() {
				History { shared }.handle_pop();
			}
		}));

		Ok(Self { shared })
	}

	/// Why the current location last changed.
	pub fn action(&self) -> Action {
		self.shared.nav.borrow().action
	}

	/// Snapshot of the current location.
	pub fn location(&self) -> Location<S> {
		self.shared.nav.borrow().location.clone()
	}

	/// The history's own index into the platform stack.
	pub fn index(&self) -> usize {
		self.shared.nav.borrow().index
	}

	/// Number of entries in the platform stack.
	pub fn len(&self) -> usize {
		self.shared.platform.len()
	}

	/// Returns `true` when the platform stack is empty.
	pub fn is_empty(&self) -> bool {
		self.shared.platform.is_empty()
	}

	/// Whether any blocker is registered.
	pub fn is_blocked(&self) -> bool {
		!self.shared.blockers.is_empty()
	}

	/// Whether a blocked traversal is waiting for its corrective move to land.
	pub fn has_pending_pop(&self) -> bool {
		matches!(self.shared.nav.borrow().phase, PopPhase::Reverting { .. })
	}

	/// The configuration this history was built with.
	pub fn config(&self) -> &HistoryConfig {
		&self.shared.config
	}

	/// The underlying platform stack.
	pub fn platform(&self) -> &P {
		&self.shared.platform
	}

	/// Renders a navigation target to a URL without navigating.
	pub fn create_href(&self, to: impl Into<To>) -> String {
		to.into().to_href()
	}

	/// Appends a new entry and makes it current.
	pub fn push(&self, to: impl Into<To>, state: Option<S>) -> Result<NavigationOutcome> {
		self.navigate(Action::Push, to.into(), state)
	}

	/// Overwrites the current entry.
	pub fn replace(&self, to: impl Into<To>, state: Option<S>) -> Result<NavigationOutcome> {
		self.navigate(Action::Replace, to.into(), state)
	}

	/// Asks the platform to traverse `delta` entries.
	///
	/// State changes only when the resulting pop event reaches
	/// [`handle_pop`](Self::handle_pop).
	pub fn go(&self, delta: isize) {
		self.shared.platform.go(delta);
	}

	/// Traverses one entry back.
	pub fn go_back(&self) {
		self.go(-1);
	}

	/// Traverses one entry forward.
	pub fn go_forward(&self) {
		self.go(1);
	}

	/// Registers a listener notified after every committed transition.
	pub fn listen<F>(&self, listener: F) -> Unsubscribe
	where
		F: Fn(&Update<S>) + 'static,
	{
		self.shared.listeners.add(Rc::new(listener))
	}

	/// Registers a blocker.
	///
	/// While any blocker is registered, every push/replace and every native
	/// traversal is held and handed to the blockers as a [`Transition`].
	pub fn block<F>(&self, blocker: F) -> Unsubscribe
	where
		F: Fn(&Transition<S>) + 'static,
	{
		self.shared.blockers.add(Rc::new(blocker))
	}

	/// Matches the current pathname with an application-supplied matcher.
	pub fn match_location<M>(&self, matcher: &M, pattern: &str) -> Option<Params>
	where
		M: PathMatcher + ?Sized,
	{
		let pathname = self.shared.nav.borrow().location.pathname.clone();
		matcher.match_path(pattern, &pathname)
	}

	/// Entry point for the platform's "stack changed by pop" notification.
	///
	/// Installed automatically through [`PlatformStack::on_pop`]; adapters
	/// that deliver events themselves may call it directly.
	pub fn handle_pop(&self) -> PopOutcome {
		let phase = self.shared.nav.borrow_mut().take_phase();
		match phase {
			PopPhase::Reverting { transition } => {
				tracing::debug!(
					key = %transition.location().key,
					"corrective traversal landed; releasing held pop"
				);
				self.shared.blockers.call(&transition);
				PopOutcome::Delivered
			}
			PopPhase::Retrying { delta } => {
				tracing::debug!(delta, "confirmed traversal landed");
				self.reconcile(true)
			}
			PopPhase::Idle => self.reconcile(false),
		}
	}

	fn navigate(&self, action: Action, to: To, state: Option<S>) -> Result<NavigationOutcome> {
		let location = Location::new(to.to_path(), state.clone(), self.shared.config.mint_key());

		if self.is_blocked() {
			tracing::debug!(
				%action,
				key = %location.key,
				blockers = self.shared.blockers.len(),
				"transition held by blockers"
			);
			let transition = self.transition(action, location, Retry::Navigate { action, to, state });
			self.shared.blockers.call(&transition);
			return Ok(NavigationOutcome::Blocked);
		}

		let current = self.index();
		let idx = match action {
			Action::Push => current + 1,
			Action::Replace | Action::Pop => current,
		};
		let entry = HistoryEntry {
			idx,
			key: location.key.clone(),
			usr: location.state.clone(),
		};
		let payload = entry.to_payload()?;
		let url = location.href();

		let written = match action {
			Action::Push => self.shared.platform.push_entry(payload, &url),
			Action::Replace | Action::Pop => self.shared.platform.replace_entry(payload, &url),
		};
		if let Err(err) = written {
			tracing::warn!(%action, %url, error = %err, "platform rejected history write");
			return Err(err);
		}

		self.commit(action, idx, location);
		Ok(NavigationOutcome::Committed)
	}

	/// Reads the platform's current entry after a traversal.
	///
	/// `confirmed` traversals were already approved by a blocker and commit
	/// unconditionally.
	fn reconcile(&self, confirmed: bool) -> PopOutcome {
		let payload = self.shared.platform.current_payload();
		let Some(entry) = HistoryEntry::<S>::from_payload(payload, &self.shared.config.default_key)
		else {
			self.report_foreign_entry();
			return PopOutcome::Foreign;
		};

		let reported = entry.idx;
		let stored = self.index();
		let Some(delta) = signed(stored).checked_sub(signed(reported)) else {
			self.report_foreign_entry();
			return PopOutcome::Foreign;
		};
		let location = Location::new(self.shared.platform.current_path(), entry.usr, entry.key);

		if confirmed || delta == 0 || !self.is_blocked() {
			self.commit(Action::Pop, reported, location);
			return PopOutcome::Committed;
		}

		if stored >= self.shared.platform.len() {
			// The entry to revert to is gone; adopt the platform position.
			tracing::warn!(
				delta,
				idx = reported,
				len = self.shared.platform.len(),
				"blocked traversal cannot be reverted; committing"
			);
			self.commit(Action::Pop, reported, location);
			return PopOutcome::Committed;
		}

		tracing::debug!(
			delta,
			idx = reported,
			key = %location.key,
			"traversal held by blockers; reverting"
		);
		let transition = self.transition(
			Action::Pop,
			location,
			Retry::Pop {
				delta,
				index: stored,
			},
		);
		// Armed before `go` so a platform that fires synchronously still
		// sees the corrective landing.
		self.shared.nav.borrow_mut().phase = PopPhase::Reverting { transition };
		self.shared.platform.go(delta);
		PopOutcome::Reverted
	}

	fn commit(&self, action: Action, index: usize, location: Location<S>) {
		{
			let mut nav = self.shared.nav.borrow_mut();
			nav.action = action;
			nav.index = index;
			nav.location = location.clone();
		}
		tracing::debug!(%action, idx = index, key = %location.key, "transition committed");
		self.shared.listeners.call(&Update { action, location });
	}

	fn transition(&self, action: Action, location: Location<S>, retry: Retry<S>) -> Transition<S> {
		let weak = Rc::downgrade(&self.shared);
		Transition::new(
			action,
			location,
			Rc::new(move || {
				if let Some(shared) = weak.upgrade() {
					History { shared }.retry(&retry);
				}
			}),
		)
	}

	fn retry(&self, retry: &Retry<S>) {
		match retry {
			Retry::Navigate { action, to, state } => {
				if let Err(err) = self.navigate(*action, to.clone(), state.clone()) {
					tracing::warn!(%action, error = %err, "retried transition failed");
				}
			}
			Retry::Pop { delta, index } => {
				let mut nav = self.shared.nav.borrow_mut();
				if nav.index != *index || !nav.phase.is_idle() {
					tracing::debug!(
						delta,
						idx = nav.index,
						phase = nav.phase.name(),
						"ignoring stale traversal retry"
					);
					return;
				}
				let reachable = signed(*index)
					.checked_sub(*delta)
					.is_some_and(|target| target >= 0 && (target as usize) < self.len());
				if !reachable {
					tracing::debug!(delta, idx = nav.index, "ignoring unreachable traversal retry");
					return;
				}
				nav.phase = PopPhase::Retrying { delta: -delta };
				drop(nav);
				self.shared.platform.go(-delta);
			}
		}
	}

	fn report_foreign_entry(&self) {
		let err = HistoryError::ForeignEntry {
			pathname: self.shared.platform.current_path().pathname,
		};
		if self.shared.config.warn_on_foreign_entry {
			tracing::warn!(error = %err, idx = self.index(), "ignoring traversal");
		} else {
			tracing::debug!(error = %err, idx = self.index(), "ignoring traversal");
		}
	}
}
