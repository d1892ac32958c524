//! Vetoable transitions handed to blockers.

use crate::location::{Action, Location, Update};
use std::fmt;
use std::rc::Rc;

/// A proposed navigation held by the blocking protocol.
///
/// Carries the action and target location for inspection, plus
/// [`retry`](Self::retry) to resume it once the blocker decides to let it
/// through. A transition holds only a weak handle to its history; retrying
/// after the history is gone does nothing.
pub struct Transition<S> {
	action: Action,
	location: Location<S>,
	retry: Rc<dyn Fn()>,
}

impl<S> Transition<S> {
	pub(crate) fn new(action: Action, location: Location<S>, retry: Rc<dyn Fn()>) -> Self {
		Self {
			action,
			location,
			retry,
		}
	}

	/// The kind of navigation being attempted.
	pub fn action(&self) -> Action {
		self.action
	}

	/// The location the navigation would land on.
	pub fn location(&self) -> &Location<S> {
		&self.location
	}

	/// Re-attempts the held navigation.
	///
	/// Push and replace are re-run from the start and consult the blockers
	/// again, so a blocker should unregister itself before retrying. A
	/// back/forward traversal is re-issued and committed without consulting
	/// the blockers a second time.
	pub fn retry(&self) {
		(self.retry)()
	}

	/// The listener payload this transition would produce on commit.
	pub fn to_update(&self) -> Update<S>
	where
		S: Clone,
	{
		Update {
			action: self.action,
			location: self.location.clone(),
		}
	}
}

impl<S: Clone> Clone for Transition<S> {
	fn clone(&self) -> Self {
		Self {
			action: self.action,
			location: self.location.clone(),
			retry: Rc::clone(&self.retry),
		}
	}
}

impl<S: fmt::Debug> fmt::Debug for Transition<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Transition")
			.field("action", &self.action)
			.field("location", &self.location)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::path::Path;
	use rstest::rstest;
	use std::cell::Cell;

	#[rstest]
	fn test_retry_invokes_callback_each_time() {
		let calls = Rc::new(Cell::new(0));
		let counter = calls.clone();
		let location: Location<()> = Location::new(Path::new("/next", "", ""), None, "k");
		let tx = Transition::new(
			Action::Push,
			location,
			Rc::new(move || counter.set(counter.get() + 1)),
		);

		let copy = tx.clone();
		tx.retry();
		copy.retry();

		assert_eq!(calls.get(), 2);
		assert_eq!(copy.action(), Action::Push);
		assert_eq!(copy.location().pathname, "/next");
		assert_eq!(copy.to_update().action, Action::Push);
	}
}
