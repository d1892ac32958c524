//! Internal navigation state and the blocked-pop phases.

use crate::location::{Action, Location, To};
use crate::transition::Transition;

/// What a [`Transition::retry`] re-issues.
pub(crate) enum Retry<S> {
	/// Re-run a push or replace from the start.
	Navigate {
		action: Action,
		to: To,
		state: Option<S>,
	},
	/// Re-issue a reverted traversal. `index` is where the history sat when
	/// the traversal was reverted; the retry is ignored once it has moved.
	Pop { delta: isize, index: usize },
}

/// Progress of a blocked back/forward traversal.
///
/// `Idle -> Reverting -> Idle` covers detection and delivery of a blocked
/// pop; `Idle -> Retrying -> Idle` covers the confirmed re-application.
/// Neither path consults the blockers more than once per traversal.
pub(crate) enum PopPhase<S> {
	/// Native pops are reconciled normally.
	Idle,
	/// A corrective `go` is in flight; the next pop is its landing and
	/// releases `transition` to the blockers.
	Reverting { transition: Transition<S> },
	/// A confirmed traversal is in flight; the next pop commits without
	/// consulting the blockers.
	Retrying { delta: isize },
}

impl<S> PopPhase<S> {
	pub(crate) fn is_idle(&self) -> bool {
		matches!(self, Self::Idle)
	}

	pub(crate) fn name(&self) -> &'static str {
		match self {
			Self::Idle => "idle",
			Self::Reverting { .. } => "reverting",
			Self::Retrying { .. } => "retrying",
		}
	}
}

/// The cached `{action, index, location}` plus the pop phase.
pub(crate) struct NavState<S> {
	pub(crate) action: Action,
	pub(crate) index: usize,
	pub(crate) location: Location<S>,
	pub(crate) phase: PopPhase<S>,
}

impl<S> NavState<S> {
	pub(crate) fn new(index: usize, location: Location<S>) -> Self {
		Self {
			action: Action::Pop,
			index,
			location,
			phase: PopPhase::Idle,
		}
	}

	/// Moves the current phase out, leaving `Idle` behind.
	pub(crate) fn take_phase(&mut self) -> PopPhase<S> {
		std::mem::replace(&mut self.phase, PopPhase::Idle)
	}
}
