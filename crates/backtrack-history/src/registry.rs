//! Ordered subscriber registry.
//!
//! [`Registry`] is the fan-out list behind both listeners (notified after a
//! transition commits) and blockers (consulted before a transition is
//! applied). Registrations are identified by the [`Unsubscribe`] handle
//! returned from [`Registry::add`], not by closure identity, so adding the
//! same function twice yields two independent registrations.
//!
//! ## Example
//!
//! ```
//! use backtrack_history::registry::Registry;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let hits = Rc::new(Cell::new(0));
//! let registry: Registry<dyn Fn(&u32)> = Registry::new();
//!
//! let counter = hits.clone();
//! let handle = registry.add(Rc::new(move |n: &u32| counter.set(counter.get() + *n)));
//!
//! registry.call(&2);
//! assert_eq!(hits.get(), 2);
//!
//! handle.unsubscribe();
//! registry.call(&2);
//! assert_eq!(hits.get(), 2);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Stable identity of a single registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
	/// Returns the raw numeric id.
	pub fn as_u64(&self) -> u64 {
		self.0
	}
}

struct Slots<L: ?Sized> {
	next_id: u64,
	entries: Vec<(SubscriptionId, Rc<L>)>,
}

/// Type-erased removal so [`Unsubscribe`] does not carry the callback type.
trait Detach {
	fn detach(&self, id: SubscriptionId) -> bool;
}

impl<L: ?Sized> Detach for RefCell<Slots<L>> {
	fn detach(&self, id: SubscriptionId) -> bool {
		let mut slots = self.borrow_mut();
		let before = slots.entries.len();
		slots.entries.retain(|(entry_id, _)| *entry_id != id);
		slots.entries.len() != before
	}
}

/// An ordered list of subscribers of type `L`.
///
/// `L` is usually an unsized closure type such as `dyn Fn(&Update<S>)`.
/// Cloning a registry yields another handle to the same list.
pub struct Registry<L: ?Sized> {
	slots: Rc<RefCell<Slots<L>>>,
}

impl<L: ?Sized> Clone for Registry<L> {
	fn clone(&self) -> Self {
		Self {
			slots: Rc::clone(&self.slots),
		}
	}
}

impl<L: ?Sized> Default for Registry<L> {
	fn default() -> Self {
		Self {
			slots: Rc::new(RefCell::new(Slots {
				next_id: 1,
				entries: Vec::new(),
			})),
		}
	}
}

impl<L: ?Sized> fmt::Debug for Registry<L> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Registry")
			.field("len", &self.len())
			.finish()
	}
}

impl<L: ?Sized + 'static> Registry<L> {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a subscriber and returns the handle that removes it.
	pub fn add(&self, subscriber: Rc<L>) -> Unsubscribe {
		let mut slots = self.slots.borrow_mut();
		let id = SubscriptionId(slots.next_id);
		slots.next_id += 1;
		slots.entries.push((id, subscriber));
		drop(slots);

		let detach: Rc<dyn Detach> = self.slots.clone();
		Unsubscribe {
			id,
			slots: Rc::downgrade(&detach),
		}
	}

	/// Returns the subscribers registered at this moment, in insertion order.
	pub fn snapshot(&self) -> Vec<Rc<L>> {
		self.slots
			.borrow()
			.entries
			.iter()
			.map(|(_, subscriber)| Rc::clone(subscriber))
			.collect()
	}

	/// Invokes every subscriber with `arg`, in insertion order.
	///
	/// The subscriber set is captured before the first call, so subscribers
	/// added or removed by a callback take effect from the next `call`.
	pub fn call<A: ?Sized>(&self, arg: &A)
	where
		L: Fn(&A),
	{
		for subscriber in self.snapshot() {
			(*subscriber)(arg);
		}
	}
}

impl<L: ?Sized> Registry<L> {
	/// Number of registered subscribers.
	pub fn len(&self) -> usize {
		self.slots.borrow().entries.len()
	}

	/// Returns `true` when nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Handle returned by [`Registry::add`].
///
/// Dropping the handle keeps the subscription alive; call
/// [`unsubscribe`](Self::unsubscribe) to remove it.
pub struct Unsubscribe {
	id: SubscriptionId,
	slots: Weak<dyn Detach>,
}

impl Unsubscribe {
	/// The id of the registration this handle controls.
	pub fn id(&self) -> SubscriptionId {
		self.id
	}

	/// Removes the registration.
	///
	/// Returns `false` if it was already gone or the registry was dropped.
	pub fn unsubscribe(self) -> bool {
		self.slots
			.upgrade()
			.map(|slots| slots.detach(self.id))
			.unwrap_or(false)
	}
}

impl fmt::Debug for Unsubscribe {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Unsubscribe")
			.field("id", &self.id)
			.field("registry_alive", &(self.slots.strong_count() > 0))
			.finish()
	}
}
