//! Integration tests for push/replace/go and listener delivery
//!
//! Success Criteria:
//! 1. Unblocked push advances the index by exactly one
//! 2. Replace never grows the stack
//! 3. Listeners observe committed transitions in registration order
//! 4. Unsubscribed listeners are never invoked again
//! 5. Minted keys are unique

use backtrack_history::{
	Action, History, MemoryStack, NavigationOutcome, PartialPath, PlatformStack, Update,
};
use rstest::*;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

// ============================================================================
// Fixtures
// ============================================================================

#[fixture]
fn stack() -> MemoryStack {
	MemoryStack::with_url("/home")
}

fn updates(history: &History<Value>) -> Rc<RefCell<Vec<Update<Value>>>> {
	let seen: Rc<RefCell<Vec<Update<Value>>>> = Rc::default();
	let sink = seen.clone();
	// Kept registered for the lifetime of the history.
	let _ = history.listen(move |update| sink.borrow_mut().push(update.clone()));
	seen
}

// ============================================================================
// Push / Replace
// ============================================================================

#[rstest]
fn test_push_increments_index_by_one(stack: MemoryStack) {
	let history: History = History::new(stack.clone()).unwrap();

	for expected in 1..=5 {
		let before = history.index();
		history.push(format!("/page/{expected}"), None).unwrap();
		assert_eq!(history.index(), before + 1);
		assert_eq!(stack.index(), history.index());
	}
	assert_eq!(stack.len(), 6);
}

#[rstest]
fn test_push_after_back_truncates_forward_entries(stack: MemoryStack) {
	let history: History = History::new(stack.clone()).unwrap();
	history.push("/a", None).unwrap();
	history.push("/b", None).unwrap();

	history.go_back();
	stack.dispatch_all();
	history.push("/c", None).unwrap();

	assert_eq!(history.index(), 2);
	assert_eq!(stack.len(), 3);
	assert_eq!(stack.entry(2).unwrap().url, "/c");
}

#[rstest]
fn test_replace_twice_is_idempotent(stack: MemoryStack) {
	let history: History = History::new(stack.clone()).unwrap();
	history.push("/start", None).unwrap();
	let start = history.index();

	history.replace("/same?x=1", Some(json!({"v": 1}))).unwrap();
	let first = history.location();
	let (len, cursor) = (stack.len(), stack.index());
	history.replace("/same?x=1", Some(json!({"v": 1}))).unwrap();
	let second = history.location();

	assert_eq!(history.index(), start);
	assert_eq!(stack.len(), 2);
	assert_eq!((stack.len(), stack.index()), (len, cursor));
	assert_eq!(stack.index(), start);
	assert_eq!(first.path(), second.path());
	assert_eq!(first.state, second.state);
	assert_eq!(history.action(), Action::Replace);
}

#[rstest]
fn test_partial_path_targets_take_defaults(stack: MemoryStack) {
	let history: History = History::new(stack.clone()).unwrap();

	history
		.push(PartialPath::new().with_search("?tab=2").with_hash("#top"), None)
		.unwrap();

	let location = history.location();
	assert_eq!(location.pathname, "/");
	assert_eq!(location.search, "?tab=2");
	assert_eq!(location.hash, "#top");
	assert_eq!(stack.current_entry().url, "/?tab=2#top");
}

#[rstest]
fn test_string_target_with_hash_before_query(stack: MemoryStack) {
	let history: History = History::new(stack).unwrap();
	history.push("/doc#part?not-query", None).unwrap();

	let location = history.location();
	assert_eq!(location.pathname, "/doc");
	assert_eq!(location.search, "");
	assert_eq!(location.hash, "#part?not-query");
}

#[rstest]
fn test_typed_state_round_trips_through_platform(stack: MemoryStack) {
	#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
	struct Scroll {
		top: u32,
	}

	let history: History<Scroll> = History::new(stack.clone()).unwrap();
	history.push("/feed", Some(Scroll { top: 10 })).unwrap();
	history.push("/post/1", None).unwrap();

	history.go_back();
	stack.dispatch_all();

	assert_eq!(history.location().pathname, "/feed");
	assert_eq!(history.location().state, Some(Scroll { top: 10 }));
}

// ============================================================================
// Go
// ============================================================================

#[rstest]
fn test_go_is_not_synchronously_consistent(stack: MemoryStack) {
	let history: History = History::new(stack.clone()).unwrap();
	history.push("/a", None).unwrap();
	history.push("/b", None).unwrap();

	history.go(-2);
	assert_eq!(history.location().pathname, "/b");

	stack.dispatch_all();
	assert_eq!(history.location().pathname, "/home");
	assert_eq!(history.index(), 0);

	history.go_forward();
	stack.dispatch_all();
	assert_eq!(history.location().pathname, "/a");
}

#[rstest]
fn test_pop_reconciliation_notifies_once(stack: MemoryStack) {
	let history: History = History::new(stack.clone()).unwrap();
	history.push("/a", None).unwrap();
	history.push("/b", None).unwrap();
	let seen = updates(&history);

	history.go_back();
	stack.dispatch_all();

	assert_eq!(history.index(), 1);
	assert_eq!(history.action(), Action::Pop);
	let seen = seen.borrow();
	assert_eq!(seen.len(), 1);
	assert_eq!(seen[0].action, Action::Pop);
	assert_eq!(seen[0].location.pathname, "/a");
	assert_eq!(seen[0].location, history.location());
}

// ============================================================================
// Listeners
// ============================================================================

#[rstest]
fn test_listeners_called_in_registration_order(stack: MemoryStack) {
	let history: History = History::new(stack).unwrap();
	let order: Rc<RefCell<Vec<&'static str>>> = Rc::default();

	for name in ["first", "second", "third"] {
		let order = order.clone();
		let _ = history.listen(move |_| order.borrow_mut().push(name));
	}

	history.push("/x", None).unwrap();
	assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
}

#[rstest]
fn test_unsubscribed_listener_not_invoked(stack: MemoryStack) {
	let history: History = History::new(stack).unwrap();
	let calls = Rc::new(RefCell::new(0));

	let counter = calls.clone();
	let handle = history.listen(move |_| *counter.borrow_mut() += 1);
	history.push("/one", None).unwrap();
	assert!(handle.unsubscribe());

	history.push("/two", None).unwrap();
	history.replace("/three", None).unwrap();

	assert_eq!(*calls.borrow(), 1);
}

#[rstest]
fn test_listener_may_navigate_reentrantly(stack: MemoryStack) {
	let history: History = History::new(stack.clone()).unwrap();
	let redirecting = history.clone();
	let _ = history.listen(move |update| {
		if update.location.pathname == "/old" {
			redirecting.replace("/new", None).unwrap();
		}
	});

	let outcome = history.push("/old", None).unwrap();

	assert_eq!(outcome, NavigationOutcome::Committed);
	assert_eq!(history.location().pathname, "/new");
	assert_eq!(history.index(), 1);
	assert_eq!(stack.len(), 2);
}

#[rstest]
fn test_listener_reads_committed_state(stack: MemoryStack) {
	let history: History = History::new(stack).unwrap();
	let observed: Rc<RefCell<Option<(usize, String)>>> = Rc::default();

	let reader = history.clone();
	let sink = observed.clone();
	let _ = history.listen(move |_| {
		*sink.borrow_mut() = Some((reader.index(), reader.location().pathname));
	});

	history.push("/read", None).unwrap();
	assert_eq!(*observed.borrow(), Some((1, "/read".to_string())));
}

// ============================================================================
// Keys
// ============================================================================

#[rstest]
fn test_consecutive_push_keys_are_distinct(stack: MemoryStack) {
	let history: History = History::new(stack).unwrap();
	let mut keys = HashSet::new();

	for _ in 0..10_000 {
		history.push("/k", None).unwrap();
		assert!(keys.insert(history.location().key));
	}
	assert_eq!(keys.len(), 10_000);
}

#[rstest]
fn test_new_history_adopts_entries_written_by_previous_instance(stack: MemoryStack) {
	let first: History = History::new(stack.clone()).unwrap();
	first.push("/kept", Some(json!("s"))).unwrap();
	let key = first.location().key;
	drop(first);

	let second: History = History::new(stack.clone()).unwrap();
	assert_eq!(second.index(), 1);
	assert_eq!(second.location().key, key);
	assert_eq!(second.location().state, Some(json!("s")));
}
