//! Browser tests for the `window.history` platform stack
//!
//! Run with `wasm-pack test --headless --firefox crates/backtrack-web`.

#[cfg(target_arch = "wasm32")]
mod browser_stack_tests {
	use backtrack_history::{Action, History, NavigationOutcome, PlatformStack};
	use backtrack_web::{BrowserStack, create_browser_history};
	use serde_json::{Value, json};
	use wasm_bindgen_test::*;

	wasm_bindgen_test_configure!(run_in_browser);

	fn pathname() -> String {
		web_sys::window().unwrap().location().pathname().unwrap()
	}

	#[wasm_bindgen_test]
	fn test_bootstrap_marks_current_entry() {
		let stack = BrowserStack::new().unwrap();
		stack.replace_entry(Value::Null, "/bootstrap").unwrap();

		let history: History<Value, BrowserStack> = History::new(stack).unwrap();

		let key = history.location().key;
		assert_eq!(history.index(), 0);
		assert_ne!(key, "default");
		assert_eq!(history.location().pathname, "/bootstrap");
		assert_eq!(
			history.platform().current_payload(),
			Some(json!({"idx": 0, "key": key, "usr": null}))
		);
	}

	#[wasm_bindgen_test]
	fn test_push_updates_address_bar() {
		let history = create_browser_history::<Value>().unwrap();
		let before = history.len();

		let outcome = history
			.push("/browser/pushed?tab=1", Some(json!({"scroll": 4})))
			.unwrap();

		assert_eq!(outcome, NavigationOutcome::Committed);
		assert_eq!(pathname(), "/browser/pushed");
		assert_eq!(history.len(), before + 1);
		let payload = history.platform().current_payload().unwrap();
		assert_eq!(payload["usr"], json!({"scroll": 4}));
		assert_eq!(payload["key"], json!(history.location().key));
	}

	#[wasm_bindgen_test]
	fn test_replace_keeps_stack_length() {
		let history = create_browser_history::<Value>().unwrap();
		history.push("/browser/a", None).unwrap();
		let before = history.len();

		history.replace("/browser/b#top", None).unwrap();

		assert_eq!(history.len(), before);
		assert_eq!(history.action(), Action::Replace);
		assert_eq!(history.platform().current_path().hash, "#top");
	}

	#[wasm_bindgen_test]
	fn test_blocked_push_leaves_address_bar() {
		let history = create_browser_history::<Value>().unwrap();
		history.replace("/browser/stay", None).unwrap();
		let _blocker = history.block(|_| {});

		let outcome = history.push("/browser/elsewhere", None).unwrap();

		assert_eq!(outcome, NavigationOutcome::Blocked);
		assert_eq!(pathname(), "/browser/stay");
	}
}
