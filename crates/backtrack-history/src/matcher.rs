//! Path-pattern matcher boundary.
//!
//! Route matching belongs to the view layer. The history only forwards its
//! current pathname to whatever matcher the application supplies.

use std::collections::HashMap;

/// Parameters extracted by a successful match.
pub type Params = HashMap<String, String>;

/// Matches a path against a pattern.
pub trait PathMatcher {
	/// Returns the extracted parameters, or `None` when `path` does not match.
	fn match_path(&self, pattern: &str, path: &str) -> Option<Params>;
}

impl<F> PathMatcher for F
where
	F: Fn(&str, &str) -> Option<Params>,
{
	fn match_path(&self, pattern: &str, path: &str) -> Option<Params> {
		self(pattern, path)
	}
}
