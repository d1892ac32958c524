//! History configuration.

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};

/// Default length of minted location keys.
pub const DEFAULT_KEY_LENGTH: usize = 8;

/// Key reported for a managed entry whose payload carries an `idx` but no
/// key.
pub const DEFAULT_KEY: &str = "default";

/// Tunables for a [`History`](crate::History) instance.
///
/// Deserializable so applications can load it alongside their own settings;
/// every field has a default.
///
/// ```
/// use backtrack_history::HistoryConfig;
///
/// let config = HistoryConfig::default().with_key_length(12);
/// assert_eq!(config.key_length, 12);
/// assert_eq!(config.default_key, "default");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
	/// Number of alphanumeric characters in a minted location key.
	pub key_length: usize,
	/// Fallback key for managed entries written without one.
	pub default_key: String,
	/// Log foreign entries at `warn` level instead of `debug`.
	pub warn_on_foreign_entry: bool,
}

impl Default for HistoryConfig {
	fn default() -> Self {
		Self {
			key_length: DEFAULT_KEY_LENGTH,
			default_key: DEFAULT_KEY.to_string(),
			warn_on_foreign_entry: true,
		}
	}
}

impl HistoryConfig {
	/// Sets the minted key length. Values below 1 are clamped to 1.
	pub fn with_key_length(mut self, key_length: usize) -> Self {
		self.key_length = key_length.max(1);
		self
	}

	/// Sets the bootstrap key.
	pub fn with_default_key(mut self, key: impl Into<String>) -> Self {
		self.default_key = key.into();
		self
	}

	/// Chooses whether foreign entries are logged as warnings.
	pub fn with_foreign_entry_warnings(mut self, enabled: bool) -> Self {
		self.warn_on_foreign_entry = enabled;
		self
	}

	/// Mints a fresh random location key.
	pub fn mint_key(&self) -> String {
		rand::thread_rng()
			.sample_iter(&Alphanumeric)
			.take(self.key_length.max(1))
			.map(char::from)
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_defaults() {
		let config = HistoryConfig::default();
		assert_eq!(config.key_length, DEFAULT_KEY_LENGTH);
		assert_eq!(config.default_key, DEFAULT_KEY);
		assert!(config.warn_on_foreign_entry);
	}

	#[rstest]
	#[case(0, 1)]
	#[case(1, 1)]
	#[case(16, 16)]
	fn test_mint_key_length(#[case] requested: usize, #[case] expected: usize) {
		let config = HistoryConfig::default().with_key_length(requested);
		let key = config.mint_key();
		assert_eq!(key.len(), expected);
		assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
	}

	#[rstest]
	fn test_deserialize_partial_config() {
		let config: HistoryConfig = serde_json::from_str(r#"{"key_length": 6}"#).unwrap();
		assert_eq!(config.key_length, 6);
		assert_eq!(config.default_key, DEFAULT_KEY);
		assert!(config.warn_on_foreign_entry);
	}
}
