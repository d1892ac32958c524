//! Error types for history operations.

/// Errors raised while writing to the platform history stack.
///
/// A blocked transition is not an error: it is reported as
/// [`NavigationOutcome::Blocked`](crate::NavigationOutcome::Blocked).
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
	/// The location state could not be encoded into an entry payload.
	#[error("failed to serialize history entry: {0}")]
	Serialize(#[from] serde_json::Error),

	/// The platform rejected a stack write.
	#[error("platform history write failed: {0}")]
	Platform(String),

	/// The current stack entry was not written by this history.
	///
	/// Only ever logged by pop handling; the state machine keeps its last
	/// known location.
	#[error("history entry at '{pathname}' was not created by this history")]
	ForeignEntry {
		/// Pathname of the foreign entry.
		pathname: String,
	},
}

/// Result alias for history operations.
pub type Result<T> = std::result::Result<T, HistoryError>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_platform_error_display() {
		let err = HistoryError::Platform("SecurityError".to_string());
		assert_eq!(err.to_string(), "platform history write failed: SecurityError");
	}

	#[rstest]
	fn test_foreign_entry_display() {
		let err = HistoryError::ForeignEntry {
			pathname: "/legacy".to_string(),
		};
		assert!(err.to_string().contains("/legacy"));
	}

	#[rstest]
	fn test_serialize_error_from_serde() {
		let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
		let err: HistoryError = source.into();
		assert!(matches!(err, HistoryError::Serialize(_)));
	}
}
