//! Store error types

use thiserror::Error;

/// Errors reported by store operations.
///
/// Plain [`Store::set_value`](crate::Store::set_value) never returns an error:
/// a panicking listener unwinds straight out of it. Only the isolating variant
/// [`Store::try_set_value`](crate::Store::try_set_value) reports failures here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// One or more listeners panicked while being notified
    #[error("{failed} of {total} listeners of `{store}` panicked: {message}")]
    ListenerPanicked {
        /// Label of the store that was being written
        store: String,
        /// Number of listeners that panicked
        failed: usize,
        /// Number of listeners in the notified snapshot
        total: usize,
        /// Panic message of the first failing listener
        message: String,
    },
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
