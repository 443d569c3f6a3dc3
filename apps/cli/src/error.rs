//! Demo error types.

use currenton::CurrentonError;

/// Errors raised by the example recursions and the scenario driver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DemoError {
    /// Reading the current counter failed.
    #[error(transparent)]
    Currenton(#[from] CurrentonError),

    /// The failing recursion reached its trigger value.
    #[error("deliberate failure at value {value}")]
    Deliberate {
        /// Value that was current when the failure was raised.
        value: i64,
    },

    /// A worker thread panicked instead of returning.
    #[error("worker thread {index} panicked")]
    ThreadPanicked {
        /// Index of the worker thread.
        index: usize,
    },

    /// A scenario finished but its outcome did not match expectations.
    #[error("scenario `{scenario}` failed verification: {reason}")]
    Verification {
        /// Scenario name.
        scenario: &'static str,
        /// What did not match.
        reason: String,
    },
}

/// Invalid demo configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A start value lies above the recursion limit.
    #[error("{field} ({value}) must not exceed --limit ({limit})")]
    StartAboveLimit {
        /// Flag that carried the value.
        field: &'static str,
        /// Offending start value.
        value: i64,
        /// Configured limit.
        limit: i64,
    },

    /// The thread scenario needs at least one thread.
    #[error("--threads must be at least 1")]
    NoThreads,
}
