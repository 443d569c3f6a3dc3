//! Currenton error types.

/// Errors returned when reading the current value of a payload type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CurrentonError {
    /// The calling thread has no frame pushed for this payload type.
    #[error("no current value of type {type_name}")]
    NoCurrentValue {
        /// Name of the payload type that was looked up.
        type_name: &'static str,
    },

    /// The thread-local registry was already destroyed (thread is exiting).
    #[error("thread-local currenton for {type_name} is no longer available")]
    ThreadExiting {
        /// Name of the payload type that was looked up.
        type_name: &'static str,
    },
}

impl CurrentonError {
    /// Build a [`CurrentonError::NoCurrentValue`] for `T`.
    pub(crate) fn no_current_value<T: ?Sized>() -> Self {
        Self::NoCurrentValue {
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Build a [`CurrentonError::ThreadExiting`] for `T`.
    pub(crate) fn thread_exiting<T: ?Sized>() -> Self {
        Self::ThreadExiting {
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Whether the caller can sensibly recover, e.g. by installing a default.
    ///
    /// A missing value is recoverable; a thread in teardown is not.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoCurrentValue { .. })
    }

    /// Name of the payload type the error refers to.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::NoCurrentValue { type_name } | Self::ThreadExiting { type_name } => type_name,
        }
    }
}
