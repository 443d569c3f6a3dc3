//! Example payload made current by the demo.

/// Immutable counter value; stands in for a clock, logger or pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    value: i64,
}

impl Counter {
    /// Create a counter holding `value`.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self { value }
    }

    /// The held value.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.value
    }
}
