#![warn(missing_docs)]
//! # Currenton
//!
//! Per-thread singletons that can be overridden in a stack fashion for the
//! extent of a call.
//!
//! A currenton lets code install a value of type `T` as "the current `T`"
//! while a closure runs. Anything called from that closure, including
//! recursive calls, reads the value with [`Currenton::current`] instead of
//! receiving it as a parameter. Typical payloads are clocks, loggers and
//! memory pools that tests want to swap for fakes in only part of a program.
//!
//! ## Guarantees
//!
//! - **Thread isolation**: every thread has its own stack per payload type,
//!   created lazily on first access and dropped with the thread.
//! - **Stack discipline**: the most recently pushed, not yet popped value is
//!   current. Nested and recursive [`Currenton::with_current`] calls build a
//!   deeper stack.
//! - **Pop on every exit**: the frame pushed by `with_current` is popped
//!   exactly once, whether the closure returns, returns an `Err`, or panics.
//!   Failures are never swallowed.
//! - **Independent payload types**: `Currenton<Clock>` and
//!   `Currenton<Logger>` never share storage.
//!
//! ## Usage
//!
//! ```rust
//! use currenton::{Currenton, CurrentonError};
//!
//! struct Logger {
//!     prefix: &'static str,
//! }
//!
//! fn describe() -> Result<String, CurrentonError> {
//!     let logger = Currenton::<Logger>::current()?;
//!     Ok(format!("{}: working", logger.prefix))
//! }
//!
//! let line = Currenton::with_current(Logger { prefix: "outer" }, || {
//!     let inner = Currenton::with_current(Logger { prefix: "inner" }, describe);
//!     assert_eq!(inner.as_deref(), Ok("inner: working"));
//!     describe()
//! });
//! assert_eq!(line.as_deref(), Ok("outer: working"));
//!
//! // Nothing is current outside the scope.
//! assert!(matches!(describe(), Err(CurrentonError::NoCurrentValue { .. })));
//! ```

pub mod currenton;
pub mod error;

mod registry;

pub use currenton::Currenton;
pub use error::CurrentonError;

/// Result type used throughout currenton
pub type Result<T> = std::result::Result<T, CurrentonError>;
