//! The [`Currenton`] primitive.

use std::any::type_name;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::error::CurrentonError;
use crate::registry;

/// Per-thread "current instance of `T`", overridable in a stack fashion.
///
/// Each thread owns an independent stack of `T` values per payload type. The
/// top of the stack is the current value; [`with_current`](Self::with_current)
/// pushes a value for the dynamic extent of a call and pops it again on every
/// exit path, including `Err` results and panics.
///
/// This type is never constructed: all operations are associated functions
/// and the stack itself lives in thread-local storage for the lifetime of its
/// thread.
///
/// # Examples
///
/// ```rust
/// use currenton::Currenton;
///
/// struct Clock {
///     now: u64,
/// }
///
/// fn elapsed_since(start: u64) -> u64 {
///     Currenton::<Clock>::current().map_or(0, |clock| clock.now - start)
/// }
///
/// let elapsed = Currenton::with_current(Clock { now: 42 }, || elapsed_since(40));
/// assert_eq!(elapsed, 2);
/// assert!(!Currenton::<Clock>::is_set());
/// ```
pub struct Currenton<T: 'static> {
    _payload: PhantomData<fn() -> T>,
}

impl<T: 'static> Currenton<T> {
    /// Get the current value on the calling thread.
    ///
    /// The returned handle shares ownership of the top frame's value, so it
    /// stays valid after the frame is popped. It is no longer *current* at
    /// that point; retaining it across the matching pop only extends the
    /// value's lifetime.
    ///
    /// Returns [`CurrentonError::NoCurrentValue`] when nothing is pushed.
    pub fn current() -> crate::Result<Rc<T>> {
        registry::with_stack::<T, _>(|stack| stack.top().cloned())?
            .ok_or_else(CurrentonError::no_current_value::<T>)
    }

    /// Like [`current`](Self::current), but `None` for any error.
    pub fn try_current() -> Option<Rc<T>> {
        Self::current().ok()
    }

    /// Make `value` current for the duration of `f`.
    ///
    /// `value` is pushed before `f` runs and popped exactly once after it
    /// returns. Whatever `f` returns, including an `Err`, is handed back
    /// unchanged; a panic in `f` pops the frame while unwinding and then
    /// keeps unwinding. Calls may nest and recurse freely.
    ///
    /// # Panics
    ///
    /// Panics if called while the thread's local storage is being destroyed,
    /// the same contract as [`std::thread::LocalKey::with`].
    pub fn with_current<R>(value: T, f: impl FnOnce() -> R) -> R {
        let _frame = Frame::<T>::push(value);
        f()
    }

    /// Number of frames on the calling thread's stack.
    pub fn depth() -> usize {
        registry::with_stack::<T, _>(|stack| stack.depth()).unwrap_or(0)
    }

    /// Whether a value is current on the calling thread.
    pub fn is_set() -> bool {
        Self::depth() > 0
    }
}

impl<T: 'static> std::fmt::Debug for Currenton<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Currenton")
            .field("payload", &type_name::<T>())
            .finish()
    }
}

/// Scope guard owning one pushed frame; pops it on drop.
///
/// Never leaves the thread or the call that created it.
struct Frame<T: 'static> {
    depth: usize,
    _payload: PhantomData<Rc<T>>,
}

impl<T: 'static> Frame<T> {
    fn push(value: T) -> Self {
        let value = Rc::new(value);
        let depth = match registry::with_stack::<T, _>(|stack| stack.push(value)) {
            Ok(depth) => depth,
            Err(err) => panic!("cannot push a frame: {err}"),
        };
        tracing::trace!(payload = type_name::<T>(), depth, "pushed currenton frame");
        Self {
            depth,
            _payload: PhantomData,
        }
    }
}

impl<T: 'static> Drop for Frame<T> {
    fn drop(&mut self) {
        let popped = registry::with_stack::<T, _>(|stack| (stack.pop(), stack.depth()));
        // The registry borrow is released here; only now may the payload drop.
        match popped {
            Ok((Some(value), depth)) => {
                tracing::trace!(
                    payload = type_name::<T>(),
                    depth,
                    pushed_at = self.depth,
                    "popped currenton frame"
                );
                drop(value);
            }
            Ok((None, _)) => {
                tracing::warn!(
                    payload = type_name::<T>(),
                    pushed_at = self.depth,
                    "currenton stack was empty on pop"
                );
            }
            // The stack went away with the thread's local storage.
            Err(_) => {}
        }
    }
}
