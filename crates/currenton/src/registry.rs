//! Per-thread registry of frame stacks, keyed by payload type.
//!
//! `thread_local!` cannot be generic, so every thread owns a single map from
//! a payload's [`TypeId`] to its type-erased [`FrameStack`]. Only the owning
//! thread ever touches its map, which makes lazy population race-free without
//! any locking.

use std::any::{Any, TypeId, type_name};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::CurrentonError;

thread_local! {
    static REGISTRY: RefCell<HashMap<TypeId, Box<dyn Any>>> = RefCell::new(HashMap::new());
}

/// LIFO sequence of frames for one payload type on one thread.
///
/// The last element is the current value.
pub(crate) struct FrameStack<T: 'static> {
    frames: Vec<Rc<T>>,
}

impl<T: 'static> FrameStack<T> {
    fn new() -> Self {
        Self { frames: Vec::new() }
    }

    /// Push a frame and return the new depth.
    pub(crate) fn push(&mut self, value: Rc<T>) -> usize {
        self.frames.push(value);
        self.frames.len()
    }

    /// Remove the top frame.
    ///
    /// The frame is handed back so the caller can drop it after releasing the
    /// registry borrow; a payload's `Drop` may itself read a currenton.
    pub(crate) fn pop(&mut self) -> Option<Rc<T>> {
        self.frames.pop()
    }

    pub(crate) fn top(&self) -> Option<&Rc<T>> {
        self.frames.last()
    }

    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }
}

impl<T: 'static> Drop for FrameStack<T> {
    fn drop(&mut self) {
        tracing::trace!(
            payload = type_name::<T>(),
            remaining = self.frames.len(),
            "destroying thread currenton"
        );
    }
}

/// Run `f` against the calling thread's stack for `T`, creating it on first use.
///
/// The registry stays borrowed for the duration of `f`, so `f` must not call
/// back into caller-supplied code. Events are emitted only after the borrow is
/// released, since a subscriber may read a currenton itself.
pub(crate) fn with_stack<T: 'static, R>(
    f: impl FnOnce(&mut FrameStack<T>) -> R,
) -> crate::Result<R> {
    let (result, created) = REGISTRY
        .try_with(|registry| {
            let mut registry = registry.borrow_mut();
            let mut created = false;
            let stack = registry
                .entry(TypeId::of::<T>())
                .or_insert_with(|| {
                    created = true;
                    Box::new(FrameStack::<T>::new())
                })
                .downcast_mut::<FrameStack<T>>()
                .expect("registry entries are keyed by the TypeId of their payload");
            (f(stack), created)
        })
        .map_err(|_| CurrentonError::thread_exiting::<T>())?;

    if created {
        tracing::trace!(payload = type_name::<T>(), "creating thread currenton");
    }
    Ok(result)
}

/// Number of payload types with a stack on the calling thread.
#[cfg(test)]
pub(crate) fn registered_types() -> usize {
    REGISTRY.with(|registry| registry.borrow().len())
}
