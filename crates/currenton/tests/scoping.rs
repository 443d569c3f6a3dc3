//! Integration tests for push/pop discipline on a single thread

use std::panic::{AssertUnwindSafe, catch_unwind};

use currenton::{Currenton, CurrentonError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Level(i32);

#[derive(Debug, PartialEq, Eq)]
struct Failed {
    at: usize,
}

/// Push `values` one inside the other, recording what is current at each level.
///
/// Fails at index `fail_at` (if any) after reading the current value there.
fn nest(
    values: &[i32],
    fail_at: Option<usize>,
    index: usize,
    seen: &mut Vec<i32>,
) -> Result<(), Failed> {
    let Some((&head, rest)) = values.split_first() else {
        return Ok(());
    };

    Currenton::with_current(Level(head), || {
        let current = Currenton::<Level>::current().expect("frame pushed by this call");
        seen.push(current.0);

        if fail_at == Some(index) {
            return Err(Failed { at: index });
        }

        let result = nest(rest, fail_at, index + 1, seen);

        // Whether the inner call returned or failed, our own frame is current again.
        assert_eq!(*Currenton::<Level>::current().unwrap(), Level(head));
        assert_eq!(Currenton::<Level>::depth(), index + 1);
        result
    })
}

fn fail_with(at: usize) {
    std::panic::panic_any(Failed { at });
}

#[test]
fn fresh_thread_has_no_current_value() {
    std::thread::spawn(|| {
        let err = Currenton::<Level>::current().unwrap_err();
        assert!(err.is_recoverable());
        assert!(matches!(err, CurrentonError::NoCurrentValue { .. }));
    })
    .join()
    .unwrap();
}

#[rstest]
#[case::single(vec![1])]
#[case::ascending(vec![10, 11, 12, 13])]
#[case::repeated(vec![5, 5, 5])]
fn innermost_value_is_current(#[case] values: Vec<i32>) {
    let mut seen = Vec::new();
    nest(&values, None, 0, &mut seen).unwrap();

    assert_eq!(seen, values);
    assert_eq!(Currenton::<Level>::depth(), 0);
}

#[rstest]
#[case::first(0)]
#[case::middle(2)]
#[case::last(4)]
fn failure_propagates_through_every_level(#[case] fail_at: usize) {
    let values = [10, 11, 12, 13, 14];
    let mut seen = Vec::new();

    let result = nest(&values, Some(fail_at), 0, &mut seen);

    assert_eq!(result, Err(Failed { at: fail_at }));
    assert_eq!(seen, values[..=fail_at].to_vec());
    assert_eq!(Currenton::<Level>::depth(), 0);
}

#[test]
fn outer_scope_is_restored_after_inner_panic() {
    Currenton::with_current(Level(1), || {
        let caught = catch_unwind(AssertUnwindSafe(|| {
            Currenton::with_current(Level(2), || {
                Currenton::with_current(Level(3), || {
                    assert_eq!(Currenton::<Level>::depth(), 3);
                    fail_with(3);
                });
            });
        }));

        let payload = caught.unwrap_err();
        assert_eq!(payload.downcast_ref::<Failed>(), Some(&Failed { at: 3 }));
        assert_eq!(*Currenton::<Level>::current().unwrap(), Level(1));
        assert_eq!(Currenton::<Level>::depth(), 1);
    });

    assert!(!Currenton::<Level>::is_set());
}

#[test]
fn sequential_scopes_reuse_the_stack() {
    for i in 0..3 {
        let value = Currenton::with_current(Level(i), || Currenton::<Level>::current().unwrap().0);
        assert_eq!(value, i);
        assert_eq!(Currenton::<Level>::depth(), 0);
    }
}

proptest! {
    #[test]
    fn nesting_is_lifo_and_leaves_no_frames(
        values in prop::collection::vec(any::<i32>(), 0..32),
        fail_at in prop::option::of(0usize..32),
    ) {
        let before = Currenton::<Level>::depth();
        let mut seen = Vec::new();

        let result = nest(&values, fail_at, 0, &mut seen);

        prop_assert_eq!(Currenton::<Level>::depth(), before);
        match fail_at.filter(|&at| at < values.len()) {
            Some(at) => {
                prop_assert_eq!(result, Err(Failed { at }));
                prop_assert_eq!(&seen[..], &values[..=at]);
            }
            None => {
                prop_assert_eq!(result, Ok(()));
                prop_assert_eq!(seen, values);
            }
        }
    }
}
