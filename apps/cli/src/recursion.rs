//! Example callers that recurse through the `Counter` currenton.
//!
//! Neither function receives the counter as a parameter: each level reads it
//! with [`Currenton::current`], pushes the next value and recurses.

use currenton::Currenton;

use crate::error::DemoError;
use crate::payload::Counter;

/// What one recursion level observed around its nested call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Current value when the level started.
    pub before: i64,
    /// Value the nested level saw as current, if there was one.
    pub nested: Option<i64>,
    /// Current value after the nested call returned or failed.
    pub after: i64,
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.nested {
            Some(nested) => write!(
                f,
                "Before call: {}. Nested: {nested}. After call: {}.",
                self.before, self.after
            ),
            None => write!(f, "Before call: {}. After call: {}.", self.before, self.after),
        }
    }
}

fn current_value() -> Result<i64, DemoError> {
    Ok(Currenton::<Counter>::current()?.value())
}

/// Count up to `limit`, one currenton frame per step.
///
/// Levels record their [`Transition`] on the way back up, innermost first.
/// Returns the value that was current for this level.
pub fn increment_nicely(limit: i64, trace: &mut Vec<Transition>) -> Result<i64, DemoError> {
    let before = current_value()?;

    let nested = if before < limit {
        let seen = Currenton::with_current(Counter::new(before + 1), || {
            increment_nicely(limit, trace)
        })?;
        Some(seen)
    } else {
        None
    };

    let after = current_value()?;
    tracing::debug!(before, ?nested, after, "increment level unwound");
    trace.push(Transition {
        before,
        nested,
        after,
    });
    Ok(before)
}

/// Like [`increment_nicely`], but fails once the current value equals `fail_at`.
///
/// Every enclosing level records what was current when it observed the
/// failure and then returns the same error unchanged.
pub fn increment_but_fail(
    limit: i64,
    fail_at: i64,
    trace: &mut Vec<Transition>,
) -> Result<i64, DemoError> {
    let before = current_value()?;

    if before == fail_at {
        tracing::debug!(value = before, "raising deliberate failure");
        return Err(DemoError::Deliberate { value: before });
    }

    if before < limit {
        let nested = Currenton::with_current(Counter::new(before + 1), || {
            increment_but_fail(limit, fail_at, trace)
        });

        if let Err(err) = nested {
            match current_value() {
                Ok(after) => trace.push(Transition {
                    before,
                    nested: None,
                    after,
                }),
                Err(lookup) => {
                    tracing::warn!(%lookup, "current value missing while unwinding");
                }
            }
            return Err(err);
        }
    }

    Ok(before)
}
