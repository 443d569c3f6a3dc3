//! Runs the demonstration scenarios and checks their outcomes.

use std::sync::Barrier;
use std::thread;

use currenton::{Currenton, CurrentonError};

use crate::config::{DemoConfig, Scenario};
use crate::error::DemoError;
use crate::payload::Counter;
use crate::recursion::{Transition, increment_but_fail, increment_nicely};

/// Printable outcome of a scenario that passed verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    /// Scenario that produced the report.
    pub scenario: Scenario,
    /// Report lines, in the order they were observed.
    pub lines: Vec<String>,
}

/// Run every configured scenario on the calling thread, in order.
///
/// A failing scenario does not stop the ones after it.
pub fn run(config: &DemoConfig) -> Vec<(Scenario, Result<ScenarioReport, DemoError>)> {
    config
        .scenarios
        .iter()
        .map(|&scenario| {
            let _span = tracing::info_span!("scenario", %scenario).entered();
            let outcome = run_scenario(scenario, config).and_then(|lines| {
                ensure_unwound(scenario)?;
                Ok(ScenarioReport { scenario, lines })
            });
            match &outcome {
                Ok(_) => tracing::info!("scenario passed"),
                Err(err) => tracing::error!(error = %err, "scenario failed"),
            }
            (scenario, outcome)
        })
        .collect()
}

fn run_scenario(scenario: Scenario, config: &DemoConfig) -> Result<Vec<String>, DemoError> {
    match scenario {
        Scenario::Nicely => run_nicely(config.start, config.limit),
        Scenario::Failing => run_failing(config.start, config.limit, config.fail_at),
        Scenario::Threads => run_threads(config.threads, config.thread_start, config.limit),
        Scenario::Unset => run_unset(config.limit),
    }
}

/// Transitions the nice recursion must record, innermost first.
fn expected_nicely(start: i64, limit: i64) -> Vec<Transition> {
    (start..=limit)
        .rev()
        .map(|value| Transition {
            before: value,
            nested: (value < limit).then_some(value + 1),
            after: value,
        })
        .collect()
}

fn check_trace(
    scenario: Scenario,
    actual: &[Transition],
    expected: &[Transition],
) -> Result<(), DemoError> {
    if actual == expected {
        return Ok(());
    }
    Err(DemoError::Verification {
        scenario: scenario.as_str(),
        reason: format!("recorded {actual:?}, expected {expected:?}"),
    })
}

fn ensure_unwound(scenario: Scenario) -> Result<(), DemoError> {
    match Currenton::<Counter>::depth() {
        0 => Ok(()),
        depth => Err(DemoError::Verification {
            scenario: scenario.as_str(),
            reason: format!("{depth} counter frame(s) left on the stack"),
        }),
    }
}

fn run_nicely(start: i64, limit: i64) -> Result<Vec<String>, DemoError> {
    let mut trace = Vec::new();
    Currenton::with_current(Counter::new(start), || increment_nicely(limit, &mut trace))?;

    check_trace(Scenario::Nicely, &trace, &expected_nicely(start, limit))?;
    Ok(trace.iter().map(ToString::to_string).collect())
}

fn run_failing(start: i64, limit: i64, fail_at: i64) -> Result<Vec<String>, DemoError> {
    let mut trace = Vec::new();
    let result = Currenton::with_current(Counter::new(start), || {
        increment_but_fail(limit, fail_at, &mut trace)
    });

    let mut lines: Vec<String> = trace.iter().map(ToString::to_string).collect();
    match result {
        Err(err @ DemoError::Deliberate { value }) if value == fail_at => {
            let expected: Vec<_> = (start..fail_at)
                .rev()
                .map(|v| Transition {
                    before: v,
                    nested: None,
                    after: v,
                })
                .collect();
            check_trace(Scenario::Failing, &trace, &expected)?;
            lines.push(format!("Recursion failed with \"{err}\""));
        }
        Err(err) => return Err(err),
        Ok(_) if !(start..=limit).contains(&fail_at) => {
            lines.push(format!("Recursion never reached {fail_at}; nothing failed"));
        }
        Ok(_) => {
            return Err(DemoError::Verification {
                scenario: Scenario::Failing.as_str(),
                reason: format!("expected a failure at {fail_at}"),
            });
        }
    }
    Ok(lines)
}

fn run_threads(threads: usize, thread_start: i64, limit: i64) -> Result<Vec<String>, DemoError> {
    let barrier = Barrier::new(threads);
    let expected = expected_nicely(thread_start, limit);

    let outcomes: Vec<Result<Vec<Transition>, DemoError>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..threads)
            .map(|index| {
                let barrier = &barrier;
                scope.spawn(move || {
                    // A fresh thread must not see anything pushed elsewhere.
                    let leaked = Currenton::<Counter>::try_current();
                    let mut trace = Vec::new();
                    let result = Currenton::with_current(Counter::new(thread_start), || {
                        // All threads hold their own frame at the same time.
                        barrier.wait();
                        increment_nicely(limit, &mut trace)
                    });
                    tracing::debug!(index, depth = trace.len(), "worker finished");

                    if let Some(counter) = leaked {
                        return Err(DemoError::Verification {
                            scenario: Scenario::Threads.as_str(),
                            reason: format!(
                                "thread {index} saw counter {} before pushing",
                                counter.value()
                            ),
                        });
                    }
                    result?;
                    ensure_unwound(Scenario::Threads)?;
                    Ok(trace)
                })
            })
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(index, handle)| {
                handle
                    .join()
                    .map_err(|_| DemoError::ThreadPanicked { index })
                    .and_then(|outcome| outcome)
            })
            .collect()
    });

    let mut lines = Vec::new();
    for (index, outcome) in outcomes.into_iter().enumerate() {
        let trace = outcome?;
        check_trace(Scenario::Threads, &trace, &expected)?;
        lines.extend(trace.iter().map(|t| format!("[thread {index}] {t}")));
    }
    lines.push(format!("{threads} thread(s) finished independently"));
    Ok(lines)
}

fn run_unset(limit: i64) -> Result<Vec<String>, DemoError> {
    let mut trace = Vec::new();
    match increment_nicely(limit, &mut trace) {
        Err(DemoError::Currenton(err @ CurrentonError::NoCurrentValue { .. }))
            if trace.is_empty() =>
        {
            Ok(vec![format!("Failed with \"{err}\"")])
        }
        Err(err) => Err(err),
        Ok(value) => Err(DemoError::Verification {
            scenario: Scenario::Unset.as_str(),
            reason: format!("expected no current counter, found {value}"),
        }),
    }
}
