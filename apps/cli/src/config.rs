//! Command-line and environment configuration.

use clap::{Parser, ValueEnum};

use crate::error::ConfigError;

/// Exercise per-thread currentons: nesting, failure unwinding, thread
/// isolation and the missing-value path.
#[derive(Debug, Parser)]
#[command(name = "currenton", version, about)]
pub struct Cli {
    /// Initial counter for the single-thread scenarios.
    #[arg(long, env = "CURRENTON_START", default_value_t = 10)]
    pub start: i64,

    /// Recursion stops once the counter reaches this value.
    #[arg(long, env = "CURRENTON_LIMIT", default_value_t = 20)]
    pub limit: i64,

    /// Counter value at which the failing recursion fails.
    #[arg(long, env = "CURRENTON_FAIL_AT", default_value_t = 15)]
    pub fail_at: i64,

    /// Number of threads in the isolation scenario.
    #[arg(long, env = "CURRENTON_THREADS", default_value_t = 4)]
    pub threads: usize,

    /// Initial counter on each thread of the isolation scenario.
    #[arg(long, env = "CURRENTON_THREAD_START", default_value_t = 18)]
    pub thread_start: i64,

    /// Scenarios to run, in order. Runs all of them when omitted.
    #[arg(
        long = "scenario",
        env = "CURRENTON_SCENARIOS",
        value_enum,
        value_delimiter = ','
    )]
    pub scenarios: Vec<Scenario>,

    /// Log filter directive; `RUST_LOG` takes precedence when set.
    #[arg(long, env = "CURRENTON_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// One demonstration scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Recurse up to the limit and unwind normally.
    Nicely,
    /// Recurse and fail part-way; every level observes the failure.
    Failing,
    /// Run the nice recursion on several threads at once.
    Threads,
    /// Recurse with no counter installed.
    Unset,
}

impl Scenario {
    /// Every scenario, in the default run order.
    pub const ALL: [Self; 4] = [Self::Nicely, Self::Failing, Self::Threads, Self::Unset];

    /// Stable name, as accepted on the command line.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nicely => "nicely",
            Self::Failing => "failing",
            Self::Threads => "threads",
            Self::Unset => "unset",
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Single-line human readable output.
    Compact,
    /// Multi-line human readable output.
    Pretty,
    /// Newline-delimited JSON.
    Json,
}

/// Logging settings taken from the command line.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive, e.g. `warn` or `currenton=trace`.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

/// Validated scenario settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    /// Initial counter for the single-thread scenarios.
    pub start: i64,
    /// Recursion limit.
    pub limit: i64,
    /// Trigger value for the failing recursion.
    pub fail_at: i64,
    /// Worker threads in the isolation scenario.
    pub threads: usize,
    /// Initial counter per worker thread.
    pub thread_start: i64,
    /// Scenarios to run, in order.
    pub scenarios: Vec<Scenario>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            start: 10,
            limit: 20,
            fail_at: 15,
            threads: 4,
            thread_start: 18,
            scenarios: Scenario::ALL.to_vec(),
        }
    }
}

impl DemoConfig {
    /// Reject settings the scenarios cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start > self.limit {
            return Err(ConfigError::StartAboveLimit {
                field: "--start",
                value: self.start,
                limit: self.limit,
            });
        }
        if self.thread_start > self.limit {
            return Err(ConfigError::StartAboveLimit {
                field: "--thread-start",
                value: self.thread_start,
                limit: self.limit,
            });
        }
        if self.threads == 0 {
            return Err(ConfigError::NoThreads);
        }
        Ok(())
    }
}

impl Cli {
    /// Logging settings.
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone(),
            format: self.log_format,
        }
    }

    /// Validated scenario settings.
    pub fn demo_config(&self) -> Result<DemoConfig, ConfigError> {
        let scenarios = if self.scenarios.is_empty() {
            Scenario::ALL.to_vec()
        } else {
            self.scenarios.clone()
        };
        let config = DemoConfig {
            start: self.start,
            limit: self.limit,
            fail_at: self.fail_at,
            threads: self.threads,
            thread_start: self.thread_start,
            scenarios,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_run_every_scenario() {
        let cli = Cli::try_parse_from(["currenton"]).unwrap();
        assert_eq!(cli.demo_config().unwrap(), DemoConfig::default());
    }

    #[test]
    fn scenarios_keep_command_line_order() {
        let cli =
            Cli::try_parse_from(["currenton", "--scenario", "unset", "--scenario", "nicely"])
                .unwrap();
        assert_eq!(
            cli.demo_config().unwrap().scenarios,
            vec![Scenario::Unset, Scenario::Nicely]
        );
    }

    #[test]
    fn start_above_limit_is_rejected() {
        let cli = Cli::try_parse_from(["currenton", "--start", "30"]).unwrap();
        assert_eq!(
            cli.demo_config().unwrap_err(),
            ConfigError::StartAboveLimit {
                field: "--start",
                value: 30,
                limit: 20,
            }
        );
    }

    #[test]
    fn zero_threads_is_rejected() {
        let config = DemoConfig {
            threads: 0,
            ..DemoConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoThreads));
    }
}
