//! `currenton` command-line demonstration driver.
//!
//! Installs `Counter` values as the current counter and runs example
//! recursions that read it without it being passed down: a clean unwind, a
//! failure part-way through, several threads at once, and a run with no
//! counter installed at all.

mod config;
mod driver;
mod error;
mod logging;
mod payload;
mod recursion;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use crate::config::Cli;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(&cli.log_config())?;

    let config = cli.demo_config().context("invalid configuration")?;
    tracing::info!(?config, "running currenton scenarios");

    let mut failed = 0_usize;
    for (scenario, outcome) in driver::run(&config) {
        match outcome {
            Ok(report) => {
                println!("== {}", report.scenario);
                for line in &report.lines {
                    println!("{line}");
                }
            }
            Err(err) => {
                failed += 1;
                eprintln!("== {scenario}: {err}");
            }
        }
    }

    if failed > 0 {
        tracing::warn!(failed, "some scenarios failed");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
