// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fm log <job-id>` — prints a job's log file from the latest run (or
//! `--run`), resolving the job-id argument against the run's
//! `jobs.yaml` index (spec §4.9, §6).

use anyhow::{anyhow, Context, Result};
use clap::Args;
use fm_reporter::JobIndexEntry;

#[derive(Args)]
pub struct LogArgs {
    /// Job name, job number, or internal job id.
    pub job: String,

    /// Run id to read from; defaults to the latest run.
    #[arg(long = "run", value_name = "RUN_ID")]
    pub run: Option<String>,
}

pub fn handle(args: LogArgs, config: &fm_config::FmConfig) -> Result<i32> {
    let run_id = args
        .run
        .or_else(|| fm_reporter::latest_run_id(&config.log_root).ok().flatten())
        .ok_or_else(|| anyhow!("no runs found under {}", config.log_root.display()))?;

    let run_dir = config.log_root.join("runs").join(&run_id);
    let index = fm_reporter::read_job_index(&run_dir).context("reading job index")?;
    let entry = resolve_job(&index, &args.job)
        .ok_or_else(|| anyhow!("no job `{}` found in run {run_id}", args.job))?;

    let log_path = run_dir.join(format!("job-{}.log", entry.number));
    let content = std::fs::read_to_string(&log_path)
        .with_context(|| format!("reading {}", log_path.display()))?;
    print!("{content}");
    Ok(0)
}

/// Matches `needle` against a job index entry by name, then by its
/// decimal job number, then by its raw internal id.
fn resolve_job<'a>(index: &'a [JobIndexEntry], needle: &str) -> Option<&'a JobIndexEntry> {
    index
        .iter()
        .find(|entry| entry.name == needle)
        .or_else(|| {
            needle
                .parse::<u32>()
                .ok()
                .and_then(|n| index.iter().find(|entry| entry.number == n))
        })
        .or_else(|| index.iter().find(|entry| entry.id == needle))
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
