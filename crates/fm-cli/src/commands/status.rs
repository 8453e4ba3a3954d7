// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fm status` — prints the last (or a named) run's report.yaml
//! (spec §4.9, §6). Does not subscribe to a live run; the spec's
//! Non-goals exclude real-time event subscription by an external
//! process, so this only ever reads a finished run's report off disk.

use anyhow::{anyhow, Context, Result};
use clap::Args;

#[derive(Args)]
pub struct StatusArgs {
    /// Run id to report on; defaults to the latest run.
    #[arg(long = "run", value_name = "RUN_ID")]
    pub run: Option<String>,
}

pub fn handle(args: StatusArgs, config: &fm_config::FmConfig) -> Result<i32> {
    let run_id = resolve_run_id(config, args.run.as_deref())?;
    let run_dir = config.log_root.join("runs").join(&run_id);
    let report_path = run_dir.join("report.yaml");

    let content = std::fs::read_to_string(&report_path)
        .with_context(|| format!("reading {}", report_path.display()))?;
    let report: fm_reporter::Report =
        serde_yaml::from_str(&content).with_context(|| format!("parsing {}", report_path.display()))?;

    println!("run {run_id}");
    println!();
    for entry in &report.results {
        let detail = match (&entry.reason, entry.return_code, entry.duration) {
            (Some(reason), _, _) => reason.clone(),
            (None, Some(rc), Some(duration)) => format!("rc={rc} duration={duration:.3}s"),
            _ => String::new(),
        };
        println!("{:<10} {:<30} {}", entry.status, entry.job_name, detail);
    }
    println!();
    println!("total runtime: {:.3}s", report.total_runtime);

    let any_failed = report.results.iter().any(|r| r.status == "failed");
    Ok(if any_failed { 1 } else { 0 })
}

fn resolve_run_id(config: &fm_config::FmConfig, requested: Option<&str>) -> Result<String> {
    if let Some(run_id) = requested {
        return Ok(run_id.to_string());
    }
    fm_reporter::latest_run_id(&config.log_root)
        .context("resolving latest run")?
        .ok_or_else(|| anyhow!("no runs found under {}", config.log_root.display()))
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
