// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fm run` — discovers workflow files, builds and validates the DAG,
//! and runs every job to completion, writing the run directory and
//! final report (spec §4.7, §4.9).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use fm_core::{Clock, SystemClock};
use fm_registry::Registry;
use fm_scheduler::{JobLogSink, ProgressEvent, Scheduler};

#[derive(Args)]
pub struct RunArgs {
    /// Directory to scan for ktests.yaml workflow files. Repeatable;
    /// defaults to the current directory.
    #[arg(long = "location", value_name = "DIR")]
    pub locations: Vec<PathBuf>,

    /// Also write the report as CSV at this path.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Override the configured core budget for this run.
    #[arg(long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,
}

pub async fn handle(args: RunArgs, config: &fm_config::FmConfig) -> Result<i32> {
    let locations = if args.locations.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        args.locations
    };

    let (specs, errors) = fm_runbook::discover_specs(&locations);
    for (path, err) in &errors {
        tracing::warn!(path = %path.display(), error = %err, "skipping invalid workflow file");
    }
    if specs.is_empty() {
        let shown = locations
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        bail!("no job specs found under {shown}");
    }

    let registry = Registry::new();
    fm_steps::register_builtins(&registry, &config.mpi_launcher);

    let total_cores = args.jobs.unwrap_or(config.total_cores) as u32;

    let fm_scheduler::BuildOutput { dag, mut jobs } = fm_scheduler::build(&specs, &registry)?;
    fm_scheduler::validate(&dag, &mut jobs, total_cores)?;

    let job_ids: Vec<fm_core::JobId> = dag.nodes().to_vec();
    let job_names: Vec<(fm_core::JobId, String)> = job_ids
        .iter()
        .map(|id| (id.clone(), jobs[id].job.name.clone()))
        .collect();
    // Sequential, monotonically assigned per-job id (spec §3), the same
    // numbering `RunDir` uses for `job-<N>.log`, built from the same
    // discovery-order `job_ids` so the two stay in lockstep.
    let job_numbers: std::collections::HashMap<fm_core::JobId, u32> = job_ids
        .iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), i as u32 + 1))
        .collect();

    let run_id = fm_reporter::run_id_at(chrono::Utc::now());
    let run_dir = Arc::new(
        fm_reporter::RunDir::create(&config.log_root, run_id, &job_ids)
            .with_context(|| format!("creating run directory under {}", config.log_root.display()))?,
    );
    run_dir.write_job_index(&job_names).context("writing job index")?;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let renderer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            render_progress(&event);
        }
    });

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let scheduler = Arc::new(Scheduler::new(dag, jobs, total_cores, clock));
    let log_sink: Arc<dyn JobLogSink> = run_dir.clone();

    let start = std::time::Instant::now();
    let finished = scheduler.run_all_jobs(Some(tx), Some(log_sink)).await;
    let total_runtime = round3(start.elapsed().as_secs_f64());
    renderer.await.ok();

    let results = fm_reporter::build_results(&finished, &job_numbers);
    let report = fm_reporter::Report {
        results: results.clone(),
        total_runtime,
    };
    fm_reporter::write_report_yaml(&run_dir.report_yaml_path(), &report).context("writing report.yaml")?;
    if let Some(csv_path) = &args.report {
        fm_reporter::write_report_csv(csv_path, &results).context("writing CSV report")?;
    }
    run_dir.update_latest().context("updating latest symlink")?;
    fm_reporter::prune_old_runs(&config.log_root, config.retention).context("pruning old runs")?;

    println!(
        "run {} complete, report at {}",
        run_dir.run_id(),
        run_dir.report_yaml_path().display()
    );

    let any_failed = results.iter().any(|r| r.status == "failed");
    Ok(if any_failed { 1 } else { 0 })
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn render_progress(event: &ProgressEvent) {
    match event {
        ProgressEvent::JobStart { name, .. } => eprintln!("[job]  start  {name}"),
        ProgressEvent::StepStart { step, .. } => eprintln!("[step] start  {step}"),
        ProgressEvent::StepFinish { step, return_code, .. } => {
            eprintln!("[step] finish {step} rc={return_code}")
        }
        ProgressEvent::JobFinish { name, return_code, .. } => {
            eprintln!("[job]  finish {name} rc={return_code}")
        }
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
