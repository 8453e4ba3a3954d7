// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fm batch submit|status` — drives `fm-batch`, the HPC queueing
//! backend. An alternate sink for a discovered `JobSpec`; never
//! touches the scheduler or the default `run` path (spec §4.12, §6).

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub enum BatchCommand {
    /// Render every discovered job to a script and submit it.
    Submit(BatchSubmitArgs),
    /// Poll a previously submitted job's status.
    Status(BatchStatusArgs),
}

#[derive(Args)]
pub struct BatchSubmitArgs {
    /// Directory to scan for ktests.yaml workflow files. Repeatable;
    /// defaults to the current directory.
    #[arg(long = "location", value_name = "DIR")]
    pub locations: Vec<PathBuf>,

    /// Directory to render scripts and metadata into.
    #[arg(long = "out", value_name = "DIR", default_value = ".fm/batch")]
    pub out_dir: PathBuf,
}

#[derive(Args)]
pub struct BatchStatusArgs {
    /// Directory scripts and metadata were rendered into.
    #[arg(long = "out", value_name = "DIR", default_value = ".fm/batch")]
    pub out_dir: PathBuf,
}

pub fn handle(command: BatchCommand, config: &fm_config::FmConfig) -> Result<i32> {
    let backend = config
        .batch
        .as_ref()
        .ok_or_else(|| anyhow!("no [batch] submit/status commands configured"))?;

    match command {
        BatchCommand::Submit(args) => submit(&args, backend),
        BatchCommand::Status(args) => status(&args, backend),
    }
}

fn submit(args: &BatchSubmitArgs, backend: &fm_config::BatchCommands) -> Result<i32> {
    let locations = if args.locations.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        args.locations.clone()
    };

    let (specs, errors) = fm_runbook::discover_specs(&locations);
    for (path, err) in &errors {
        eprintln!("warning: skipping {}: {err}", path.display());
    }
    if specs.is_empty() {
        anyhow::bail!(
            "no job specs found under {}",
            locations.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
        );
    }

    std::fs::create_dir_all(&args.out_dir).context("creating batch output directory")?;

    for spec in &specs {
        let script = fm_batch::render_script(spec);
        let script_path = args.out_dir.join(format!("{}.sh", spec.name));
        std::fs::write(&script_path, script).with_context(|| format!("writing {}", script_path.display()))?;

        let id = fm_batch::submit(backend, &script_path).with_context(|| format!("submitting `{}`", spec.name))?;
        let metadata_path = args.out_dir.join(format!("{}.fmmeta", spec.name));
        fm_batch::write_metadata(
            &metadata_path,
            &fm_batch::BatchMetadata {
                id: id.clone(),
                backend: "configured".to_string(),
            },
        )
        .with_context(|| format!("writing {}", metadata_path.display()))?;

        println!("{}: submitted as {id}", spec.name);
    }

    Ok(0)
}

fn status(args: &BatchStatusArgs, backend: &fm_config::BatchCommands) -> Result<i32> {
    let entries = std::fs::read_dir(&args.out_dir)
        .with_context(|| format!("reading {}", args.out_dir.display()))?;

    let mut any_failed = false;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("fmmeta") {
            continue;
        }
        let metadata = fm_batch::read_metadata(&path).with_context(|| format!("reading {}", path.display()))?;
        let state = fm_batch::status(backend, &metadata.id).with_context(|| format!("polling job {}", metadata.id))?;
        let name = path.file_stem().and_then(|s| s.to_str()).unwrap_or("job");
        println!("{name:<24} {:?}", state);
        if matches!(state, fm_batch::BatchStatus::Failed) {
            any_failed = true;
        }
    }

    Ok(if any_failed { 1 } else { 0 })
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
