// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fm show <job-id>` — rediscovers and rebuilds the DAG the same way
//! `run` would, then prints one job's resolved state: its matrix
//! binding, required cores, dependency edges, and each step's
//! interpolated command (spec §4.10, §6).

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Args;
use fm_registry::Registry;

#[derive(Args)]
pub struct ShowArgs {
    /// Job name or internal job id to show.
    pub job: String,

    /// Directory to scan for ktests.yaml workflow files. Repeatable;
    /// defaults to the current directory.
    #[arg(long = "location", value_name = "DIR")]
    pub locations: Vec<PathBuf>,
}

pub fn handle(args: ShowArgs, config: &fm_config::FmConfig) -> Result<i32> {
    let locations = if args.locations.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        args.locations
    };

    let (specs, errors) = fm_runbook::discover_specs(&locations);
    for (path, err) in &errors {
        eprintln!("warning: skipping {}: {err}", path.display());
    }

    let registry = Registry::new();
    fm_steps::register_builtins(&registry, &config.mpi_launcher);

    let fm_scheduler::BuildOutput { dag, jobs } = fm_scheduler::build(&specs, &registry)?;

    let (id, running) = jobs
        .iter()
        .find(|(id, running)| running.job.name == args.job || id.as_str() == args.job)
        .ok_or_else(|| anyhow!("no job `{}` found among discovered specs", args.job))?;

    println!("job       {}", running.job.name);
    println!("id        {}", id.as_str());
    println!("cores     {}", running.job.required_cores);

    let needs: Vec<&str> = dag
        .predecessors(id)
        .iter()
        .map(|dep| jobs[dep].job.name.as_str())
        .collect();
    println!("needs     {}", if needs.is_empty() { "(none)".to_string() } else { needs.join(", ") });

    println!("matrix    {}", running.job.context.vars["matrix"]);
    println!();
    println!("steps:");
    for step in &running.steps {
        match step.command(&running.job.context) {
            Ok(Some(command)) => println!("  - {}: {command}", step.name()),
            Ok(None) => println!("  - {}: (no subprocess)", step.name()),
            Err(err) => println!("  - {}: <interpolation error: {err}>", step.name()),
        }
    }

    Ok(0)
}

#[cfg(test)]
#[path = "show_tests.rs"]
mod tests;
