// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fm doctor` — prints a diagnostic report of the resolved
//! configuration and what's wired into the registry, so a user can
//! tell why a run behaved unexpectedly without re-reading the config
//! layering rules (spec §4.10 ambient, §6).

use anyhow::Result;
use fm_registry::Registry;

pub fn handle(config: &fm_config::FmConfig) -> Result<i32> {
    println!("fm diagnostic report");
    println!();

    println!("Platform     {} ({})", std::env::consts::OS, std::env::consts::ARCH);
    println!("Log root     {}", config.log_root.display());
    let latest = fm_reporter::latest_run_id(&config.log_root)?;
    println!("Latest run   {}", latest.as_deref().unwrap_or("none"));
    println!();

    println!("Resources");
    println!("  Cores (configured)  {}", config.total_cores);
    println!("  System cores        {}", num_cpus::get());
    println!("  MPI launcher        {}", config.mpi_launcher);
    println!("  Retention           {} runs", config.retention);
    println!();

    println!("Batch backend");
    match &config.batch {
        Some(batch) => {
            println!("  submit  {}", batch.submit);
            println!("  status  {}", batch.status);
        }
        None => println!("  not configured"),
    }
    println!();

    let registry = Registry::new();
    fm_steps::register_builtins(&registry, &config.mpi_launcher);

    println!("Actions registered");
    for name in registry.action_names() {
        println!("  - {name}");
    }
    println!();

    println!("Functions registered");
    let functions = registry.function_names();
    if functions.is_empty() {
        println!("  none");
    } else {
        for name in functions {
            println!("  - {name}");
        }
    }

    Ok(0)
}

#[cfg(test)]
#[path = "doctor_tests.rs"]
mod tests;
