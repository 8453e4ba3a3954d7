// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fm list` — discovers workflow files and prints the jobs they
//! declare, without building or running anything (spec §4.10, §6).

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct ListArgs {
    /// Directory to scan for ktests.yaml workflow files. Repeatable;
    /// defaults to the current directory.
    #[arg(long = "location", value_name = "DIR")]
    pub locations: Vec<PathBuf>,
}

pub fn handle(args: ListArgs) -> Result<i32> {
    let locations = if args.locations.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        args.locations
    };

    let (specs, errors) = fm_runbook::discover_specs(&locations);
    for (path, err) in &errors {
        eprintln!("warning: skipping {}: {err}", path.display());
    }

    if specs.is_empty() {
        println!("no job specs found");
        return Ok(0);
    }

    for spec in &specs {
        let needs = if spec.needs.is_empty() {
            String::new()
        } else {
            format!(" (needs: {})", spec.needs.join(", "))
        };
        println!("{}{}", spec.name, needs);
        if let Some(description) = &spec.description {
            println!("    {description}");
        }
    }

    Ok(0)
}
