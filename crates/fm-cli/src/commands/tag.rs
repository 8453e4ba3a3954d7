// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fm tag add|list|delete` — manages `<logroot>/tags/` symlinks that
//! protect a run from retention pruning (spec §4.9, §6).

use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub enum TagCommand {
    /// Point a tag at a run (defaults to the latest run).
    Add(TagAddArgs),
    /// List every tag and the run it points at.
    List,
    /// Remove a tag.
    Delete(TagDeleteArgs),
}

#[derive(Args)]
pub struct TagAddArgs {
    pub name: String,

    #[arg(long = "run", value_name = "RUN_ID")]
    pub run: Option<String>,
}

#[derive(Args)]
pub struct TagDeleteArgs {
    pub name: String,
}

pub fn handle(command: TagCommand, config: &fm_config::FmConfig) -> Result<i32> {
    match command {
        TagCommand::Add(args) => {
            let run_id = args
                .run
                .or_else(|| fm_reporter::latest_run_id(&config.log_root).ok().flatten())
                .ok_or_else(|| anyhow!("no runs found under {}", config.log_root.display()))?;
            fm_reporter::create_tag(&config.log_root, &args.name, &run_id)
                .with_context(|| format!("creating tag `{}`", args.name))?;
            println!("tagged {run_id} as `{}`", args.name);
            Ok(0)
        }
        TagCommand::List => {
            let tags = fm_reporter::list_tags(&config.log_root).context("listing tags")?;
            if tags.is_empty() {
                println!("no tags");
            } else {
                for (name, run_id) in tags {
                    println!("{name:<20} {run_id}");
                }
            }
            Ok(0)
        }
        TagCommand::Delete(args) => {
            fm_reporter::delete_tag(&config.log_root, &args.name)
                .with_context(|| format!("deleting tag `{}`", args.name))?;
            println!("deleted tag `{}`", args.name);
            Ok(0)
        }
    }
}

#[cfg(test)]
#[path = "tag_tests.rs"]
mod tests;
