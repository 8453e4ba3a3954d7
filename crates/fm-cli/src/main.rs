// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! fm - workflow automation job scheduler

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "fm", version, about = "Runs dependency-ordered jobs from ktests.yaml workflow files")]
struct Cli {
    /// Path to the config file (defaults to ./.fm/config.toml).
    #[arg(long = "config", global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the configured core budget.
    #[arg(long = "cores", global = true, value_name = "N")]
    cores: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run jobs discovered under one or more locations
    Run(commands::run::RunArgs),
    /// List discovered job specs
    List(commands::list::ListArgs),
    /// Print a diagnostic report of the resolved configuration
    Doctor,
    /// Show a run's report
    Status(commands::status::StatusArgs),
    /// Print a job's log file
    Log(commands::log::LogArgs),
    /// Show a job's resolved spec
    Show(commands::show::ShowArgs),
    /// HPC batch queue commands
    #[command(subcommand)]
    Batch(commands::batch::BatchCommand),
    /// Manage run tags
    #[command(subcommand)]
    Tag(commands::tag::TagCommand),
}

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(err) = run().await {
        eprintln!("Error: {}", format_error(&err));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let overrides = fm_config::ConfigOverrides {
        total_cores: cli.cores,
        mpi_launcher: None,
        log_root: None,
        retention: None,
    };
    let config = fm_config::load(cli.config.as_deref(), &overrides)?;

    let code = match cli.command {
        Commands::Run(args) => commands::run::handle(args, &config).await?,
        Commands::List(args) => commands::list::handle(args)?,
        Commands::Doctor => commands::doctor::handle(&config)?,
        Commands::Status(args) => commands::status::handle(args, &config)?,
        Commands::Log(args) => commands::log::handle(args, &config)?,
        Commands::Show(args) => commands::show::handle(args, &config)?,
        Commands::Batch(command) => commands::batch::handle(command, &config)?,
        Commands::Tag(command) => commands::tag::handle(command, &config)?,
    };

    std::process::exit(code);
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Renders an anyhow error's full cause chain, matching the teacher's
/// deduplication rule: skip "Caused by" when the top message already
/// repeats every cause's text.
fn format_error(err: &anyhow::Error) -> String {
    let top = err.to_string();
    let chain_redundant = err.chain().skip(1).all(|cause| top.contains(&cause.to_string()));
    if chain_redundant {
        return top;
    }

    let mut buf = top;
    for (i, cause) in err.chain().skip(1).enumerate() {
        buf.push_str(&format!("\n\nCaused by:\n    {}: {}", i, cause));
    }
    buf
}
