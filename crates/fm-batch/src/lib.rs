// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The HPC batch backend: an alternate sink for a `JobSpec`, reached
//! only through `fm-cli batch submit/status`, never by the default
//! `run` path. Given submit/status command templates (e.g. `sbatch
//! {script}` / `squeue -j {id}`), renders a job to a standalone shell
//! script, submits it, and polls its status.

pub mod error;
pub mod metadata;
pub mod script;
pub mod status;

use std::path::Path;
use std::process::Command;

pub use error::BatchError;
pub use fm_config::BatchCommands;
pub use metadata::{read_metadata, write_metadata, BatchMetadata};
pub use script::render_script;
pub use status::{classify, BatchStatus};

/// Submits `script_path` via `commands.submit`, with `{script}`
/// replaced by the script's path. Parses the opaque job id as the
/// first whitespace-delimited token of the command's stdout, matching
/// common batch-scheduler CLI conventions (e.g. `sbatch` prints
/// `Submitted batch job 12345`... most backends' automation-friendly
/// mode just prints the bare id as the first token).
pub fn submit(commands: &BatchCommands, script_path: &Path) -> Result<String, BatchError> {
    let rendered = commands
        .submit
        .replace("{script}", &script_path.to_string_lossy());

    let output = run_shell(&rendered)?;
    if !output.status.success() {
        return Err(BatchError::SubmitFailed {
            command: rendered,
            code: output.status.code().unwrap_or(-1),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    stdout
        .split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or(BatchError::NoJobIdInOutput)
}

/// Polls `commands.status` with `{id}` replaced by `job_id`, and
/// classifies its stdout into a [`BatchStatus`].
pub fn status(commands: &BatchCommands, job_id: &str) -> Result<BatchStatus, BatchError> {
    let rendered = commands.status.replace("{id}", job_id);
    let output = run_shell(&rendered)?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(classify(&stdout))
}

fn run_shell(command: &str) -> Result<std::process::Output, BatchError> {
    Command::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .map_err(|source| BatchError::Spawn {
            command: command.to_string(),
            source,
        })
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
