// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process spawning shared by every process-backed step: environment
//! composition, wall-clock timeout, and process-group kill so a
//! timed-out step cannot leave orphaned descendants (an MPI
//! launcher's ranks, a shell pipeline's children) running.

use std::collections::HashMap;
use std::os::unix::process::CommandExt;
use std::process::Stdio;
use std::time::Duration;

use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tokio::process::Command;

/// Return code used when a step is killed for exceeding its timeout.
pub const TIMED_OUT: i32 = 124;
/// Return code used when the child could not be spawned at all.
pub const SPAWN_FAILED: i32 = -1;

#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub return_code: i32,
}

/// Runs `command` under `sh -c` in its own process group, with the OS
/// environment overlaid by `env`, and enforces `timeout`.
///
/// On timeout: kills the whole process group with `SIGKILL`, reports
/// stderr as "Step timed out", and returns code [`TIMED_OUT`]. On
/// spawn failure: returns code [`SPAWN_FAILED`] with empty output.
pub async fn run_with_timeout(
    command: &str,
    cwd: Option<&str>,
    env: &HashMap<String, String>,
    timeout: Duration,
) -> ProcessOutcome {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    if let Some(cwd) = cwd {
        cmd.current_dir(cwd);
    }
    cmd.envs(env);
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    // A process group of its own (pgid == pid) so timeout cleanup can
    // kill the whole tree, not just the immediate child.
    cmd.process_group(0);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            tracing::warn!(error = %err, command, "failed to spawn step process");
            return ProcessOutcome {
                stdout: Vec::new(),
                stderr: Vec::new(),
                return_code: SPAWN_FAILED,
            };
        }
    };

    let pid = child.id();

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => ProcessOutcome {
            stdout: output.stdout,
            stderr: output.stderr,
            return_code: output.status.code().unwrap_or(SPAWN_FAILED),
        },
        Ok(Err(err)) => {
            tracing::warn!(error = %err, command, "step process wait failed");
            ProcessOutcome {
                stdout: Vec::new(),
                stderr: Vec::new(),
                return_code: SPAWN_FAILED,
            }
        }
        Err(_elapsed) => {
            if let Some(pid) = pid {
                if let Err(err) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
                    tracing::warn!(error = %err, pid, "failed to kill timed-out process group");
                }
            }
            ProcessOutcome {
                stdout: Vec::new(),
                stderr: b"Step timed out".to_vec(),
                return_code: TIMED_OUT,
            }
        }
    }
}

/// Composes a child environment: the parent process environment
/// overlaid by the job's `Context.env`, overlaid by step-local extras.
pub fn compose_env(
    context_env: &HashMap<String, String>,
    extra: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut env: HashMap<String, String> = std::env::vars().collect();
    env.extend(context_env.clone());
    env.extend(extra.clone());
    env
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
