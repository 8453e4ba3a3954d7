// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `uses: mpi` — runs a command under an MPI launcher across several
//! ranks. `num_cores` scales with the rank count so the scheduler's
//! admission policy accounts for it correctly.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use fm_adapters::{compose_env, run_with_timeout};
use fm_core::{ActionConstructor, Context, InterpolationError, Step, StepOutcome, StepParams};

use crate::interpolate::interpolate;

pub struct MpiStep {
    pub name: String,
    pub launcher: String,
    pub inner_command: String,
    pub n_procs: u32,
    pub id: Option<String>,
    pub working_directory: Option<String>,
    pub timeout_minutes: f64,
}

#[async_trait]
impl Step for MpiStep {
    fn command(&self, ctx: &Context) -> Result<Option<String>, InterpolationError> {
        let inner = interpolate(&self.inner_command, ctx)?;
        Ok(Some(format!(
            "{} -np {} {inner}",
            self.launcher, self.n_procs
        )))
    }

    async fn run(&mut self, ctx: &mut Context) -> StepOutcome {
        let command = match self.command(ctx) {
            Ok(Some(command)) => command,
            Ok(None) => return StepOutcome::default(),
            Err(err) => {
                tracing::error!(step = %self.name, error = %err, "failed to build mpi command");
                return StepOutcome { return_code: fm_adapters::SPAWN_FAILED, ..Default::default() };
            }
        };

        let env = compose_env(&ctx.env, &HashMap::new());
        let timeout = Duration::from_secs_f64(self.timeout_minutes * 60.0);
        let outcome = run_with_timeout(&command, self.working_directory.as_deref(), &env, timeout).await;

        if outcome.return_code == 0 {
            if let Some(id) = &self.id {
                ctx.record_step_output(id, String::from_utf8_lossy(&outcome.stdout).into_owned());
            }
        }
        StepOutcome {
            stdout: outcome.stdout,
            stderr: outcome.stderr,
            return_code: outcome.return_code,
        }
    }

    fn num_cores(&self) -> u32 {
        self.n_procs
    }

    fn timeout_minutes(&self) -> f64 {
        self.timeout_minutes
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Builds `MpiStep`s from `with: { n_procs, launcher?, run }` params.
/// `launcher` falls back to the configured default when the step does
/// not override it.
pub struct MpiConstructor {
    pub default_launcher: String,
}

impl ActionConstructor for MpiConstructor {
    fn construct(&self, params: StepParams) -> Box<dyn Step> {
        let n_procs = params
            .with
            .get("n_procs")
            .and_then(|v| v.as_u64())
            .unwrap_or(1) as u32;
        let launcher = params
            .with
            .get("launcher")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| self.default_launcher.clone());
        let inner_command = params
            .with
            .get("run")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        Box::new(MpiStep {
            name: params.name,
            launcher,
            inner_command,
            n_procs,
            id: params.id,
            working_directory: params.working_directory,
            timeout_minutes: params.timeout_minutes,
        })
    }
}

#[cfg(test)]
#[path = "mpi_tests.rs"]
mod tests;
