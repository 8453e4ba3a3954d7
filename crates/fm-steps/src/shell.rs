// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The default step kind: a literal `run:` shell script.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use fm_adapters::{compose_env, run_with_timeout};
use fm_core::{Context, InterpolationError, Step, StepOutcome};

use crate::interpolate::interpolate;

pub struct ShellStep {
    pub name: String,
    pub script: String,
    pub id: Option<String>,
    pub working_directory: Option<String>,
    pub timeout_minutes: f64,
    pub extra_env: HashMap<String, String>,
}

#[async_trait]
impl Step for ShellStep {
    fn command(&self, ctx: &Context) -> Result<Option<String>, InterpolationError> {
        Ok(Some(interpolate(&self.script, ctx)?))
    }

    async fn run(&mut self, ctx: &mut Context) -> StepOutcome {
        let command = match self.command(ctx) {
            Ok(Some(command)) => command,
            Ok(None) => return StepOutcome::default(),
            Err(err) => {
                tracing::error!(step = %self.name, error = %err, "failed to build step command");
                return StepOutcome { return_code: fm_adapters::SPAWN_FAILED, ..Default::default() };
            }
        };

        let env = compose_env(&ctx.env, &self.extra_env);
        let timeout = Duration::from_secs_f64(self.timeout_minutes * 60.0);
        let outcome = run_with_timeout(
            &command,
            self.working_directory.as_deref(),
            &env,
            timeout,
        )
        .await;

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
        1
    }

    fn timeout_minutes(&self) -> f64 {
        self.timeout_minutes
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
