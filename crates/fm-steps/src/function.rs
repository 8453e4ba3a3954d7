// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `uses: <name>` resolved against the function table: an in-process
//! callable rather than a subprocess. Used for built-in steps that
//! need no external tool (e.g. simple assertions) and for whatever an
//! out-of-tree crate registers via `Registry::register_function`.

use std::sync::Arc;

use async_trait::async_trait;

use fm_core::{Context, InterpolationError, Step, StepFunction, StepOutcome, StepParams};

pub struct FunctionStep {
    pub name: String,
    pub function: Arc<dyn StepFunction>,
    pub params: StepParams,
}

#[async_trait]
impl Step for FunctionStep {
    fn command(&self, _ctx: &Context) -> Result<Option<String>, InterpolationError> {
        Ok(None)
    }

    async fn run(&mut self, ctx: &mut Context) -> StepOutcome {
        let result = self.function.call(ctx, &self.params);
        if result.return_code == 0 {
            if let Some(id) = &self.params.id {
                ctx.record_step_output(id, result.output.clone());
            }
        }
        StepOutcome {
            stdout: result.output.into_bytes(),
            stderr: Vec::new(),
            return_code: result.return_code,
        }
    }

    fn timeout_minutes(&self) -> f64 {
        self.params.timeout_minutes
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
#[path = "function_tests.rs"]
mod tests;
