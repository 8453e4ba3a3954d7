// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-diff checks: `checks/exodiff`, `checks/csvdiff`, `checks/h5diff`,
//! `checks/convergence-rate`. Each composes an external tool invocation
//! from tolerances and paths, then interprets the tool's exit code —
//! optionally remapping a non-zero "files differ" code to 0 when the
//! step is configured with `fail_on_diff: false` (a "note the diff but
//! don't fail the job" dev mode).
//!
//! None of these tools are shipped with this crate; they must be on
//! `PATH` (`exodiff`, `csvdiff`, `h5diff`) or, for `convergence-rate`,
//! provided as `kuristo-convergence-rate` — a small helper this project
//! does not implement, matching the scope decision recorded in
//! DESIGN.md (no HDF5/linear-algebra bindings in the core).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use fm_adapters::{compose_env, run_with_timeout};
use fm_core::{ActionConstructor, Context, InterpolationError, Step, StepOutcome, StepParams};

/// Quotes `s` for embedding in a `sh -c` command line.
fn quote(s: &str) -> String {
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || "._-/:".contains(c)) {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', "'\\''"))
}

pub struct DiffCheckStep {
    pub name: String,
    pub tool: String,
    pub args: Vec<String>,
    pub working_directory: Option<String>,
    pub timeout_minutes: f64,
    pub fail_on_diff: bool,
}

#[async_trait]
impl Step for DiffCheckStep {
    fn command(&self, _ctx: &Context) -> Result<Option<String>, InterpolationError> {
        let mut parts = vec![self.tool.clone()];
        parts.extend(self.args.iter().map(|a| quote(a)));
        Ok(Some(parts.join(" ")))
    }

    async fn run(&mut self, ctx: &mut Context) -> StepOutcome {
        let command = match self.command(ctx) {
            Ok(Some(command)) => command,
            Ok(None) => return StepOutcome::default(),
            Err(err) => {
                tracing::error!(step = %self.name, error = %err, "failed to build diff-check command");
                return StepOutcome { return_code: fm_adapters::SPAWN_FAILED, ..Default::default() };
            }
        };

        let env = compose_env(&ctx.env, &HashMap::new());
        let timeout = Duration::from_secs_f64(self.timeout_minutes * 60.0);
        let outcome = run_with_timeout(&command, self.working_directory.as_deref(), &env, timeout).await;

        let return_code = if outcome.return_code != 0 && !self.fail_on_diff {
            tracing::info!(step = %self.name, "diff ignored: fail_on_diff is false");
            0
        } else {
            outcome.return_code
        };
        StepOutcome { stdout: outcome.stdout, stderr: outcome.stderr, return_code }
    }

    fn timeout_minutes(&self) -> f64 {
        self.timeout_minutes
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn str_param(with: &std::collections::BTreeMap<String, serde_json::Value>, key: &str) -> String {
    with.get(key).and_then(|v| v.as_str()).unwrap_or_default().to_string()
}

fn f64_param(with: &std::collections::BTreeMap<String, serde_json::Value>, key: &str) -> Option<f64> {
    with.get(key).and_then(|v| v.as_f64())
}

fn bool_param(with: &std::collections::BTreeMap<String, serde_json::Value>, key: &str, default: bool) -> bool {
    with.get(key).and_then(|v| v.as_bool()).unwrap_or(default)
}

fn extra_args(with: &std::collections::BTreeMap<String, serde_json::Value>) -> Vec<String> {
    with.get("extra_args")
        .and_then(|v| v.as_array())
        .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

/// `checks/exodiff`: compares two Exodus files with `exodiff`.
pub struct ExodiffConstructor;

impl ActionConstructor for ExodiffConstructor {
    fn construct(&self, params: StepParams) -> Box<dyn Step> {
        let mut args = Vec::new();
        if let Some(atol) = f64_param(&params.with, "atol") {
            args.push("-tolerance".to_string());
            args.push(atol.to_string());
            args.push("-absolute".to_string());
        }
        if let Some(rtol) = f64_param(&params.with, "rtol") {
            args.push("-tolerance".to_string());
            args.push(rtol.to_string());
            args.push("-absolute".to_string());
        }
        if let Some(floor) = f64_param(&params.with, "floor") {
            args.push("-Floor".to_string());
            args.push(floor.to_string());
        }
        args.extend(extra_args(&params.with));
        args.push(str_param(&params.with, "reference"));
        args.push(str_param(&params.with, "test"));

        Box::new(DiffCheckStep {
            name: params.name,
            tool: "exodiff".to_string(),
            args,
            working_directory: params.working_directory,
            timeout_minutes: params.timeout_minutes,
            fail_on_diff: bool_param(&params.with, "fail_on_diff", true),
        })
    }
}

/// `checks/csvdiff`: compares two CSV files with configurable tolerance.
pub struct CsvdiffConstructor;

impl ActionConstructor for CsvdiffConstructor {
    fn construct(&self, params: StepParams) -> Box<dyn Step> {
        let mut args = Vec::new();
        if let Some(rtol) = f64_param(&params.with, "rtol") {
            args.push(format!("--rtol={rtol}"));
        }
        if let Some(atol) = f64_param(&params.with, "atol") {
            args.push(format!("--atol={atol}"));
        }
        args.extend(extra_args(&params.with));
        args.push(str_param(&params.with, "reference"));
        args.push(str_param(&params.with, "test"));

        Box::new(DiffCheckStep {
            name: params.name,
            tool: "csvdiff".to_string(),
            args,
            working_directory: params.working_directory,
            timeout_minutes: params.timeout_minutes,
            fail_on_diff: bool_param(&params.with, "fail_on_diff", true),
        })
    }
}

/// `checks/h5diff`: compares two HDF5 files, optionally restricted to a
/// single dataset path.
pub struct H5diffConstructor;

impl ActionConstructor for H5diffConstructor {
    fn construct(&self, params: StepParams) -> Box<dyn Step> {
        let mut args = vec!["-r".to_string()];
        if let Some(atol) = f64_param(&params.with, "abs-tol") {
            args.push(format!("--delta={atol}"));
        } else if let Some(rtol) = f64_param(&params.with, "rel-tol") {
            args.push(format!("--relative={rtol}"));
        }
        args.push(str_param(&params.with, "gold"));
        args.push(str_param(&params.with, "test"));
        if let Some(dataset) = params.with.get("dataset").and_then(|v| v.as_str()) {
            args.push(dataset.to_string());
        }

        Box::new(DiffCheckStep {
            name: params.name,
            tool: "h5diff".to_string(),
            args,
            working_directory: params.working_directory,
            timeout_minutes: params.timeout_minutes,
            fail_on_diff: bool_param(&params.with, "fail-on-diff", true),
        })
    }
}

/// `checks/convergence-rate`: fits a log-log slope through a dataset's
/// error-vs-resolution series and checks it against an expected order.
/// Delegates the numerics to an external `kuristo-convergence-rate`
/// helper (see module docs) rather than embedding a curve-fit routine.
pub struct ConvergenceRateConstructor;

impl ActionConstructor for ConvergenceRateConstructor {
    fn construct(&self, params: StepParams) -> Box<dyn Step> {
        let mut args = vec![
            "--input".to_string(),
            str_param(&params.with, "input"),
            "--x-axis".to_string(),
            str_param(&params.with, "x-axis"),
            "--y-axis".to_string(),
            str_param(&params.with, "y-axis"),
            "--expected-order".to_string(),
            str_param(&params.with, "expected-order"),
        ];
        if let Some(rel_tol) = f64_param(&params.with, "rel-tol") {
            args.push("--rel-tol".to_string());
            args.push(rel_tol.to_string());
        }
        if let Some(abs_tol) = f64_param(&params.with, "abs-tol") {
            args.push("--abs-tol".to_string());
            args.push(abs_tol.to_string());
        }

        Box::new(DiffCheckStep {
            name: params.name,
            tool: "kuristo-convergence-rate".to_string(),
            args,
            working_directory: params.working_directory,
            timeout_minutes: params.timeout_minutes,
            fail_on_diff: bool_param(&params.with, "fail_on_diff", true),
        })
    }
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
