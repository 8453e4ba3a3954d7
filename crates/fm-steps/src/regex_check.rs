// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `uses: regex-check` — matches a pattern against an interpolated
//! input (typically a prior step's captured output) without spawning
//! a subprocess.

use async_trait::async_trait;
use regex::Regex;

use fm_core::{ActionConstructor, Context, InterpolationError, Step, StepOutcome, StepParams};

use crate::interpolate::interpolate;

/// Return code for a failed match. Distinct from [`fm_adapters::SPAWN_FAILED`]
/// (`-1`, reserved for process spawn failures) so a report can tell the
/// two failure modes apart.
pub const NO_MATCH: i32 = 1;

pub struct RegexCheckStep {
    pub name: String,
    pub input_template: String,
    pub pattern: Regex,
    pub timeout_minutes: f64,
}

#[async_trait]
impl Step for RegexCheckStep {
    fn command(&self, _ctx: &Context) -> Result<Option<String>, InterpolationError> {
        Ok(None)
    }

    async fn run(&mut self, ctx: &mut Context) -> StepOutcome {
        let input = match interpolate(&self.input_template, ctx) {
            Ok(input) => input,
            Err(err) => {
                tracing::error!(step = %self.name, error = %err, "failed to build regex-check input");
                return StepOutcome { return_code: fm_adapters::SPAWN_FAILED, ..Default::default() };
            }
        };

        let return_code = if self.pattern.is_match(&input) { 0 } else { NO_MATCH };
        StepOutcome { stdout: input.into_bytes(), stderr: Vec::new(), return_code }
    }

    fn timeout_minutes(&self) -> f64 {
        self.timeout_minutes
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegexCheckError {
    #[error("regex-check requires `pattern`")]
    MissingPattern,
    #[error("invalid regex pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub struct RegexCheckConstructor;

impl RegexCheckConstructor {
    pub fn try_construct(&self, params: StepParams) -> Result<Box<dyn Step>, RegexCheckError> {
        let pattern_str = params
            .with
            .get("pattern")
            .and_then(|v| v.as_str())
            .ok_or(RegexCheckError::MissingPattern)?
            .to_string();
        let pattern = Regex::new(&pattern_str).map_err(|source| RegexCheckError::InvalidPattern {
            pattern: pattern_str,
            source,
        })?;
        let input_template = params
            .with
            .get("input")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        Ok(Box::new(RegexCheckStep {
            name: params.name,
            input_template,
            pattern,
            timeout_minutes: params.timeout_minutes,
        }))
    }
}

impl ActionConstructor for RegexCheckConstructor {
    fn construct(&self, params: StepParams) -> Box<dyn Step> {
        match self.try_construct(params) {
            Ok(step) => step,
            Err(err) => {
                tracing::error!(error = %err, "regex-check construction failed, falling back to a step that always fails");
                Box::new(FailingStep {
                    name: "regex-check".to_string(),
                    message: err.to_string(),
                })
            }
        }
    }
}

/// A degenerate step used when an action's own parameters are
/// malformed; it reports the misconfiguration as a step failure
/// instead of aborting the whole run.
struct FailingStep {
    name: String,
    message: String,
}

#[async_trait]
impl Step for FailingStep {
    fn command(&self, _ctx: &Context) -> Result<Option<String>, InterpolationError> {
        Ok(None)
    }

    async fn run(&mut self, _ctx: &mut Context) -> StepOutcome {
        tracing::error!(step = %self.name, message = %self.message, "step misconfigured");
        StepOutcome { return_code: fm_adapters::SPAWN_FAILED, ..Default::default() }
    }

    fn timeout_minutes(&self) -> f64 {
        0.0
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
#[path = "regex_check_tests.rs"]
mod tests;
