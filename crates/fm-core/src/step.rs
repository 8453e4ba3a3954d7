// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Step` capability trait and the constructor traits the registry
//! stores by name.
//!
//! Kept here rather than in `fm-steps` so that `fm-registry` can store
//! `Box<dyn Step>`-producing constructors without depending on every
//! concrete step implementation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::context::Context;
use crate::error::InterpolationError;
use crate::job::StepOutcome;

/// A single unit of work inside a job. Implemented by the shell,
/// function, MPI, and check step variants.
#[async_trait]
pub trait Step: Send {
    /// Builds (and interpolates, if applicable) the command this step
    /// will run. Called once per step, before `run`. `Ok(None)` means
    /// the step has no subprocess (e.g. a regex check).
    fn command(&self, ctx: &Context) -> Result<Option<String>, InterpolationError>;

    /// Executes the step, mutating `ctx` (e.g. recording
    /// `steps.<id>.output`) and returning its captured output and
    /// return code (spec §4.5: the run log records stdout line by
    /// line, so the caller needs it even though most steps only care
    /// about the return code).
    async fn run(&mut self, ctx: &mut Context) -> StepOutcome;

    /// Cores this step needs while running. Defaults to 1.
    fn num_cores(&self) -> u32 {
        1
    }

    fn timeout_minutes(&self) -> f64;

    fn name(&self) -> &str;
}

/// Parameters passed to a function step or an action constructor: the
/// step's `with:` mapping plus its identity fields.
#[derive(Debug, Clone)]
pub struct StepParams {
    pub name: String,
    pub working_directory: Option<String>,
    pub timeout_minutes: f64,
    pub id: Option<String>,
    pub with: BTreeMap<String, Value>,
}

/// The result of a function step's in-process body.
#[derive(Debug, Clone, Default)]
pub struct FunctionResult {
    pub output: String,
    pub return_code: i32,
}

/// A registered in-process callable (as opposed to an action, which is
/// a class-like strategy object).
pub trait StepFunction: Send + Sync {
    fn call(&self, ctx: &Context, params: &StepParams) -> FunctionResult;
}

impl<F> StepFunction for F
where
    F: Fn(&Context, &StepParams) -> FunctionResult + Send + Sync,
{
    fn call(&self, ctx: &Context, params: &StepParams) -> FunctionResult {
        self(ctx, params)
    }
}

/// Builds a concrete `Step` from a `uses:` name's parameters. One
/// implementation per registered action (MPI, regex-check, the
/// file-diff checks).
pub trait ActionConstructor: Send + Sync {
    fn construct(&self, params: StepParams) -> Box<dyn Step>;
}
