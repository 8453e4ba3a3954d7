// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Step Factory: turns one `StepSpec` into a concrete `Box<dyn Step>`.
//!
//! Decision order (spec §4.2): a bare `run:` becomes a shell step; a
//! `uses:` name is looked up first in the action table, then the
//! function table; an unresolved `uses:` is a fatal configuration
//! error for the owning job.

use std::collections::HashMap;

use fm_core::{Step, StepParams, StepSpec};
use fm_registry::Registry;

use crate::function::FunctionStep;
use crate::shell::ShellStep;

#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error("{0}")]
    Invalid(String),
    #[error("unknown action: {0}")]
    UnknownAction(String),
}

/// Builds a step from its spec. `registry` supplies action and function
/// constructors for `uses:` names.
pub fn build_step(spec: &StepSpec, registry: &Registry) -> Result<Box<dyn Step>, FactoryError> {
    spec.validate().map_err(FactoryError::Invalid)?;

    let name = spec
        .name
        .clone()
        .or_else(|| spec.uses.clone())
        .unwrap_or_else(|| "step".to_string());

    let Some(uses) = &spec.uses else {
        return Ok(Box::new(ShellStep {
            name,
            script: spec.run.clone().unwrap_or_default(),
            id: spec.id.clone(),
            working_directory: spec.working_directory.clone(),
            timeout_minutes: spec.timeout_minutes,
            extra_env: HashMap::new(),
        }));
    };

    let params = StepParams {
        name: name.clone(),
        working_directory: spec.working_directory.clone(),
        timeout_minutes: spec.timeout_minutes,
        id: spec.id.clone(),
        with: spec.with.clone(),
    };

    if let Some(constructor) = registry.get_action(uses) {
        return Ok(constructor.construct(params));
    }

    if let Some(function) = registry.get_function(uses) {
        return Ok(Box::new(FunctionStep {
            name,
            function,
            params,
        }));
    }

    Err(FactoryError::UnknownAction(uses.clone()))
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
