// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job runtime state threaded through a job's steps.

use std::collections::HashMap;

use serde_json::{json, Value};

/// Per-job state: environment overlay plus the `vars` tree steps read
/// and write through `${{ ... }}` interpolation.
///
/// `vars` always has `matrix` and `steps` keys, even when empty, so
/// dotted lookups against either never need a presence check.
#[derive(Debug, Clone)]
pub struct Context {
    pub env: HashMap<String, String>,
    pub vars: Value,
}

impl Context {
    /// Builds the context for one concrete job, given its matrix
    /// binding (or `None` for an unexpanded job).
    pub fn new(matrix: Option<Value>) -> Self {
        Self {
            env: HashMap::new(),
            vars: json!({
                "matrix": matrix.unwrap_or(Value::Null),
                "steps": {},
            }),
        }
    }

    /// Records the captured stdout of a completed step under
    /// `steps.<id>.output`, the only write path into `vars` after
    /// construction.
    pub fn record_step_output(&mut self, id: &str, output: String) {
        if let Some(steps) = self.vars.get_mut("steps").and_then(Value::as_object_mut) {
            steps.insert(id.to_string(), json!({ "output": output }));
        }
    }

    /// Resolves a dotted path (`matrix.op`, `steps.compile.output`)
    /// against `vars`. A path through a nil or missing subtree
    /// resolves to `None`, which interpolation renders as `""`.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut current = &self.vars;
        for segment in path.split('.') {
            current = current.get(segment)?;
        }
        Some(current)
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
