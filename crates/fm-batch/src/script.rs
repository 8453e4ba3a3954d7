// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Renders a `JobSpec` to a standalone shell script for submission to
//! an HPC queue. Only `run` steps translate directly; `uses` steps
//! need the registry to build their command and are not supported
//! here, matching this backend's role as an alternate sink outside
//! the scheduler's own step execution.

use fm_core::JobSpec;

/// Renders `spec`'s steps into one POSIX shell script. Steps run in
/// the order declared; a step with no `run` command is emitted as a
/// comment rather than silently dropped, so a submitted script always
/// reflects every step the spec names.
pub fn render_script(spec: &JobSpec) -> String {
    let mut lines = vec!["#!/bin/sh".to_string(), String::new()];
    lines.push(format!("# {}", spec.name));

    for step in &spec.steps {
        let label = step.name.as_deref().unwrap_or("step");
        if let Some(run) = &step.run {
            lines.push(format!("# {label}"));
            if let Some(dir) = &step.working_directory {
                lines.push(format!("(cd {dir} && {run})"));
            } else {
                lines.push(run.clone());
            }
        } else {
            lines.push(format!(
                "# {label}: skipped (`uses` steps are not supported in batch scripts)"
            ));
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
#[path = "script_tests.rs"]
mod tests;
