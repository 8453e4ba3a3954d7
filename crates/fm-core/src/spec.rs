// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parsed workflow-file types: `JobSpec`, `StepSpec`, `MatrixStrategy`.
//!
//! These mirror the `ktests.yaml` shape; parsing lives in `fm-runbook`,
//! but the types are shared so the scheduler never depends on YAML.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

fn default_shell() -> String {
    "sh".to_string()
}

fn default_timeout_minutes() -> f64 {
    60.0
}

/// One step inside a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSpec {
    pub name: Option<String>,
    pub uses: Option<String>,
    #[serde(default)]
    pub with: BTreeMap<String, serde_json::Value>,
    pub run: Option<String>,
    #[serde(default = "default_shell")]
    pub shell: String,
    pub id: Option<String>,
    #[serde(rename = "working-directory")]
    pub working_directory: Option<String>,
    #[serde(rename = "timeout-minutes", default = "default_timeout_minutes")]
    pub timeout_minutes: f64,
}

impl StepSpec {
    /// A step must either name a registered action/function (`uses`) or
    /// carry a literal shell script (`run`).
    pub fn validate(&self) -> Result<(), String> {
        if self.uses.is_none() && self.run.is_none() {
            return Err("step must set either `uses` or `run`".to_string());
        }
        Ok(())
    }
}

/// A single explicit binding listed under `strategy.matrix.include`.
pub type MatrixInclude = BTreeMap<String, serde_json::Value>;

/// The `strategy.matrix` block: lists to take the Cartesian product of,
/// plus extra bindings to append.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatrixStrategy {
    #[serde(flatten)]
    pub axes: indexmap::IndexMap<String, Vec<serde_json::Value>>,
    #[serde(default)]
    pub include: Vec<MatrixInclude>,
}

impl MatrixStrategy {
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty() && self.include.is_empty()
    }
}

fn deserialize_needs<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(OneOrMany::One(s)) => Ok(vec![s]),
        Some(OneOrMany::Many(v)) => Ok(v),
    }
}

/// One logical job as authored in a workflow file. Expands via its
/// `strategy` into one or more runtime `Job`s (see `fm-scheduler`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpec {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<StepSpec>,
    pub skip: Option<String>,
    #[serde(rename = "timeout-minutes", default = "default_timeout_minutes")]
    pub timeout_minutes: f64,
    #[serde(default, deserialize_with = "deserialize_needs")]
    pub needs: Vec<String>,
    pub strategy: Option<JobStrategy>,
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStrategy {
    pub matrix: MatrixStrategy,
}

impl JobSpec {
    pub fn matrix(&self) -> Option<&MatrixStrategy> {
        self.strategy.as_ref().map(|s| &s.matrix)
    }
}

#[cfg(test)]
#[path = "spec_tests.rs"]
mod tests;
