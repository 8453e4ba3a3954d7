// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Parses one `ktests.yaml`'s top-level `jobs` mapping into
//! `fm_core::JobSpec`s. The mapping key becomes the spec's identifier
//! unless the entry gives an explicit `name`.

use std::path::Path;

use fm_core::{JobSpec, JobStrategy, StepSpec};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::RunbookError;

fn default_timeout_minutes() -> f64 {
    60.0
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

/// Mirrors `JobSpec`, except `name` is optional (it defaults to the
/// mapping key) since that's the only structural difference between
/// the wire format and the runtime type.
#[derive(Debug, Deserialize)]
struct RawJobEntry {
    name: Option<String>,
    description: Option<String>,
    #[serde(default)]
    steps: Vec<StepSpec>,
    skip: Option<String>,
    #[serde(rename = "timeout-minutes", default = "default_timeout_minutes")]
    timeout_minutes: f64,
    #[serde(default, deserialize_with = "deserialize_needs")]
    needs: Vec<String>,
    strategy: Option<JobStrategy>,
    #[serde(default)]
    labels: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct WorkflowFile {
    #[serde(default)]
    jobs: IndexMap<String, RawJobEntry>,
}

/// Parses one workflow file's YAML text into its `JobSpec`s, in the
/// order the `jobs` mapping declares them.
pub fn parse_str(content: &str) -> Result<Vec<JobSpec>, RunbookError> {
    let file: WorkflowFile = serde_yaml::from_str(content)?;
    Ok(file
        .jobs
        .into_iter()
        .map(|(key, raw)| JobSpec {
            name: raw.name.unwrap_or(key),
            description: raw.description,
            steps: raw.steps,
            skip: raw.skip,
            timeout_minutes: raw.timeout_minutes,
            needs: raw.needs,
            strategy: raw.strategy,
            labels: raw.labels,
        })
        .collect())
}

pub fn parse_file(path: &Path) -> Result<Vec<JobSpec>, RunbookError> {
    let content = std::fs::read_to_string(path).map_err(|source| RunbookError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_str(&content)
}

#[cfg(test)]
#[path = "parse_tests.rs"]
mod tests;
