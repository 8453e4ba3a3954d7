// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Matrix Expander: materialises one `JobSpec` into one or more
//! concrete `(name, binding)` pairs.
//!
//! A spec with no `strategy` expands to exactly one job, unbound. A
//! spec with a `strategy.matrix` expands to the Cartesian product of
//! its axes (declaration order, deduplicated), extended by any
//! `include` bindings not already present. A matrix that expands to
//! zero variants is a configuration error (REDESIGN FLAGS: stricter
//! than the source, which skipped the job silently).

use std::collections::HashSet;

use fm_core::{Context, JobSpec, MatrixStrategy};
use serde_json::Value;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MatrixError {
    #[error("matrix for job `{0}` expands to zero variants")]
    Empty(String),
}

/// One concrete job produced by expansion: its resolved display name
/// and the matrix binding it carries (`None` for an unexpanded spec).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcreteJob {
    pub name: String,
    pub binding: Option<Value>,
}

pub fn expand(spec: &JobSpec) -> Result<Vec<ConcreteJob>, MatrixError> {
    let Some(strategy) = spec.matrix() else {
        return Ok(vec![ConcreteJob {
            name: spec.name.clone(),
            binding: None,
        }]);
    };

    if strategy.is_empty() {
        return Err(MatrixError::Empty(spec.name.clone()));
    }

    let bindings = bindings_for(strategy);
    if bindings.is_empty() {
        return Err(MatrixError::Empty(spec.name.clone()));
    }

    Ok(bindings
        .into_iter()
        .map(|binding| {
            let name = job_name_for(&spec.name, &binding);
            ConcreteJob {
                name,
                binding: Some(indexmap_to_value(&binding)),
            }
        })
        .collect())
}

/// Cartesian product of `strategy.axes`, in declaration order,
/// deduplicated, then extended by `strategy.include` entries not
/// already present. Each binding keeps its `IndexMap` key order (the
/// axes' declaration order) all the way through, since §4.6's
/// synthesized job-name suffix must list keys in that order, not
/// `serde_json::Map`'s (here, alphabetical `BTreeMap`) order.
fn bindings_for(strategy: &MatrixStrategy) -> Vec<indexmap::IndexMap<String, Value>> {
    let mut product: Vec<indexmap::IndexMap<String, Value>> = vec![indexmap::IndexMap::new()];
    for (key, values) in &strategy.axes {
        let mut next = Vec::with_capacity(product.len() * values.len().max(1));
        for binding in &product {
            for value in values {
                let mut extended = binding.clone();
                extended.insert(key.clone(), value.clone());
                next.push(extended);
            }
        }
        product = next;
    }
    if strategy.axes.is_empty() {
        product.clear();
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for binding in product {
        let key = canonical_key(&indexmap_to_value(&binding));
        if seen.insert(key) {
            out.push(binding);
        }
    }

    for include in &strategy.include {
        let binding: indexmap::IndexMap<String, Value> =
            include.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let key = canonical_key(&indexmap_to_value(&binding));
        if seen.insert(key) {
            out.push(binding);
        }
    }

    out
}

fn indexmap_to_value(map: &indexmap::IndexMap<String, Value>) -> Value {
    let mut obj = serde_json::Map::new();
    for (k, v) in map {
        obj.insert(k.clone(), v.clone());
    }
    Value::Object(obj)
}

/// Canonical string used to detect duplicate bindings regardless of
/// key insertion order (two structurally-identical bindings built in
/// a different order would otherwise compare unequal as strings).
fn canonical_key(value: &Value) -> String {
    let mut entries: Vec<(String, String)> = match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect(),
        other => return other.to_string(),
    };
    entries.sort();
    format!("{entries:?}")
}

/// Interpolates the spec's name template against the binding; if
/// nothing substituted (the template had no placeholder), synthesises
/// a `name[k1=v1,k2=v2,...]` suffix instead, keys in binding
/// (axis-declaration) order.
fn job_name_for(template: &str, binding: &indexmap::IndexMap<String, Value>) -> String {
    let ctx = Context::new(Some(indexmap_to_value(binding)));
    let interpolated = fm_steps::interpolate::interpolate(template, &ctx)
        .unwrap_or_else(|_| template.to_string());
    if interpolated != template {
        return interpolated;
    }

    let suffix = binding
        .iter()
        .map(|(k, v)| format!("{k}={}", render_scalar(v)))
        .collect::<Vec<_>>()
        .join(",");
    format!("{template}[{suffix}]")
}

fn render_scalar(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "matrix_tests.rs"]
mod tests;
