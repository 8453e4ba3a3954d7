// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `${{ expr }}` template interpolation against a job's `Context.vars`.
//!
//! Resolution is a single pass, performed once at `command()` time
//! (not re-evaluated per step). A dotted expression through a nil or
//! missing subtree renders as the empty string; a malformed template
//! (unclosed `${{`, or an expression that isn't a dotted identifier
//! path) is a fatal error for the step that owns it.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use fm_core::{Context, InterpolationError};

static EXPR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*(\.[a-zA-Z0-9_-]+)*$").expect("static pattern is valid")
});

/// Expands every `${{ expr }}` placeholder in `template` against `ctx`.
pub fn interpolate(template: &str, ctx: &Context) -> Result<String, InterpolationError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 3..];
        let end = after
            .find("}}")
            .ok_or_else(|| InterpolationError::Unbalanced(template.to_string()))?;
        let expr = after[..end].trim();
        if !EXPR_PATTERN.is_match(expr) {
            return Err(InterpolationError::InvalidExpression(expr.to_string()));
        }
        out.push_str(&render(ctx.lookup(expr)));
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    Ok(out)
}

fn render(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
#[path = "interpolate_tests.rs"]
mod tests;
