// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types shared by more than one crate.

use thiserror::Error;

/// A string template that failed to resolve, e.g. an unbalanced
/// `${{ ... }}` or an expression with invalid syntax.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InterpolationError {
    #[error("unbalanced `${{{{ ... }}}}` in template: {0}")]
    Unbalanced(String),
    #[error("invalid expression `{0}` in template")]
    InvalidExpression(String),
}
