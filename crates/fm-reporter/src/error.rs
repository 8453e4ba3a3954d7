// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors from run-directory and report I/O. These surface at the
//! `fm-cli` boundary as a non-zero exit distinct from "jobs failed"
//! (spec §7) rather than changing any job's already-decided outcome.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize report: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to write CSV report: {0}")]
    Csv(#[from] csv::Error),
    #[error("no tag named `{0}`")]
    UnknownTag(String),
}

pub(crate) fn io(path: impl Into<std::path::PathBuf>) -> impl FnOnce(std::io::Error) -> ReporterError {
    let path = path.into();
    move |source| ReporterError::Io { path, source }
}
