// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow file discovery and parsing (spec §4.10, ambient).
//!
//! Recursively finds `ktests.yaml` files under a repository root and
//! parses each one's top-level `jobs` mapping into `fm_core::JobSpec`s.
//! Never touches the scheduler or step executor directly — it only
//! produces the data those crates consume.

pub mod error;
pub mod parse;
pub mod scan;

pub use error::RunbookError;
pub use parse::parse_str;
pub use scan::{scan_locations, FILENAME};

use std::path::{Path, PathBuf};

use fm_core::JobSpec;

/// One workflow file's parse outcome: either its specs, or the error
/// that made it unreadable/malformed. A bad file doesn't stop
/// discovery of the others (spec §4.10).
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub result: Result<Vec<JobSpec>, RunbookError>,
}

/// Scans every location for `ktests.yaml` files and parses each one.
/// Parse errors are collected per file rather than propagated — the
/// caller (`fm-cli`) decides whether an empty overall result is fatal.
pub fn discover(locations: &[impl AsRef<Path>]) -> Vec<DiscoveredFile> {
    let mut out = Vec::new();
    for path in scan_locations(locations) {
        let result = parse::parse_file(&path);
        if let Err(err) = &result {
            tracing::warn!(path = %path.display(), error = %err, "skipping invalid workflow file");
        }
        out.push(DiscoveredFile { path, result });
    }
    out
}

/// Convenience over [`discover`] for callers that only want the specs
/// that parsed successfully, plus the list of files that didn't.
pub fn discover_specs(locations: &[impl AsRef<Path>]) -> (Vec<JobSpec>, Vec<(PathBuf, RunbookError)>) {
    let mut specs = Vec::new();
    let mut errors = Vec::new();
    for file in discover(locations) {
        match file.result {
            Ok(mut parsed) => specs.append(&mut parsed),
            Err(err) => errors.push((file.path, err)),
        }
    }
    (specs, errors)
}
