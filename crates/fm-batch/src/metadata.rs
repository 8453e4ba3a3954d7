// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-job `metadata.yaml`, dropped next to a submitted job's render
//! directory so `fm-cli batch status` can later find every job it
//! submitted without its own bookkeeping database.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BatchError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchMetadata {
    pub id: String,
    pub backend: String,
}

pub fn write_metadata(path: &Path, metadata: &BatchMetadata) -> Result<(), BatchError> {
    let yaml = serde_yaml::to_string(metadata).map_err(|source| BatchError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, yaml).map_err(|source| BatchError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_metadata(path: &Path) -> Result<BatchMetadata, BatchError> {
    let content = std::fs::read_to_string(path).map_err(|source| BatchError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| BatchError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "metadata_tests.rs"]
mod tests;
