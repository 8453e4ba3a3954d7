// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Loads the configuration record every other crate above `fm-core`
//! reads from: total core budget, MPI launcher, log root, run
//! retention, and optional batch-backend command templates.
//!
//! Three layers, later wins: an optional TOML file, `FM_*` environment
//! variables, then explicit CLI overrides. A missing file is not an
//! error — defaults apply. This crate never reaches into the
//! scheduler or step executor; it only produces data they consume.

pub mod cores;
pub mod error;

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use error::ConfigError;

const DEFAULT_CONFIG_RELATIVE_PATH: &str = ".fm/config.toml";
const DEFAULT_LOG_DIR_NAME: &str = "fm";
const DEFAULT_MPI_LAUNCHER: &str = "mpirun";
const DEFAULT_RETENTION: usize = 5;

/// Submit/status command templates for the HPC batch backend, e.g.
/// `submit = "sbatch {script}"`, `status = "squeue -j {id}"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BatchCommands {
    pub submit: String,
    pub status: String,
}

/// The resolved configuration record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FmConfig {
    pub total_cores: usize,
    pub mpi_launcher: String,
    pub log_root: PathBuf,
    pub retention: usize,
    pub batch: Option<BatchCommands>,
}

impl Default for FmConfig {
    fn default() -> Self {
        Self {
            total_cores: cores::detect_default_core_limit(),
            mpi_launcher: DEFAULT_MPI_LAUNCHER.to_string(),
            log_root: default_log_root(),
            retention: DEFAULT_RETENTION,
            batch: None,
        }
    }
}

fn default_log_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(DEFAULT_LOG_DIR_NAME)
}

/// Mirrors [`FmConfig`] but every field is optional: only the keys an
/// author actually wrote in the TOML file are present.
#[derive(Debug, Default, Deserialize)]
struct RawConfigFile {
    total_cores: Option<usize>,
    mpi_launcher: Option<String>,
    log_root: Option<PathBuf>,
    retention: Option<usize>,
    batch: Option<BatchCommands>,
}

/// Explicit CLI-flag overrides, applied last. `None` means "not passed
/// on the command line", not "unset" — it leaves the file/env value.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub total_cores: Option<usize>,
    pub mpi_launcher: Option<String>,
    pub log_root: Option<PathBuf>,
    pub retention: Option<usize>,
}

/// Loads the config file at `path`, or the conventional `.fm/config.toml`
/// relative to the current directory if `path` is `None`. A missing
/// file yields an all-`None` record, not an error.
fn load_file(path: Option<&Path>) -> Result<RawConfigFile, ConfigError> {
    let resolved: PathBuf = match path {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(DEFAULT_CONFIG_RELATIVE_PATH),
    };

    let content = match std::fs::read_to_string(&resolved) {
        Ok(content) => content,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            return Ok(RawConfigFile::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: resolved,
                source,
            });
        }
    };

    toml::from_str(&content).map_err(|source| ConfigError::Toml {
        path: resolved,
        source,
    })
}

fn env_usize(key: &str) -> Result<Option<usize>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<usize>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidOverride {
                key: key.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Loads the full three-layer configuration: file, then `FM_*` env
/// vars, then `overrides`. `config_path` selects an explicit file
/// (`--config`); pass `None` to use the conventional path.
pub fn load(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<FmConfig, ConfigError> {
    let file = load_file(config_path)?;
    let defaults = FmConfig::default();

    let total_cores = overrides
        .total_cores
        .or(env_usize("FM_CORES")?)
        .or(file.total_cores)
        .unwrap_or(defaults.total_cores);

    let mpi_launcher = overrides
        .mpi_launcher
        .clone()
        .or_else(|| env_string("FM_MPI_LAUNCHER"))
        .or(file.mpi_launcher)
        .unwrap_or(defaults.mpi_launcher);

    let log_root = overrides
        .log_root
        .clone()
        .or_else(|| env_string("FM_LOG_ROOT").map(PathBuf::from))
        .or(file.log_root)
        .unwrap_or(defaults.log_root);

    let retention = overrides
        .retention
        .or(env_usize("FM_RETENTION")?)
        .or(file.retention)
        .unwrap_or(defaults.retention);

    if total_cores == 0 {
        tracing::warn!("configured total_cores is 0; every job will be skipped as oversize");
    }

    Ok(FmConfig {
        total_cores,
        mpi_launcher,
        log_root,
        retention,
        batch: file.batch,
    })
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
