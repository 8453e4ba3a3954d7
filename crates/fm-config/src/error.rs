// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Toml {
        path: std::path::PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {value}")]
    InvalidOverride { key: String, value: String },
}
