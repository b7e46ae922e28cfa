// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optional TOML file overriding built-in defaults.
//!
//! ```toml
//! from = "local 10.0.0.5"
//! workdir = "${TMPDIR:-/tmp}/flare"
//! output = "./bundle.tar.gz"
//! ```
//!
//! Path values go through `${VAR}` expansion when the file is read.

use crate::expand::expand_env;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur loading a defaults file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML syntax error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Values a user may pin instead of the built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsFile {
    pub from: Option<String>,
    pub workdir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub kubeconfig: Option<PathBuf>,
    pub username: Option<String>,
    #[serde(rename = "private-key", alias = "private_key")]
    pub private_key: Option<PathBuf>,
}

impl DefaultsFile {
    /// Parse defaults from TOML content
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut file: DefaultsFile = toml::from_str(content)?;
        for path in [
            &mut file.workdir,
            &mut file.output,
            &mut file.kubeconfig,
            &mut file.private_key,
        ]
        .into_iter()
        .flatten()
        {
            *path = PathBuf::from(expand_env(&path.to_string_lossy()));
        }
        Ok(file)
    }

    /// Read defaults from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Read defaults from a file if it exists; a missing file yields empty defaults
    pub fn load_optional(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no defaults file");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// `<config dir>/flare/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("flare").join("config.toml"))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
