// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod check;
pub mod run;

use crate::error::FlareError;
use flare_script::{load_script, Defaults, DefaultsFile, Script};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Defaults for this process, overridden by `--config` or the per-user file
fn resolve_defaults(config: Option<&Path>) -> Result<Defaults, FlareError> {
    let file = match config {
        Some(path) => DefaultsFile::load(path).map_err(|e| FlareError::config(path, e))?,
        None => match DefaultsFile::default_path() {
            Some(path) => {
                DefaultsFile::load_optional(&path).map_err(|e| FlareError::config(&path, e))?
            }
            None => DefaultsFile::default(),
        },
    };
    Ok(Defaults::from_process().with_file(&file))
}

/// Parse a script file and fill in its defaults
fn load(path: &Path, config: Option<&Path>) -> Result<Script, FlareError> {
    let defaults = resolve_defaults(config)?;
    let file = File::open(path).map_err(|e| FlareError::script_unreadable(path, e))?;
    load_script(BufReader::new(file), &defaults).map_err(|e| FlareError::script(path, e))
}
