// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for script execution

use flare_adapters::{DelegateError, IdentityError, ProcessError};
use flare_script::Directive;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a run
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("script missing valid {0}")]
    MissingPreamble(Directive),
    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: CAPTURE {command}: {source}")]
    Capture {
        line: usize,
        command: String,
        #[source]
        source: ProcessError,
    },
    #[error("cannot write {path}: {source}")]
    WriteCapture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: {directive}: {source}")]
    Delegate {
        line: usize,
        directive: Directive,
        #[source]
        source: DelegateError,
    },
}

/// Errors for a single COPY source; logged and collected, never fatal
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("{path} cannot be relative to workdir {workdir}")]
    SelfReference { path: PathBuf, workdir: PathBuf },
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: copied {copied} of {expected} bytes")]
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        copied: u64,
    },
    #[error("{path}: unsupported file type")]
    UnsupportedFileType { path: PathBuf },
}
