// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subprocess adapters for captured command execution

mod local;

pub use local::LocalProcessAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeProcessAdapter;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from running a captured command
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

/// A command to run under a fixed identity with extra environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    pub program: String,
    pub args: Vec<String>,
    pub uid: u32,
    pub gid: u32,
    /// Added on top of the caller's environment
    pub env: Vec<(String, String)>,
}

/// Adapter that runs a command to completion and returns its stdout
#[async_trait]
pub trait ProcessAdapter: Clone + Send + Sync + 'static {
    async fn capture(&self, request: &CaptureRequest) -> Result<Vec<u8>, ProcessError>;
}
