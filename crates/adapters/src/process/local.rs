// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local subprocess adapter

use super::{CaptureRequest, ProcessAdapter, ProcessError};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Runs commands on this machine via `tokio::process`
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalProcessAdapter;

impl LocalProcessAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessAdapter for LocalProcessAdapter {
    async fn capture(&self, request: &CaptureRequest) -> Result<Vec<u8>, ProcessError> {
        let output = Command::new(&request.program)
            .args(&request.args)
            .envs(request.env.iter().map(|(k, v)| (k, v)))
            .uid(request.uid)
            .gid(request.gid)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ProcessError::Spawn {
                program: request.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProcessError::Failed {
                program: request.program.clone(),
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
