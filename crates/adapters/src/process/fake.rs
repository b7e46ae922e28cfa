// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake process adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{CaptureRequest, ProcessAdapter, ProcessError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum FakeResponse {
    Output(Vec<u8>),
    Fail(String),
    Missing,
}

/// Fake process adapter for testing
///
/// Programs without a configured response echo their arguments, one
/// space apart and newline terminated.
#[derive(Clone, Default)]
pub struct FakeProcessAdapter {
    responses: Arc<Mutex<HashMap<String, FakeResponse>>>,
    calls: Arc<Mutex<Vec<CaptureRequest>>>,
}

impl FakeProcessAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded capture requests
    pub fn calls(&self) -> Vec<CaptureRequest> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Return fixed stdout for a program
    pub fn set_output(&self, program: &str, stdout: impl Into<Vec<u8>>) {
        self.respond(program, FakeResponse::Output(stdout.into()));
    }

    /// Make a program exit non-zero with the given stderr
    pub fn set_failure(&self, program: &str, stderr: &str) {
        self.respond(program, FakeResponse::Fail(stderr.to_string()));
    }

    /// Make a program fail to start
    pub fn set_missing(&self, program: &str) {
        self.respond(program, FakeResponse::Missing);
    }

    fn respond(&self, program: &str, response: FakeResponse) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(program.to_string(), response);
    }
}

#[async_trait]
impl ProcessAdapter for FakeProcessAdapter {
    async fn capture(&self, request: &CaptureRequest) -> Result<Vec<u8>, ProcessError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());

        let response = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&request.program)
            .cloned();

        match response {
            Some(FakeResponse::Output(stdout)) => Ok(stdout),
            Some(FakeResponse::Fail(stderr)) => Err(ProcessError::Failed {
                program: request.program.clone(),
                status: "exit status: 1".to_string(),
                stderr,
            }),
            Some(FakeResponse::Missing) => Err(ProcessError::Spawn {
                program: request.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            }),
            None => Ok(format!("{}\n", request.args.join(" ")).into_bytes()),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
