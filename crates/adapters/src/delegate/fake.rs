// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake action delegate for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ActionDelegate, DelegateContext, DelegateError};
use async_trait::async_trait;
use flare_script::{KubeGetCommand, KubeTarget, Node, RunCommand};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Recorded delegate call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegateCall {
    Run {
        node: Node,
        output_dir: PathBuf,
        command: String,
    },
    KubeGet {
        node: Node,
        output_dir: PathBuf,
        what: KubeTarget,
    },
}

/// Fake delegate for testing
#[derive(Clone, Default)]
pub struct FakeDelegate {
    calls: Arc<Mutex<Vec<DelegateCall>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl FakeDelegate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<DelegateCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Fail every subsequent call with the given message
    pub fn set_failure(&self, message: &str) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = Some(message.to_string());
    }

    fn record(&self, call: DelegateCall) -> Result<(), DelegateError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
        match self.failure.lock().unwrap_or_else(|e| e.into_inner()).clone() {
            Some(message) => Err(DelegateError::Failed(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ActionDelegate for FakeDelegate {
    async fn run(&self, ctx: &DelegateContext, cmd: &RunCommand) -> Result<(), DelegateError> {
        self.record(DelegateCall::Run {
            node: ctx.node.clone(),
            output_dir: ctx.output_dir.clone(),
            command: cmd.cli.text.clone(),
        })
    }

    async fn kube_get(
        &self,
        ctx: &DelegateContext,
        cmd: &KubeGetCommand,
    ) -> Result<(), DelegateError> {
        self.record(DelegateCall::KubeGet {
            node: ctx.node.clone(),
            output_dir: ctx.output_dir.clone(),
            what: cmd.what,
        })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
