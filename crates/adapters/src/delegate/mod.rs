// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Collaborators for actions the executor does not run itself
//!
//! `RUN` and `KUBEGET` are validated by the parser and handed over here,
//! once per node, with everything a transport needs to carry them out.

mod noop;

pub use noop::NoOpDelegate;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{DelegateCall, FakeDelegate};

use crate::identity::Credentials;
use async_trait::async_trait;
use flare_script::{AuthConfigCommand, KubeGetCommand, Node, RunCommand};
use std::path::PathBuf;
use thiserror::Error;

/// Errors from a delegated action
#[derive(Debug, Error)]
pub enum DelegateError {
    #[error("{action} is not supported for node {node}")]
    Unsupported { action: String, node: String },
    #[error("{0}")]
    Failed(String),
}

/// Run settings handed to a delegate alongside the command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegateContext {
    pub node: Node,
    /// Directory that receives this node's output
    pub output_dir: PathBuf,
    pub credentials: Credentials,
    pub env: Vec<(String, String)>,
    pub auth: Option<AuthConfigCommand>,
    pub kube_config: Option<PathBuf>,
}

/// Carries out `RUN` and `KUBEGET` actions
#[async_trait]
pub trait ActionDelegate: Clone + Send + Sync + 'static {
    async fn run(&self, ctx: &DelegateContext, cmd: &RunCommand) -> Result<(), DelegateError>;

    async fn kube_get(
        &self,
        ctx: &DelegateContext,
        cmd: &KubeGetCommand,
    ) -> Result<(), DelegateError>;
}
