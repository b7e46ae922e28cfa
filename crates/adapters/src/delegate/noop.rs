// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op delegate for when no transport is configured.

use super::{ActionDelegate, DelegateContext, DelegateError};
use async_trait::async_trait;
use flare_script::{KubeGetCommand, RunCommand};

/// Delegate that accepts every action and does nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpDelegate;

impl NoOpDelegate {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActionDelegate for NoOpDelegate {
    async fn run(&self, ctx: &DelegateContext, cmd: &RunCommand) -> Result<(), DelegateError> {
        tracing::debug!(node = %ctx.node, line = cmd.line, "RUN skipped: no transport");
        Ok(())
    }

    async fn kube_get(
        &self,
        ctx: &DelegateContext,
        cmd: &KubeGetCommand,
    ) -> Result<(), DelegateError> {
        tracing::debug!(node = %ctx.node, line = cmd.line, "KUBEGET skipped: no transport");
        Ok(())
    }
}
