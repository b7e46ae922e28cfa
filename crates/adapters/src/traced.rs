// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::delegate::{ActionDelegate, DelegateContext, DelegateError};
use crate::process::{CaptureRequest, ProcessAdapter, ProcessError};
use async_trait::async_trait;
use flare_script::{KubeGetCommand, RunCommand};
use tracing::Instrument;

/// Wrapper that adds tracing to any ProcessAdapter
#[derive(Clone)]
pub struct TracedProcessAdapter<P> {
    inner: P,
}

impl<P> TracedProcessAdapter<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<P: ProcessAdapter> ProcessAdapter for TracedProcessAdapter<P> {
    async fn capture(&self, request: &CaptureRequest) -> Result<Vec<u8>, ProcessError> {
        let span = tracing::info_span!(
            "process.capture",
            program = %request.program,
            uid = request.uid,
            gid = request.gid
        );

        async {
            tracing::info!(
                args = ?request.args,
                env_count = request.env.len(),
                "starting"
            );

            let start = std::time::Instant::now();
            let result = self.inner.capture(request).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(stdout) => tracing::info!(
                    bytes = stdout.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "captured"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "capture failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any ActionDelegate
#[derive(Clone)]
pub struct TracedDelegate<D> {
    inner: D,
}

impl<D> TracedDelegate<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }
}

fn check_output_dir(ctx: &DelegateContext) -> Result<(), DelegateError> {
    // Precondition: the node's output directory must exist
    if !ctx.output_dir.is_dir() {
        tracing::error!(output_dir = %ctx.output_dir.display(), "output directory does not exist");
        return Err(DelegateError::Failed(format!(
            "output directory does not exist: {}",
            ctx.output_dir.display()
        )));
    }
    Ok(())
}

#[async_trait]
impl<D: ActionDelegate> ActionDelegate for TracedDelegate<D> {
    async fn run(&self, ctx: &DelegateContext, cmd: &RunCommand) -> Result<(), DelegateError> {
        let span = tracing::info_span!("delegate.run", node = %ctx.node, line = cmd.line);

        async {
            tracing::info!(cmd = %cmd.cli.text, "delegating");
            if let Err(e) = check_output_dir(ctx) {
                return Err(e);
            }

            let start = std::time::Instant::now();
            let result = self.inner.run(ctx, cmd).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "run done"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "run failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn kube_get(
        &self,
        ctx: &DelegateContext,
        cmd: &KubeGetCommand,
    ) -> Result<(), DelegateError> {
        let span = tracing::info_span!("delegate.kube_get", node = %ctx.node, line = cmd.line);

        async {
            tracing::info!(what = ?cmd.what, kinds = ?cmd.kinds, "delegating");
            if let Err(e) = check_output_dir(ctx) {
                return Err(e);
            }

            let start = std::time::Instant::now();
            let result = self.inner.kube_get(ctx, cmd).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "query done"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "query failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
