// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Script executor

use crate::copy::copy_source;
use crate::error::ExecuteError;
use crate::flatten::{capture_file_name, flatten, numbered_capture_file_name};
use flare_adapters::{
    ActionDelegate, CaptureRequest, Credentials, DelegateContext, IdentityResolver,
    ProcessAdapter,
};
use flare_script::{CaptureCommand, Command, CopyCommand, Directive, Node, Script};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::Instrument;

/// Adapters the executor runs actions through
pub struct ExecutorDeps<P, D, I> {
    pub process: P,
    pub delegate: D,
    pub identity: I,
}

/// A COPY source that was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyFailure {
    pub line: usize,
    pub node: String,
    pub path: PathBuf,
    pub error: String,
}

/// What a completed run produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionSummary {
    pub workdir: PathBuf,
    pub nodes: usize,
    pub captures: Vec<PathBuf>,
    pub copied: Vec<PathBuf>,
    pub copy_failures: Vec<CopyFailure>,
    pub delegated: usize,
}

/// Settings shared by every action of one run
struct RunContext<'a> {
    workdir: &'a Path,
    credentials: Credentials,
    env: Vec<(String, String)>,
}

/// Runs a resolved script's actions for every node
pub struct Executor<P, D, I> {
    process: P,
    delegate: D,
    identity: I,
}

impl<P, D, I> Executor<P, D, I>
where
    P: ProcessAdapter,
    D: ActionDelegate,
    I: IdentityResolver,
{
    pub fn new(deps: ExecutorDeps<P, D, I>) -> Self {
        Self {
            process: deps.process,
            delegate: deps.delegate,
            identity: deps.identity,
        }
    }

    /// Execute every action, in order, for every node in `FROM`
    ///
    /// Nodes and actions run one at a time. Any failure other than a
    /// COPY source error ends the run.
    pub async fn execute(&self, script: &Script) -> Result<ExecutionSummary, ExecuteError> {
        tracing::info!(actions = script.actions.len(), "executing script");

        let from = script
            .from()
            .ok_or(ExecuteError::MissingPreamble(Directive::From))?;
        let identity = script
            .identity()
            .ok_or(ExecuteError::MissingPreamble(Directive::As))?;
        let workdir = script
            .workdir()
            .ok_or(ExecuteError::MissingPreamble(Directive::WorkDir))?;

        // Resolve before touching the filesystem so a bad AS has no side effects
        let credentials = self
            .identity
            .credentials(&identity.user, identity.group.as_ref())?;
        tracing::debug!(uid = credentials.uid, gid = credentials.gid, "resolved identity");

        create_dir(&workdir.path)?;
        tracing::debug!(workdir = %workdir.path.display(), "using workdir");

        let run = RunContext {
            workdir: &workdir.path,
            credentials,
            env: script
                .env_vars()
                .iter()
                .filter_map(|var| var.split_once('='))
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        };

        let mut summary = ExecutionSummary {
            workdir: workdir.path.clone(),
            nodes: from.nodes.len(),
            ..ExecutionSummary::default()
        };

        for node in &from.nodes {
            let span = tracing::info_span!("node", node = %node);
            self.execute_node(script, node, &run, &mut summary)
                .instrument(span)
                .await?;
        }

        tracing::info!(
            captures = summary.captures.len(),
            copied = summary.copied.len(),
            copy_failures = summary.copy_failures.len(),
            delegated = summary.delegated,
            "execution complete"
        );
        Ok(summary)
    }

    async fn execute_node(
        &self,
        script: &Script,
        node: &Node,
        run: &RunContext<'_>,
        summary: &mut ExecutionSummary,
    ) -> Result<(), ExecuteError> {
        let node_dir = run.workdir.join(flatten(&node.to_string()));
        create_dir(&node_dir)?;
        let mut written = HashSet::new();

        for action in &script.actions {
            match action {
                Command::Copy(cmd) => self.copy(cmd, node, &node_dir, run, summary),
                Command::Capture(cmd) => {
                    let path = self.capture(cmd, &node_dir, run, &mut written).await?;
                    summary.captures.push(path);
                }
                Command::Run(cmd) => {
                    let ctx = self.delegate_context(script, node, &node_dir, run);
                    self.delegate
                        .run(&ctx, cmd)
                        .await
                        .map_err(|source| ExecuteError::Delegate {
                            line: cmd.line,
                            directive: Directive::Run,
                            source,
                        })?;
                    summary.delegated += 1;
                }
                Command::KubeGet(cmd) => {
                    let ctx = self.delegate_context(script, node, &node_dir, run);
                    self.delegate.kube_get(&ctx, cmd).await.map_err(|source| {
                        ExecuteError::Delegate {
                            line: cmd.line,
                            directive: Directive::KubeGet,
                            source,
                        }
                    })?;
                    summary.delegated += 1;
                }
                other => tracing::warn!(
                    directive = %other.directive(),
                    line = other.line(),
                    "not an action, skipped"
                ),
            }
        }
        Ok(())
    }

    fn copy(
        &self,
        cmd: &CopyCommand,
        node: &Node,
        node_dir: &Path,
        run: &RunContext<'_>,
        summary: &mut ExecutionSummary,
    ) {
        for path in &cmd.paths {
            match copy_source(path, node_dir, run.workdir) {
                Ok(files) => {
                    tracing::debug!(path = %path.display(), files = files.len(), "copied");
                    summary.copied.extend(files);
                }
                Err(e) => {
                    tracing::error!(
                        line = cmd.line,
                        path = %path.display(),
                        error = %e,
                        "COPY skipped"
                    );
                    summary.copy_failures.push(CopyFailure {
                        line: cmd.line,
                        node: node.to_string(),
                        path: path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
    }

    async fn capture(
        &self,
        cmd: &CaptureCommand,
        node_dir: &Path,
        run: &RunContext<'_>,
        written: &mut HashSet<PathBuf>,
    ) -> Result<PathBuf, ExecuteError> {
        let request = CaptureRequest {
            program: cmd.cli.program.clone(),
            args: cmd.cli.args.clone(),
            uid: run.credentials.uid,
            gid: run.credentials.gid,
            env: run.env.clone(),
        };
        let stdout = self
            .process
            .capture(&request)
            .await
            .map_err(|source| ExecuteError::Capture {
                line: cmd.line,
                command: cmd.cli.text.clone(),
                source,
            })?;

        let path = unique_capture_path(node_dir, &cmd.cli.text, written);
        if !path.ends_with(capture_file_name(&cmd.cli.text)) {
            tracing::warn!(
                line = cmd.line,
                cmd = %cmd.cli.text,
                path = %path.display(),
                "capture name already used in this run, numbered"
            );
        }
        tracing::debug!(cmd = %cmd.cli.text, path = %path.display(), "writing capture");
        std::fs::write(&path, &stdout).map_err(|source| ExecuteError::WriteCapture {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    fn delegate_context(
        &self,
        script: &Script,
        node: &Node,
        node_dir: &Path,
        run: &RunContext<'_>,
    ) -> DelegateContext {
        DelegateContext {
            node: node.clone(),
            output_dir: node_dir.to_path_buf(),
            credentials: run.credentials,
            env: run.env.clone(),
            auth: script.auth_config().cloned(),
            kube_config: script.kube_config().map(|k| k.path.clone()),
        }
    }
}

/// First free capture path in `node_dir`, recording it as taken
fn unique_capture_path(
    node_dir: &Path,
    command_line: &str,
    written: &mut HashSet<PathBuf>,
) -> PathBuf {
    let mut path = node_dir.join(capture_file_name(command_line));
    let mut n = 1;
    while written.contains(&path) {
        n += 1;
        path = node_dir.join(numbered_capture_file_name(command_line, n));
    }
    written.insert(path.clone());
    path
}

fn create_dir(path: &Path) -> Result<(), ExecuteError> {
    std::fs::create_dir_all(path).map_err(|source| ExecuteError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
