// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `flare run <script>` - Execute a script on this machine

use crate::error::FlareError;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use flare_adapters::{
    LocalProcessAdapter, NoOpDelegate, SystemIdentityResolver, TracedDelegate,
    TracedProcessAdapter,
};
use flare_engine::{ExecutionSummary, Executor, ExecutorDeps};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Args)]
pub struct RunArgs {
    /// Script to execute
    pub script: PathBuf,

    /// Defaults file (default: <config dir>/flare/config.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format for the run summary
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub async fn run(args: RunArgs) -> Result<()> {
    let script = super::load(&args.script, args.config.as_deref())?;

    let executor = Executor::new(ExecutorDeps {
        process: TracedProcessAdapter::new(LocalProcessAdapter::new()),
        delegate: TracedDelegate::new(NoOpDelegate::new()),
        identity: SystemIdentityResolver::new(),
    });

    let summary = executor
        .execute(&script)
        .await
        .map_err(|e| FlareError::execute(&args.script, e))?;

    output::print(&SummaryView { summary: &summary }, args.format);
    Ok(())
}

#[derive(Serialize)]
#[serde(transparent)]
struct SummaryView<'a> {
    summary: &'a ExecutionSummary,
}

impl fmt::Display for SummaryView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.summary;
        writeln!(f, "workdir:   {}", s.workdir.display())?;
        writeln!(f, "nodes:     {}", s.nodes)?;
        writeln!(f, "captured:  {} file(s)", s.captures.len())?;
        writeln!(f, "copied:    {} file(s)", s.copied.len())?;
        writeln!(f, "delegated: {} action(s)", s.delegated)?;
        if !s.copy_failures.is_empty() {
            writeln!(f, "skipped:")?;
            for failure in &s.copy_failures {
                writeln!(
                    f,
                    "  line {} [{}] {}",
                    failure.line, failure.node, failure.error
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
