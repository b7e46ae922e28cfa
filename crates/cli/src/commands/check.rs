// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `flare check <script>` - Parse a script and print the resolved job

use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use flare_script::{Command, Script};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Args)]
pub struct CheckArgs {
    /// Script to check
    pub script: PathBuf,

    /// Defaults file (default: <config dir>/flare/config.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub fn check(args: CheckArgs) -> Result<()> {
    let script = super::load(&args.script, args.config.as_deref())?;
    tracing::debug!(
        preambles = script.preambles.len(),
        actions = script.actions.len(),
        "script resolved"
    );
    output::print(&JobView { script: &script }, args.format);
    Ok(())
}

/// A resolved script, printed one command per line
#[derive(Serialize)]
#[serde(transparent)]
struct JobView<'a> {
    script: &'a Script,
}

impl fmt::Display for JobView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "preamble:")?;
        for cmd in self.script.preambles.values().flatten() {
            let line = if cmd.is_default() {
                "default".to_string()
            } else {
                format!("line {}", cmd.line())
            };
            writeln!(f, "  {:<8} {:<11} {}", line, cmd.directive().name(), describe(cmd))?;
        }
        writeln!(f, "actions:")?;
        if self.script.actions.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for cmd in &self.script.actions {
            let line = format!("line {}", cmd.line());
            writeln!(f, "  {:<8} {:<11} {}", line, cmd.directive().name(), describe(cmd))?;
        }
        Ok(())
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// One-line summary of a command's arguments
fn describe(cmd: &Command) -> String {
    match cmd {
        Command::As(c) => match &c.group {
            Some(group) => format!("user {} group {}", c.user, group),
            None => format!("user {}", c.user),
        },
        Command::Env(c) => join(&c.vars),
        Command::From(c) => join(&c.nodes),
        Command::KubeConfig(c) => c.path.display().to_string(),
        Command::Output(c) => c.path.display().to_string(),
        Command::WorkDir(c) => c.path.display().to_string(),
        Command::AuthConfig(c) => {
            let mut parts = Vec::new();
            if let Some(username) = &c.username {
                parts.push(format!("username {}", username));
            }
            if let Some(key) = &c.private_key {
                parts.push(format!("private-key {}", key.display()));
            }
            parts.join(" ")
        }
        Command::Capture(c) => c.cli.text.clone(),
        Command::Run(c) => c.cli.text.clone(),
        Command::Copy(c) => c
            .paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(" "),
        Command::KubeGet(c) => {
            let mut parts = vec![format!("what {}", c.what)];
            for (name, values) in [
                ("groups", &c.groups),
                ("kinds", &c.kinds),
                ("namespaces", &c.namespaces),
                ("versions", &c.versions),
                ("names", &c.names),
                ("containers", &c.containers),
            ] {
                if !values.is_empty() {
                    parts.push(format!("{} {}", name, values.join(",")));
                }
            }
            if let Some(labels) = &c.labels {
                parts.push(format!("labels {}", labels));
            }
            parts.join(" ")
        }
    }
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
