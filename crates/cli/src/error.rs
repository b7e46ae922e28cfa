// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Errors from the library crates are converted here into:
//! - What went wrong (message)
//! - Why it might have happened (context)
//! - How to fix it (suggestions)

use flare_adapters::IdentityError;
use flare_engine::ExecuteError;
use flare_script::{ConfigError, Directive, ParseError, ScriptError};
use std::fmt;
use std::path::Path;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct FlareError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl FlareError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Set the source error that caused this error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for FlareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for FlareError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Usage line for a directive, shown when its arguments are rejected
fn usage(directive: Directive) -> &'static str {
    match directive {
        Directive::As => "AS userid:<uid|name> [groupid:<gid|name>]  or  AS <user>[:<group>]",
        Directive::Env => "ENV KEY=VALUE [KEY=VALUE ...]",
        Directive::From => "FROM hosts:'<address>[:<port>] ...' [port:<port>]",
        Directive::KubeConfig => "KUBECONFIG path:<path>",
        Directive::AuthConfig => "AUTHCONFIG [username:<name>] [private-key:<path>]",
        Directive::Output => "OUTPUT path:<path>",
        Directive::WorkDir => "WORKDIR path:<path>",
        Directive::Capture => "CAPTURE <command> [args ...]",
        Directive::Copy => "COPY <path> [path ...]",
        Directive::Run => "RUN <command> [args ...]",
        Directive::KubeGet => {
            "KUBEGET what:<objects|logs|all> [groups:] [kinds:] [namespaces:] [versions:] [names:] [labels:] [containers:]"
        }
    }
}

fn supported_directives() -> String {
    Directive::all()
        .map(Directive::name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Common error builders for typical failure scenarios.
impl FlareError {
    /// Error for a script file that could not be opened.
    pub fn script_unreadable(path: &Path, source: std::io::Error) -> Self {
        FlareError::new(format!("cannot read script {}: {}", path.display(), source))
            .with_suggestion("Check the path and that the file is readable")
            .with_source(source)
    }

    /// Error for a script that failed to parse or resolve its defaults.
    pub fn script(path: &Path, err: ScriptError) -> Self {
        let base = FlareError::new(format!("{}: {}", path.display(), err));
        let base = match &err {
            ScriptError::Parse(ParseError::Unsupported { directive, .. }) => base
                .with_context(format!("'{}' is not a flare directive", directive))
                .with_suggestion(format!("Use one of: {}", supported_directives())),
            ScriptError::Parse(ParseError::Directive { directive, .. }) => base
                .with_context(format!("usage: {}", usage(*directive)))
                .with_suggestion("Quote values that contain spaces: name:'a value'"),
            ScriptError::Parse(ParseError::Io { .. }) => base,
            ScriptError::Defaults(e) => base
                .with_context(format!("the built-in {} default is invalid", e.directive))
                .with_suggestion(format!(
                    "Set {} explicitly in the script or the defaults file",
                    e.directive
                )),
        };
        base.with_source(err)
    }

    /// Error for a defaults file that could not be loaded.
    pub fn config(path: &Path, err: ConfigError) -> Self {
        FlareError::new(format!("defaults file {}: {}", path.display(), err))
            .with_context(
                "Accepted keys: from, workdir, output, kubeconfig, username, private-key",
            )
            .with_suggestion("Fix the file, or pass another one with --config")
            .with_source(err)
    }

    /// Error for a run that stopped early.
    pub fn execute(path: &Path, err: ExecuteError) -> Self {
        let base = FlareError::new(format!("{}: {}", path.display(), err));
        let base = match &err {
            ExecuteError::MissingPreamble(directive) => base
                .with_context(format!("usage: {}", usage(*directive)))
                .with_suggestion(format!("Add a {} line to the script", directive)),
            ExecuteError::Identity(IdentityError::NoPrimaryGroup(_)) => base
                .with_suggestion("Name a group: AS userid:<uid> groupid:<gid>"),
            ExecuteError::Identity(_) => base
                .with_context("AS names a user or group missing from this machine")
                .with_suggestion("Use numeric ids: AS userid:<uid> groupid:<gid>"),
            ExecuteError::Capture { command, .. } => base
                .with_context("The run stops at the first command that fails")
                .with_suggestion(format!("Try the command on its own: {}", command)),
            ExecuteError::CreateDir { .. } | ExecuteError::WriteCapture { .. } => base
                .with_suggestion("Point WORKDIR at a writable directory"),
            ExecuteError::Delegate { .. } => base,
        };
        base.with_source(err)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
