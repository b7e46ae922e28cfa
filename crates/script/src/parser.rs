// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Script parsing

use crate::args::split_directive;
use crate::command::{
    AsCommand, AuthConfigCommand, Command, CommandError, FromCommand, KubeConfigCommand,
    OutputCommand, WorkDirCommand,
};
use crate::defaults::{enforce_defaults, Defaults, DefaultsError};
use crate::directive::{Directive, DirectiveSpec, MergePolicy, Placement};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::BufRead;
use thiserror::Error;

/// Errors that stop parsing at the offending line
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: {directive} unsupported")]
    Unsupported { line: usize, directive: String },
    #[error("line {line}: {directive}: {source}")]
    Directive {
        line: usize,
        directive: Directive,
        #[source]
        source: CommandError,
    },
    #[error("line {line}: read failed: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    /// The 1-based script line the error was raised on
    pub fn line(&self) -> usize {
        match self {
            ParseError::Unsupported { line, .. }
            | ParseError::Directive { line, .. }
            | ParseError::Io { line, .. } => *line,
        }
    }
}

/// Errors from loading a script: parsing, then default resolution
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Defaults(#[from] DefaultsError),
}

/// A parsed job: configuration preambles and ordered actions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Script {
    pub preambles: BTreeMap<Directive, Vec<Command>>,
    pub actions: Vec<Command>,
}

impl Script {
    /// Commands recorded for a preamble directive, in merge order
    pub fn preamble(&self, directive: Directive) -> &[Command] {
        self.preambles
            .get(&directive)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_preamble(&self, directive: Directive) -> bool {
        !self.preamble(directive).is_empty()
    }

    fn first_preamble<'a, T>(
        &'a self,
        directive: Directive,
        pick: fn(&'a Command) -> Option<&'a T>,
    ) -> Option<&'a T> {
        self.preamble(directive).iter().find_map(pick)
    }

    /// The `AS` identity
    pub fn identity(&self) -> Option<&AsCommand> {
        self.first_preamble(Directive::As, |cmd| match cmd {
            Command::As(c) => Some(c),
            _ => None,
        })
    }

    /// The `FROM` node list
    pub fn from(&self) -> Option<&FromCommand> {
        self.first_preamble(Directive::From, |cmd| match cmd {
            Command::From(c) => Some(c),
            _ => None,
        })
    }

    pub fn workdir(&self) -> Option<&WorkDirCommand> {
        self.first_preamble(Directive::WorkDir, |cmd| match cmd {
            Command::WorkDir(c) => Some(c),
            _ => None,
        })
    }

    pub fn output(&self) -> Option<&OutputCommand> {
        self.first_preamble(Directive::Output, |cmd| match cmd {
            Command::Output(c) => Some(c),
            _ => None,
        })
    }

    pub fn kube_config(&self) -> Option<&KubeConfigCommand> {
        self.first_preamble(Directive::KubeConfig, |cmd| match cmd {
            Command::KubeConfig(c) => Some(c),
            _ => None,
        })
    }

    pub fn auth_config(&self) -> Option<&AuthConfigCommand> {
        self.first_preamble(Directive::AuthConfig, |cmd| match cmd {
            Command::AuthConfig(c) => Some(c),
            _ => None,
        })
    }

    /// All `ENV` variables across every occurrence, in script order
    pub fn env_vars(&self) -> Vec<String> {
        self.preamble(Directive::Env)
            .iter()
            .filter_map(|cmd| match cmd {
                Command::Env(env) => Some(env.vars.iter().cloned()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Record a command according to its directive's placement
    pub fn place(&mut self, spec: &DirectiveSpec, cmd: Command) {
        match spec.placement {
            Placement::Preamble(MergePolicy::Replace) => {
                self.preambles.insert(spec.directive, vec![cmd]);
            }
            Placement::Preamble(MergePolicy::Append) => {
                self.preambles.entry(spec.directive).or_default().push(cmd);
            }
            Placement::Action => self.actions.push(cmd),
        }
    }
}

/// Parse script text line by line
///
/// Blank lines and `#` comments are skipped. Parsing stops at the first
/// error, which carries the 1-based line number.
pub fn parse_script<R: BufRead>(reader: R) -> Result<Script, ParseError> {
    tracing::info!("parsing script");
    let mut script = Script::default();

    for (index, text) in reader.lines().enumerate() {
        let line = index + 1;
        let text = text.map_err(|source| ParseError::Io { line, source })?;
        let text = text.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        tracing::debug!(line, text, "parsing");

        let (name, raw) = split_directive(text);
        let spec = Directive::lookup(name).ok_or_else(|| ParseError::Unsupported {
            line,
            directive: name.to_string(),
        })?;
        let cmd = (spec.build)(line, raw).map_err(|source| ParseError::Directive {
            line,
            directive: spec.directive,
            source,
        })?;
        script.place(spec, cmd);
        tracing::debug!(line, directive = %spec.directive, "parsed");
    }

    tracing::info!(
        preambles = script.preambles.len(),
        actions = script.actions.len(),
        "parsed script"
    );
    Ok(script)
}

/// Parse script text held in memory
pub fn parse_str(content: &str) -> Result<Script, ParseError> {
    parse_script(content.as_bytes())
}

/// Parse a script and fill in every missing configuration directive
pub fn load_script<R: BufRead>(reader: R, defaults: &Defaults) -> Result<Script, ScriptError> {
    let script = parse_script(reader)?;
    Ok(enforce_defaults(script, defaults)?)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
