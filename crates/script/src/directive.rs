// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directive names and the directive capability table

use crate::args::{map_args, split_arguments, ArgError};
use crate::command::{self, Command, CommandError};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// A keyword that starts a script line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Directive {
    As,
    Env,
    From,
    KubeConfig,
    AuthConfig,
    Output,
    WorkDir,
    Capture,
    Copy,
    Run,
    KubeGet,
}

/// How a directive's raw argument text is counted and read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgStyle {
    /// `name:value` parameters, counted by distinct name
    Named,
    /// Whitespace separated tokens, counted per token
    Positional,
    /// The whole text is one command line
    CommandLine,
}

/// How a preamble merges with earlier occurrences of the same directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Only the last occurrence survives
    Replace,
    /// Every occurrence is kept in order
    Append,
}

/// Where a parsed directive lands in the script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Preamble(MergePolicy),
    Action,
}

/// Grammar rules for one directive
#[derive(Debug, Clone, Copy)]
pub struct DirectiveSpec {
    pub directive: Directive,
    pub name: &'static str,
    pub min_args: usize,
    /// `None` means unbounded
    pub max_args: Option<usize>,
    pub style: ArgStyle,
    pub placement: Placement,
    /// Builds the command from a source line number and raw argument text
    pub build: fn(usize, &str) -> Result<Command, CommandError>,
}

impl DirectiveSpec {
    /// Count the arguments in raw text according to this directive's style
    pub fn count_args(&self, raw: &str) -> Result<usize, ArgError> {
        match self.style {
            ArgStyle::Named => Ok(map_args(raw)?.len()),
            ArgStyle::Positional => Ok(split_arguments(raw)?.len()),
            ArgStyle::CommandLine => Ok(usize::from(!raw.trim().is_empty())),
        }
    }

    /// Count and bound-check raw argument text in one step
    pub fn validate(&self, raw: &str) -> Result<(), CommandError> {
        let found = self.count_args(raw)?;
        self.check_arity(found)
    }

    /// Check an argument count against this directive's bounds
    pub fn check_arity(&self, found: usize) -> Result<(), CommandError> {
        if found < self.min_args {
            return Err(CommandError::TooFewArgs {
                directive: self.directive,
                min: self.min_args,
                found,
            });
        }
        if let Some(max) = self.max_args {
            if found > max {
                return Err(CommandError::TooManyArgs {
                    directive: self.directive,
                    max,
                    found,
                });
            }
        }
        Ok(())
    }

    pub fn is_action(&self) -> bool {
        self.placement == Placement::Action
    }
}

// Indexed by `Directive as usize`; keep in declaration order.
static DIRECTIVES: [DirectiveSpec; 11] = [
    DirectiveSpec {
        directive: Directive::As,
        name: "AS",
        min_args: 1,
        max_args: Some(2),
        style: ArgStyle::Positional,
        placement: Placement::Preamble(MergePolicy::Replace),
        build: command::build_as,
    },
    DirectiveSpec {
        directive: Directive::Env,
        name: "ENV",
        min_args: 1,
        max_args: None,
        style: ArgStyle::Positional,
        placement: Placement::Preamble(MergePolicy::Append),
        build: command::build_env,
    },
    DirectiveSpec {
        directive: Directive::From,
        name: "FROM",
        min_args: 1,
        max_args: Some(2),
        style: ArgStyle::Named,
        placement: Placement::Preamble(MergePolicy::Replace),
        build: command::build_from,
    },
    DirectiveSpec {
        directive: Directive::KubeConfig,
        name: "KUBECONFIG",
        min_args: 1,
        max_args: Some(1),
        style: ArgStyle::Named,
        placement: Placement::Preamble(MergePolicy::Replace),
        build: command::build_kube_config,
    },
    DirectiveSpec {
        directive: Directive::AuthConfig,
        name: "AUTHCONFIG",
        min_args: 1,
        max_args: Some(2),
        style: ArgStyle::Named,
        placement: Placement::Preamble(MergePolicy::Replace),
        build: command::build_auth_config,
    },
    DirectiveSpec {
        directive: Directive::Output,
        name: "OUTPUT",
        min_args: 1,
        max_args: Some(1),
        style: ArgStyle::Named,
        placement: Placement::Preamble(MergePolicy::Replace),
        build: command::build_output,
    },
    DirectiveSpec {
        directive: Directive::WorkDir,
        name: "WORKDIR",
        min_args: 1,
        max_args: Some(1),
        style: ArgStyle::Named,
        placement: Placement::Preamble(MergePolicy::Replace),
        build: command::build_workdir,
    },
    DirectiveSpec {
        directive: Directive::Capture,
        name: "CAPTURE",
        min_args: 1,
        max_args: Some(1),
        style: ArgStyle::CommandLine,
        placement: Placement::Action,
        build: command::build_capture,
    },
    DirectiveSpec {
        directive: Directive::Copy,
        name: "COPY",
        min_args: 1,
        max_args: None,
        style: ArgStyle::Positional,
        placement: Placement::Action,
        build: command::build_copy,
    },
    DirectiveSpec {
        directive: Directive::Run,
        name: "RUN",
        min_args: 1,
        max_args: Some(1),
        style: ArgStyle::CommandLine,
        placement: Placement::Action,
        build: command::build_run,
    },
    DirectiveSpec {
        directive: Directive::KubeGet,
        name: "KUBEGET",
        min_args: 1,
        max_args: Some(8),
        style: ArgStyle::Named,
        placement: Placement::Action,
        build: command::build_kube_get,
    },
];

static BY_NAME: LazyLock<HashMap<&'static str, &'static DirectiveSpec>> =
    LazyLock::new(|| DIRECTIVES.iter().map(|spec| (spec.name, spec)).collect());

impl Directive {
    /// Configuration directives that every resolved script carries exactly once
    pub const CONFIGURATION: [Directive; 6] = [
        Directive::As,
        Directive::From,
        Directive::AuthConfig,
        Directive::Output,
        Directive::WorkDir,
        Directive::KubeConfig,
    ];

    /// Look up a directive's grammar by its script keyword
    ///
    /// Returns `None` for names the parser does not support.
    pub fn lookup(name: &str) -> Option<&'static DirectiveSpec> {
        BY_NAME.get(name).copied()
    }

    /// This directive's grammar
    pub fn spec(self) -> &'static DirectiveSpec {
        &DIRECTIVES[self as usize]
    }

    /// The script keyword
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Every directive in the capability table
    pub fn all() -> impl Iterator<Item = Directive> {
        DIRECTIVES.iter().map(|spec| spec.directive)
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "directive_tests.rs"]
mod tests;
