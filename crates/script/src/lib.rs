// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Flare script parsing, validation and defaults

mod args;
mod command;
mod config;
mod defaults;
mod directive;
mod expand;
mod parser;

pub use args::{
    make_named_param, map_args, split_arguments, split_command_line, split_directive,
    split_named_param, ArgError,
};
pub use command::{
    AsCommand, AuthConfigCommand, CaptureCommand, Command, CommandError, CommandLine,
    CopyCommand, EnvCommand, FromCommand, IdSpec, KubeConfigCommand, KubeGetCommand, KubeTarget,
    Node, OutputCommand, RunCommand, WorkDirCommand, DEFAULT_SSH_PORT,
};
pub use config::{ConfigError, DefaultsFile};
pub use defaults::{enforce_defaults, Defaults, DefaultsError};
pub use directive::{ArgStyle, Directive, DirectiveSpec, MergePolicy, Placement};
pub use expand::{expand_env, expand_with};
pub use parser::{load_script, parse_script, parse_str, ParseError, Script, ScriptError};
