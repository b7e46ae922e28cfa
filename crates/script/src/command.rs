// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Script commands: one validated value type per directive

use crate::args::{
    map_args, split_arguments, split_command_line, split_named_param, unquote, ArgError,
};
use crate::directive::Directive;
use crate::expand::expand_env;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Port used for nodes that do not name one
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Address of the pseudo-node that stands for the local machine
const LOCAL_NODE: &str = "local";

/// Errors raised while building a command from its arguments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error(transparent)]
    Args(#[from] ArgError),
    #[error("must have at least {min} argument(s), found {found}")]
    TooFewArgs {
        directive: Directive,
        min: usize,
        found: usize,
    },
    #[error("can only have up to {max} argument(s), found {found}")]
    TooManyArgs {
        directive: Directive,
        max: usize,
        found: usize,
    },
    #[error("does not accept parameter '{param}'")]
    UnknownParam { directive: Directive, param: String },
    #[error("requires parameter '{param}'")]
    MissingParam { directive: Directive, param: String },
    #[error("{param}: '{value}' is not a valid number")]
    InvalidInteger {
        directive: Directive,
        param: String,
        value: String,
    },
    #[error("{param}: path is empty")]
    EmptyPath { directive: Directive, param: String },
    #[error("'{0}' is not a KEY=VALUE pair")]
    InvalidEnv(String),
    #[error("'{0}' is not a valid user or group")]
    InvalidIdentity(String),
    #[error("'{0}' is not a valid node address")]
    InvalidNode(String),
    #[error("what: '{0}' must be one of objects, logs, all")]
    InvalidKubeTarget(String),
    #[error("command line is empty")]
    EmptyCommandLine { directive: Directive },
}

/// A parsed script command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "directive", rename_all = "UPPERCASE")]
pub enum Command {
    As(AsCommand),
    Env(EnvCommand),
    From(FromCommand),
    KubeConfig(KubeConfigCommand),
    AuthConfig(AuthConfigCommand),
    Output(OutputCommand),
    WorkDir(WorkDirCommand),
    Capture(CaptureCommand),
    Copy(CopyCommand),
    Run(RunCommand),
    KubeGet(KubeGetCommand),
}

impl Command {
    /// Source line the command came from; 0 for synthesized defaults
    pub fn line(&self) -> usize {
        match self {
            Command::As(c) => c.line,
            Command::Env(c) => c.line,
            Command::From(c) => c.line,
            Command::KubeConfig(c) => c.line,
            Command::AuthConfig(c) => c.line,
            Command::Output(c) => c.line,
            Command::WorkDir(c) => c.line,
            Command::Capture(c) => c.line,
            Command::Copy(c) => c.line,
            Command::Run(c) => c.line,
            Command::KubeGet(c) => c.line,
        }
    }

    pub fn directive(&self) -> Directive {
        match self {
            Command::As(_) => Directive::As,
            Command::Env(_) => Directive::Env,
            Command::From(_) => Directive::From,
            Command::KubeConfig(_) => Directive::KubeConfig,
            Command::AuthConfig(_) => Directive::AuthConfig,
            Command::Output(_) => Directive::Output,
            Command::WorkDir(_) => Directive::WorkDir,
            Command::Capture(_) => Directive::Capture,
            Command::Copy(_) => Directive::Copy,
            Command::Run(_) => Directive::Run,
            Command::KubeGet(_) => Directive::KubeGet,
        }
    }

    /// True when the command was synthesized rather than read from a script
    pub fn is_default(&self) -> bool {
        self.line() == 0
    }
}

// Constructors referenced from the capability table

pub(crate) fn build_as(line: usize, raw: &str) -> Result<Command, CommandError> {
    AsCommand::new(line, raw).map(Command::As)
}

pub(crate) fn build_env(line: usize, raw: &str) -> Result<Command, CommandError> {
    EnvCommand::new(line, raw).map(Command::Env)
}

pub(crate) fn build_from(line: usize, raw: &str) -> Result<Command, CommandError> {
    FromCommand::new(line, raw).map(Command::From)
}

pub(crate) fn build_kube_config(line: usize, raw: &str) -> Result<Command, CommandError> {
    KubeConfigCommand::new(line, raw).map(Command::KubeConfig)
}

pub(crate) fn build_auth_config(line: usize, raw: &str) -> Result<Command, CommandError> {
    AuthConfigCommand::new(line, raw).map(Command::AuthConfig)
}

pub(crate) fn build_output(line: usize, raw: &str) -> Result<Command, CommandError> {
    OutputCommand::new(line, raw).map(Command::Output)
}

pub(crate) fn build_workdir(line: usize, raw: &str) -> Result<Command, CommandError> {
    WorkDirCommand::new(line, raw).map(Command::WorkDir)
}

pub(crate) fn build_capture(line: usize, raw: &str) -> Result<Command, CommandError> {
    CaptureCommand::new(line, raw).map(Command::Capture)
}

pub(crate) fn build_copy(line: usize, raw: &str) -> Result<Command, CommandError> {
    CopyCommand::new(line, raw).map(Command::Copy)
}

pub(crate) fn build_run(line: usize, raw: &str) -> Result<Command, CommandError> {
    RunCommand::new(line, raw).map(Command::Run)
}

pub(crate) fn build_kube_get(line: usize, raw: &str) -> Result<Command, CommandError> {
    KubeGetCommand::new(line, raw).map(Command::KubeGet)
}

/// Validate arity, then map named parameters, rejecting names not in `allowed`
fn named_args(
    directive: Directive,
    raw: &str,
    allowed: &[&str],
) -> Result<HashMap<String, String>, CommandError> {
    directive.spec().validate(raw)?;
    let args = map_args(raw)?;
    if let Some(param) = args.keys().find(|k| !allowed.contains(&k.as_str())) {
        return Err(CommandError::UnknownParam {
            directive,
            param: param.clone(),
        });
    }
    Ok(args)
}

fn required(
    directive: Directive,
    args: &mut HashMap<String, String>,
    param: &str,
) -> Result<String, CommandError> {
    args.remove(param).ok_or_else(|| CommandError::MissingParam {
        directive,
        param: param.to_string(),
    })
}

fn path_value(directive: Directive, param: &str, value: &str) -> Result<PathBuf, CommandError> {
    let expanded = expand_env(value.trim());
    if expanded.is_empty() {
        return Err(CommandError::EmptyPath {
            directive,
            param: param.to_string(),
        });
    }
    Ok(PathBuf::from(expanded))
}

fn single_path(directive: Directive, raw: &str) -> Result<PathBuf, CommandError> {
    let mut args = named_args(directive, raw, &["path"])?;
    let path = required(directive, &mut args, "path")?;
    path_value(directive, "path", &path)
}

fn split_list(value: &str) -> Vec<String> {
    value.split_whitespace().map(String::from).collect()
}

/// A user or group, given by numeric id or by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum IdSpec {
    Id(u32),
    Name(String),
}

impl IdSpec {
    fn parse(value: &str) -> Result<Self, CommandError> {
        let value = value.trim();
        if value.is_empty() || value.contains(char::is_whitespace) || value.contains(':') {
            return Err(CommandError::InvalidIdentity(value.to_string()));
        }
        if value.bytes().all(|b| b.is_ascii_digit()) {
            return value
                .parse::<u32>()
                .map(IdSpec::Id)
                .map_err(|_| CommandError::InvalidIdentity(value.to_string()));
        }
        Ok(IdSpec::Name(value.to_string()))
    }
}

impl fmt::Display for IdSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdSpec::Id(id) => write!(f, "{}", id),
            IdSpec::Name(name) => f.write_str(name),
        }
    }
}

/// `AS userid:<id|name> [groupid:<id|name>]` or `AS <user>[:<group>]`
///
/// Names are kept unresolved; the executor looks them up before running
/// anything so that an unknown user fails the run rather than the parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AsCommand {
    pub line: usize,
    pub user: IdSpec,
    pub group: Option<IdSpec>,
}

impl AsCommand {
    pub fn new(line: usize, raw: &str) -> Result<Self, CommandError> {
        let directive = Directive::As;
        directive.spec().validate(raw)?;
        let tokens = split_arguments(raw)?;

        let named: Result<Vec<_>, _> = tokens.iter().map(|t| split_named_param(t)).collect();
        if let Ok(pairs) = named {
            if pairs
                .iter()
                .all(|(name, _)| name == "userid" || name == "groupid")
            {
                let mut args: HashMap<String, String> = pairs.into_iter().collect();
                let user = required(directive, &mut args, "userid")?;
                let group = args.remove("groupid").map(|g| IdSpec::parse(&g)).transpose()?;
                return Ok(Self {
                    line,
                    user: IdSpec::parse(&user)?,
                    group,
                });
            }
        }

        // Shorthand `user[:group]`
        match tokens.as_slice() {
            [token] => {
                let token = unquote(token);
                let (user, group) = match token.split_once(':') {
                    Some((user, group)) => (user, Some(group)),
                    None => (token, None),
                };
                Ok(Self {
                    line,
                    user: IdSpec::parse(user)?,
                    group: group.map(IdSpec::parse).transpose()?,
                })
            }
            _ => {
                // Two tokens that are not both userid/groupid: report what is wrong
                named_args(directive, raw, &["userid", "groupid"])?;
                Err(CommandError::MissingParam {
                    directive,
                    param: "userid".to_string(),
                })
            }
        }
    }
}

/// `ENV KEY=VALUE ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvCommand {
    pub line: usize,
    pub vars: Vec<String>,
}

impl EnvCommand {
    pub fn new(line: usize, raw: &str) -> Result<Self, CommandError> {
        Directive::Env.spec().validate(raw)?;
        let vars = split_command_line(raw)?;
        for var in &vars {
            match var.split_once('=') {
                Some((key, _)) if !key.is_empty() && !key.contains(char::is_whitespace) => {}
                _ => return Err(CommandError::InvalidEnv(var.clone())),
            }
        }
        Ok(Self { line, vars })
    }

    /// Variables split into key and value
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().filter_map(|v| v.split_once('='))
    }
}

/// A target node: an address with an optional port
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Node {
    pub address: String,
    pub port: Option<u16>,
}

impl Node {
    /// The local pseudo-node
    pub fn local() -> Self {
        Self {
            address: LOCAL_NODE.to_string(),
            port: None,
        }
    }

    pub fn is_local(&self) -> bool {
        self.address == LOCAL_NODE
    }

    fn parse(spec: &str, default_port: u16) -> Result<Self, CommandError> {
        if spec == LOCAL_NODE {
            return Ok(Self::local());
        }
        let (address, port) = match spec.rsplit_once(':') {
            Some((address, port)) => {
                let port = port.parse::<u16>().map_err(|_| CommandError::InvalidInteger {
                    directive: Directive::From,
                    param: "hosts".to_string(),
                    value: spec.to_string(),
                })?;
                (address, port)
            }
            None => (spec, default_port),
        };
        if address.is_empty() || address.contains(':') {
            return Err(CommandError::InvalidNode(spec.to_string()));
        }
        Ok(Self {
            address: address.to_string(),
            port: Some(port),
        })
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.address, port),
            None => f.write_str(&self.address),
        }
    }
}

/// `FROM hosts:"<node> ..." [port:<n>]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FromCommand {
    pub line: usize,
    pub nodes: Vec<Node>,
}

impl FromCommand {
    pub fn new(line: usize, raw: &str) -> Result<Self, CommandError> {
        let directive = Directive::From;
        let mut args = named_args(directive, raw, &["hosts", "port"])?;
        let hosts = required(directive, &mut args, "hosts")?;
        let default_port = match args.remove("port") {
            Some(port) => port
                .trim()
                .parse::<u16>()
                .map_err(|_| CommandError::InvalidInteger {
                    directive,
                    param: "port".to_string(),
                    value: port.clone(),
                })?,
            None => DEFAULT_SSH_PORT,
        };

        let nodes = hosts
            .split_whitespace()
            .map(|spec| Node::parse(spec, default_port))
            .collect::<Result<Vec<_>, _>>()?;
        if nodes.is_empty() {
            return Err(CommandError::MissingParam {
                directive,
                param: "hosts".to_string(),
            });
        }
        Ok(Self { line, nodes })
    }
}

/// `KUBECONFIG path:<path>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KubeConfigCommand {
    pub line: usize,
    pub path: PathBuf,
}

impl KubeConfigCommand {
    pub fn new(line: usize, raw: &str) -> Result<Self, CommandError> {
        let path = single_path(Directive::KubeConfig, raw)?;
        Ok(Self { line, path })
    }
}

/// `OUTPUT path:<path>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputCommand {
    pub line: usize,
    pub path: PathBuf,
}

impl OutputCommand {
    pub fn new(line: usize, raw: &str) -> Result<Self, CommandError> {
        let path = single_path(Directive::Output, raw)?;
        Ok(Self { line, path })
    }
}

/// `WORKDIR path:<path>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkDirCommand {
    pub line: usize,
    pub path: PathBuf,
}

impl WorkDirCommand {
    pub fn new(line: usize, raw: &str) -> Result<Self, CommandError> {
        let path = single_path(Directive::WorkDir, raw)?;
        Ok(Self { line, path })
    }
}

/// `AUTHCONFIG username:<name> private-key:<path>`
///
/// Only carried for the transport that reaches remote nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthConfigCommand {
    pub line: usize,
    pub username: Option<String>,
    pub private_key: Option<PathBuf>,
}

impl AuthConfigCommand {
    pub fn new(line: usize, raw: &str) -> Result<Self, CommandError> {
        let directive = Directive::AuthConfig;
        let mut args = named_args(directive, raw, &["username", "private-key"])?;
        let username = args.remove("username").map(|u| u.trim().to_string());
        let private_key = args
            .remove("private-key")
            .map(|k| path_value(directive, "private-key", &k))
            .transpose()?;
        Ok(Self {
            line,
            username,
            private_key,
        })
    }
}

/// `COPY <path> ...`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyCommand {
    pub line: usize,
    pub paths: Vec<PathBuf>,
}

impl CopyCommand {
    pub fn new(line: usize, raw: &str) -> Result<Self, CommandError> {
        let directive = Directive::Copy;
        directive.spec().validate(raw)?;
        let paths = split_command_line(raw)?
            .iter()
            .map(|p| path_value(directive, "path", p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { line, paths })
    }
}

/// A command line split into program and arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandLine {
    /// The command line as written in the script
    pub text: String,
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    fn parse(directive: Directive, raw: &str) -> Result<Self, CommandError> {
        directive.spec().validate(raw)?;
        let text = raw.trim().to_string();
        let mut tokens = split_command_line(&text)?.into_iter();
        let program = tokens
            .next()
            .ok_or(CommandError::EmptyCommandLine { directive })?;
        Ok(Self {
            text,
            program,
            args: tokens.collect(),
        })
    }
}

/// `CAPTURE <command line>`: run locally and keep the output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureCommand {
    pub line: usize,
    pub cli: CommandLine,
}

impl CaptureCommand {
    pub fn new(line: usize, raw: &str) -> Result<Self, CommandError> {
        let cli = CommandLine::parse(Directive::Capture, raw)?;
        Ok(Self { line, cli })
    }
}

/// `RUN <command line>`: executed by the node transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunCommand {
    pub line: usize,
    pub cli: CommandLine,
}

impl RunCommand {
    pub fn new(line: usize, raw: &str) -> Result<Self, CommandError> {
        let cli = CommandLine::parse(Directive::Run, raw)?;
        Ok(Self { line, cli })
    }
}

/// What a cluster query retrieves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KubeTarget {
    Objects,
    Logs,
    All,
}

impl fmt::Display for KubeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KubeTarget::Objects => "objects",
            KubeTarget::Logs => "logs",
            KubeTarget::All => "all",
        })
    }
}

impl std::str::FromStr for KubeTarget {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "objects" => Ok(KubeTarget::Objects),
            "logs" => Ok(KubeTarget::Logs),
            "all" => Ok(KubeTarget::All),
            other => Err(CommandError::InvalidKubeTarget(other.to_string())),
        }
    }
}

/// `KUBEGET what:<objects|logs|all> [groups:] [kinds:] [namespaces:] ...`
///
/// List parameters are whitespace separated inside one quoted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KubeGetCommand {
    pub line: usize,
    pub what: KubeTarget,
    pub groups: Vec<String>,
    pub kinds: Vec<String>,
    pub namespaces: Vec<String>,
    pub versions: Vec<String>,
    pub names: Vec<String>,
    pub labels: Option<String>,
    pub containers: Vec<String>,
}

impl KubeGetCommand {
    const PARAMS: [&'static str; 8] = [
        "what",
        "groups",
        "kinds",
        "namespaces",
        "versions",
        "names",
        "labels",
        "containers",
    ];

    pub fn new(line: usize, raw: &str) -> Result<Self, CommandError> {
        let directive = Directive::KubeGet;
        let mut args = named_args(directive, raw, &Self::PARAMS)?;
        let what = required(directive, &mut args, "what")?.parse()?;
        let mut list = |name: &str| args.remove(name).map(|v| split_list(&v)).unwrap_or_default();
        let groups = list("groups");
        let kinds = list("kinds");
        let namespaces = list("namespaces");
        let versions = list("versions");
        let names = list("names");
        let containers = list("containers");
        let labels = args.remove("labels").filter(|l| !l.trim().is_empty());
        Ok(Self {
            line,
            what,
            groups,
            kinds,
            namespaces,
            versions,
            names,
            labels,
            containers,
        })
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
