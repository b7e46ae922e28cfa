// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Default values for configuration directives a script leaves out

use crate::args::{make_named_param, ArgError};
use crate::command::CommandError;
use crate::config::DefaultsFile;
use crate::directive::Directive;
use crate::parser::Script;
use std::path::PathBuf;
use thiserror::Error;

/// A default value failed its directive's own validation
#[derive(Debug, Error)]
#[error("default {directive}: {source}")]
pub struct DefaultsError {
    pub directive: Directive,
    #[source]
    pub source: CommandError,
}

/// Environmental facts and fixed values the resolver fills gaps with
///
/// Built once per run, either from the current process or by hand in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    pub uid: u32,
    pub gid: u32,
    pub username: String,
    pub home: PathBuf,
    /// Node list in `FROM hosts:` form
    pub from: String,
    pub workdir: PathBuf,
    pub output: PathBuf,
    pub kubeconfig: PathBuf,
    pub private_key: PathBuf,
}

impl Defaults {
    pub const FROM: &'static str = "local";
    pub const WORKDIR: &'static str = "/tmp/flare";
    pub const OUTPUT: &'static str = "./out.tar.gz";

    /// Defaults for the given identity and home directory
    pub fn new(uid: u32, gid: u32, username: impl Into<String>, home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            uid,
            gid,
            username: username.into(),
            kubeconfig: home.join(".kube").join("config"),
            private_key: home.join(".ssh").join("id_rsa"),
            home,
            from: Self::FROM.to_string(),
            workdir: PathBuf::from(Self::WORKDIR),
            output: PathBuf::from(Self::OUTPUT),
        }
    }

    /// Defaults read from the running process: real uid/gid, user and home
    pub fn from_process() -> Self {
        let uid = nix::unistd::getuid();
        let gid = nix::unistd::getgid();
        let entry = nix::unistd::User::from_uid(uid).ok().flatten();

        let username = std::env::var("USER")
            .ok()
            .filter(|u| !u.is_empty())
            .or_else(|| entry.as_ref().map(|e| e.name.clone()))
            .unwrap_or_else(|| uid.to_string());
        let home = dirs::home_dir()
            .or_else(|| entry.map(|e| e.dir))
            .unwrap_or_else(|| PathBuf::from("/"));

        Self::new(uid.as_raw(), gid.as_raw(), username, home)
    }

    /// Override built-in values with those set in a defaults file
    pub fn with_file(mut self, file: &DefaultsFile) -> Self {
        if let Some(from) = &file.from {
            self.from = from.clone();
        }
        if let Some(workdir) = &file.workdir {
            self.workdir = workdir.clone();
        }
        if let Some(output) = &file.output {
            self.output = output.clone();
        }
        if let Some(kubeconfig) = &file.kubeconfig {
            self.kubeconfig = kubeconfig.clone();
        }
        if let Some(username) = &file.username {
            self.username = username.clone();
        }
        if let Some(private_key) = &file.private_key {
            self.private_key = private_key.clone();
        }
        self
    }

    /// Raw argument text for a configuration directive's default
    fn raw_args(&self, directive: Directive) -> Result<Option<String>, ArgError> {
        let path = |p: &PathBuf| make_named_param("path", &p.display().to_string());
        let raw = match directive {
            Directive::As => format!("userid:{} groupid:{}", self.uid, self.gid),
            Directive::From => make_named_param("hosts", &self.from)?,
            Directive::AuthConfig => format!(
                "{} {}",
                make_named_param("username", &self.username)?,
                make_named_param("private-key", &self.private_key.display().to_string())?
            ),
            Directive::WorkDir => path(&self.workdir)?,
            Directive::Output => path(&self.output)?,
            Directive::KubeConfig => path(&self.kubeconfig)?,
            _ => return Ok(None),
        };
        Ok(Some(raw))
    }
}

/// Add a default command, on line 0, for every missing configuration directive
///
/// Defaults go through the same constructors as script lines, so they are
/// validated exactly like user input.
pub fn enforce_defaults(mut script: Script, defaults: &Defaults) -> Result<Script, DefaultsError> {
    tracing::debug!("applying default values");
    for directive in Directive::CONFIGURATION {
        if script.has_preamble(directive) {
            continue;
        }
        let raw = defaults.raw_args(directive).map_err(|e| DefaultsError {
            directive,
            source: e.into(),
        })?;
        let Some(raw) = raw else {
            continue;
        };
        let spec = directive.spec();
        let cmd = (spec.build)(0, &raw).map_err(|source| DefaultsError { directive, source })?;
        tracing::debug!(%directive, raw, "default applied");
        script.place(spec, cmd);
    }
    Ok(script)
}

#[cfg(test)]
#[path = "defaults_tests.rs"]
mod tests;
