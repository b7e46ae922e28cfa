// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identity lookup against the system user and group databases

use super::{IdentityError, IdentityResolver, UserEntry};
use nix::unistd::{Group, Uid, User};

/// Resolves names with `getpwnam`/`getgrnam` through `nix`
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemIdentityResolver;

impl SystemIdentityResolver {
    pub fn new() -> Self {
        Self
    }
}

fn entry(user: User) -> UserEntry {
    UserEntry {
        name: user.name,
        uid: user.uid.as_raw(),
        gid: user.gid.as_raw(),
    }
}

fn lookup_error(name: impl Into<String>, err: nix::Error) -> IdentityError {
    IdentityError::Lookup {
        name: name.into(),
        message: err.to_string(),
    }
}

impl IdentityResolver for SystemIdentityResolver {
    fn user_by_name(&self, name: &str) -> Result<Option<UserEntry>, IdentityError> {
        User::from_name(name)
            .map(|user| user.map(entry))
            .map_err(|e| lookup_error(name, e))
    }

    fn user_by_id(&self, uid: u32) -> Result<Option<UserEntry>, IdentityError> {
        User::from_uid(Uid::from_raw(uid))
            .map(|user| user.map(entry))
            .map_err(|e| lookup_error(uid.to_string(), e))
    }

    fn group_by_name(&self, name: &str) -> Result<Option<u32>, IdentityError> {
        Group::from_name(name)
            .map(|group| group.map(|g| g.gid.as_raw()))
            .map_err(|e| lookup_error(name, e))
    }
}

#[cfg(test)]
#[path = "system_tests.rs"]
mod tests;
