// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake identity resolver for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{IdentityError, IdentityResolver, UserEntry};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory user and group tables
#[derive(Clone, Default)]
pub struct FakeIdentityResolver {
    users: Arc<Mutex<Vec<UserEntry>>>,
    groups: Arc<Mutex<HashMap<String, u32>>>,
}

impl FakeIdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, name: &str, uid: u32, gid: u32) {
        self.users
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(UserEntry {
                name: name.to_string(),
                uid,
                gid,
            });
    }

    pub fn add_group(&self, name: &str, gid: u32) {
        self.groups
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string(), gid);
    }
}

impl IdentityResolver for FakeIdentityResolver {
    fn user_by_name(&self, name: &str) -> Result<Option<UserEntry>, IdentityError> {
        let users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        Ok(users.iter().find(|u| u.name == name).cloned())
    }

    fn user_by_id(&self, uid: u32) -> Result<Option<UserEntry>, IdentityError> {
        let users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        Ok(users.iter().find(|u| u.uid == uid).cloned())
    }

    fn group_by_name(&self, name: &str) -> Result<Option<u32>, IdentityError> {
        let groups = self.groups.lock().unwrap_or_else(|e| e.into_inner());
        Ok(groups.get(name).copied())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
