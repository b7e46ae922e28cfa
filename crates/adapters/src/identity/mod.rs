// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User and group lookup

mod system;

pub use system::SystemIdentityResolver;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeIdentityResolver;

use flare_script::IdSpec;
use thiserror::Error;

/// Errors from resolving an identity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("unknown user: {0}")]
    UnknownUser(String),
    #[error("unknown group: {0}")]
    UnknownGroup(String),
    #[error("no primary group for uid {0}; name a group explicitly")]
    NoPrimaryGroup(u32),
    #[error("lookup of {name} failed: {message}")]
    Lookup { name: String, message: String },
}

/// A password database entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEntry {
    pub name: String,
    pub uid: u32,
    /// Primary group
    pub gid: u32,
}

/// A resolved numeric identity to run commands under
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials {
    pub uid: u32,
    pub gid: u32,
}

/// Looks up users and groups
///
/// Lookups are synchronous; they read local databases only.
pub trait IdentityResolver: Clone + Send + Sync + 'static {
    fn user_by_name(&self, name: &str) -> Result<Option<UserEntry>, IdentityError>;

    fn user_by_id(&self, uid: u32) -> Result<Option<UserEntry>, IdentityError>;

    fn group_by_name(&self, name: &str) -> Result<Option<u32>, IdentityError>;

    /// Resolve a user and optional group to numeric ids
    ///
    /// Names must exist. A numeric user without a group takes its primary
    /// group from the user database; there is no fallback to the caller.
    fn credentials(
        &self,
        user: &IdSpec,
        group: Option<&IdSpec>,
    ) -> Result<Credentials, IdentityError> {
        let (uid, primary_gid) = match user {
            IdSpec::Id(uid) => (*uid, None),
            IdSpec::Name(name) => {
                let entry = self
                    .user_by_name(name)?
                    .ok_or_else(|| IdentityError::UnknownUser(name.clone()))?;
                (entry.uid, Some(entry.gid))
            }
        };

        let gid = match group {
            Some(IdSpec::Id(gid)) => *gid,
            Some(IdSpec::Name(name)) => self
                .group_by_name(name)?
                .ok_or_else(|| IdentityError::UnknownGroup(name.clone()))?,
            None => match primary_gid {
                Some(gid) => gid,
                None => self
                    .user_by_id(uid)?
                    .map(|entry| entry.gid)
                    .ok_or(IdentityError::NoPrimaryGroup(uid))?,
            },
        };

        Ok(Credentials { uid, gid })
    }
}
