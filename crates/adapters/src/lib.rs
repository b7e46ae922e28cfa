// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O

pub mod delegate;
pub mod identity;
pub mod process;
pub mod traced;

pub use delegate::{ActionDelegate, DelegateContext, DelegateError, NoOpDelegate};
pub use identity::{
    Credentials, IdentityError, IdentityResolver, SystemIdentityResolver, UserEntry,
};
pub use process::{CaptureRequest, LocalProcessAdapter, ProcessAdapter, ProcessError};
pub use traced::{TracedDelegate, TracedProcessAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use delegate::{DelegateCall, FakeDelegate};
#[cfg(any(test, feature = "test-support"))]
pub use identity::FakeIdentityResolver;
#[cfg(any(test, feature = "test-support"))]
pub use process::FakeProcessAdapter;
