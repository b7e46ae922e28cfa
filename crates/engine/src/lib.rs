// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Flare script execution engine

mod copy;
mod error;
mod executor;
mod flatten;

pub use copy::copy_source;
pub use error::{CopyError, ExecuteError};
pub use executor::{CopyFailure, ExecutionSummary, Executor, ExecutorDeps};
pub use flatten::{capture_file_name, flatten};
