// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment variable expansion for path-valued parameters

use regex::Regex;
use std::sync::LazyLock;

// Regex pattern for ${VAR} and ${VAR:-default}
#[allow(clippy::expect_used)]
static ENV_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{(\w+)(?::-([^}]*))?\}").expect("constant regex pattern is valid")
});

/// Expand `${VAR}` and `${VAR:-default}` from the process environment
///
/// Unset variables without a default expand to the empty string.
pub fn expand_env(input: &str) -> String {
    expand_with(input, |name| std::env::var(name).ok())
}

/// Expand `${VAR}` and `${VAR:-default}` using the given lookup
pub fn expand_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENV_PATTERN
        .replace_all(input, |caps: &regex::Captures| {
            lookup(&caps[1])
                .or_else(|| caps.get(2).map(|m| m.as_str().to_string()))
                .unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
#[path = "expand_tests.rs"]
mod tests;
