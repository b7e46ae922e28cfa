// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File names derived from command lines and node addresses

const CAPTURE_SUFFIX: &str = ".txt";
const EMPTY_NAME: &str = "capture";

/// Turn arbitrary text into a single filesystem-safe token
///
/// Runs of characters outside `[A-Za-z0-9._-]` collapse to one `_`, and
/// leading or trailing `_` are dropped.
pub fn flatten(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            if pending && !out.is_empty() {
                out.push('_');
            }
            pending = false;
            out.push(c);
        } else {
            pending = true;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        return EMPTY_NAME.to_string();
    }
    trimmed.to_string()
}

/// File name for a CAPTURE command's output
pub fn capture_file_name(command_line: &str) -> String {
    format!("{}{}", flatten(command_line), CAPTURE_SUFFIX)
}

/// File name for a CAPTURE whose flattened name is already taken in this run
///
/// `n` starts at 2 for the second command with the same flattened form.
pub fn numbered_capture_file_name(command_line: &str, n: usize) -> String {
    format!("{}_{}{}", flatten(command_line), n, CAPTURE_SUFFIX)
}

#[cfg(test)]
#[path = "flatten_tests.rs"]
mod tests;
