// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Quote-aware tokenizing of directive lines and arguments

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

// Regex pattern for name:value - this is a constant valid pattern
#[allow(clippy::expect_used)]
static NAMED_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^([a-z0-9_\-]+):(.+)$").expect("constant regex pattern is valid")
});

/// Syntax errors raised while tokenizing arguments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
    #[error("unterminated {quote} quote in: {input}")]
    UnterminatedQuote { quote: char, input: String },
    #[error("not a recognized named parameter: {0}")]
    NotNamedParam(String),
    #[error("value contains both quote characters: {0}")]
    Unquotable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quotes {
    Keep,
    Strip,
}

/// Split a script line into its directive name and raw argument text
///
/// The split happens at the first run of whitespace. A line without
/// whitespace is a directive with no arguments.
pub fn split_directive(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.find(char::is_whitespace) {
        Some(pos) => (&line[..pos], line[pos..].trim_start()),
        None => (line, ""),
    }
}

/// Split raw arguments on whitespace, keeping quoted runs together
///
/// Quote characters are kept in the tokens so that named parameters can
/// still tell a quoted value from an unquoted one.
pub fn split_arguments(raw: &str) -> Result<Vec<String>, ArgError> {
    scan(raw, Quotes::Keep)
}

/// Split a command line into program and arguments, removing quotes
pub fn split_command_line(raw: &str) -> Result<Vec<String>, ArgError> {
    scan(raw, Quotes::Strip)
}

fn scan(input: &str, quotes: Quotes) -> Result<Vec<String>, ArgError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut open: Option<char> = None;

    for c in input.chars() {
        match open {
            Some(q) if c == q => {
                open = None;
                if quotes == Quotes::Keep {
                    current.push(c);
                }
            }
            Some(_) => current.push(c),
            None if c == '\'' || c == '"' => {
                open = Some(c);
                in_token = true;
                if quotes == Quotes::Keep {
                    current.push(c);
                }
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if let Some(quote) = open {
        return Err(ArgError::UnterminatedQuote {
            quote,
            input: input.to_string(),
        });
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Split a `name:value` token into its name and unquoted value
pub fn split_named_param(token: &str) -> Result<(String, String), ArgError> {
    let caps = NAMED_PARAM
        .captures(token)
        .ok_or_else(|| ArgError::NotNamedParam(token.to_string()))?;
    Ok((caps[1].to_string(), unquote(&caps[2]).to_string()))
}

/// Map `name:value` arguments by name; a repeated name keeps its last value
pub fn map_args(raw: &str) -> Result<HashMap<String, String>, ArgError> {
    let mut args = HashMap::new();
    for token in split_arguments(raw)? {
        let (name, value) = split_named_param(&token)?;
        args.insert(name, value);
    }
    Ok(args)
}

/// Build a `name:value` token that `split_named_param` reads back unchanged
///
/// The value is wrapped in whichever quote character it does not contain.
/// A value holding both has no token form.
pub fn make_named_param(name: &str, value: &str) -> Result<String, ArgError> {
    if !value.contains('\'') {
        Ok(format!("{}:'{}'", name, value))
    } else if !value.contains('"') {
        Ok(format!("{}:\"{}\"", name, value))
    } else {
        Err(ArgError::Unquotable(value.to_string()))
    }
}

/// Strip one pair of matching surrounding quotes
pub(crate) fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
