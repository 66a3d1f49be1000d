//! Branch name sanitization
//!
//! Turns arbitrary operator input into a name `git check-ref-format --branch`
//! accepts. The steps run in a fixed order because later steps must not
//! reintroduce patterns removed by earlier ones:
//!
//! 1. trim surrounding whitespace
//! 2. replace each whitespace run with `-`
//! 3. delete `~ ^ : ? * [ \` and every `@{`
//! 4. collapse `..` runs, then `--` runs, then `//` runs
//! 5. strip leading/trailing `-`, `/`, `.`
//! 6. drop a trailing `.lock`
//!
//! Steps 3 and 5-6 are repeated until the value is stable (`@~{` splices into
//! `@{` once `~` is gone, and `x-.lock` ends in `-` once `.lock` is gone), so
//! that `sanitize(sanitize(x)) == sanitize(x)` for every input.

use std::fmt;

const BANNED_CHARS: &[char] = &['~', '^', ':', '?', '*', '[', '\\'];
const BANNED_SEQUENCE: &str = "@{";
const EDGE_CHARS: &[char] = &['-', '/', '.'];
const LOCK_SUFFIX: &str = ".lock";

/// Sanitize `raw` into a valid branch name.
///
/// Total and deterministic. The result may be empty, which callers must
/// treat as an invalid name rather than a usable branch.
pub fn sanitize(raw: &str) -> String {
    let hyphenated = hyphenate_whitespace(raw.trim());
    let stripped = strip_banned(&hyphenated);
    let collapsed = collapse_runs(&collapse_runs(&collapse_runs(&stripped, '.'), '-'), '/');
    trim_edges(collapsed)
}

fn hyphenate_whitespace(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut in_whitespace = false;

    for c in value.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                result.push('-');
                in_whitespace = true;
            }
        } else {
            result.push(c);
            in_whitespace = false;
        }
    }

    result
}

fn strip_banned(value: &str) -> String {
    let mut result: String = value.chars().filter(|c| !BANNED_CHARS.contains(c)).collect();
    while result.contains(BANNED_SEQUENCE) {
        result = result.replace(BANNED_SEQUENCE, "");
    }
    result
}

fn collapse_runs(value: &str, target: char) -> String {
    let mut result = String::with_capacity(value.len());
    let mut last_was_target = false;

    for c in value.chars() {
        if c == target {
            if !last_was_target {
                result.push(c);
            }
            last_was_target = true;
        } else {
            result.push(c);
            last_was_target = false;
        }
    }

    result
}

fn trim_edges(mut value: String) -> String {
    loop {
        let trimmed = value.trim_matches(EDGE_CHARS);
        let next = trimmed.strip_suffix(LOCK_SUFFIX).unwrap_or(trimmed);
        if next.len() == value.len() {
            return value;
        }
        value = next.to_string();
    }
}

/// A non-empty branch name produced by [`sanitize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedBranch {
    name: String,
    modified: bool,
}

impl SanitizedBranch {
    /// Sanitize `raw`, returning `None` when nothing usable remains.
    pub fn parse(raw: &str) -> Option<Self> {
        let name = sanitize(raw);
        if name.is_empty() {
            return None;
        }
        let modified = name != raw;
        Some(Self { name, modified })
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    /// Whether sanitization changed the operator's input.
    pub fn was_modified(&self) -> bool {
        self.modified
    }

    pub fn into_string(self) -> String {
        self.name
    }
}

impl fmt::Display for SanitizedBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl AsRef<str> for SanitizedBranch {
    fn as_ref(&self) -> &str {
        &self.name
    }
}
