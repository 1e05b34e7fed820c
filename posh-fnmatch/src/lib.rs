// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! Shell pattern matching (`fnmatch`-style) and pathname expansion.
//!
//! Supports `?`, `*`, and bracket expressions with literal characters,
//! ranges, complementation (`[!...]`/`[^...]`), and POSIX character
//! classes (`[:alpha:]` and friends). Collating symbols and equivalence
//! classes are not supported — no shell script in ordinary use depends on
//! them, and dropping them keeps [`ast::Bracket`] a plain enum instead of
//! a locale-aware one. Not locale-aware in any other sense either: all
//! character classes are decided by `char`'s own Unicode properties.

pub mod ast;
pub mod error;
pub mod glob;
pub mod regex;

use crate::ast::Ast;
use crate::error::PatternError;
use ::regex::Regex;

/// A compiled glob pattern, ready to test candidate strings.
#[derive(Clone, Debug)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Parses and compiles `pattern`. Never matches a `/` with `*`/`?`;
    /// use the raw [`Ast`] plus [`regex::to_regex`] directly if a pattern
    /// spanning path separators is ever needed.
    pub fn parse(pattern: &str) -> Result<Pattern, PatternError> {
        let ast = Ast::parse(pattern)?;
        Ok(Pattern { regex: regex::to_regex(&ast, false) })
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }
}

/// Shorthand for `Pattern::parse(pattern).is_ok_and(|p| p.matches(word))`,
/// used by `case` pattern matching and parameter-expansion modifiers
/// (`${name#pattern}` and friends) where a malformed pattern should just
/// fail to match rather than abort expansion.
pub fn matches(word: &str, pattern: &str) -> bool {
    Pattern::parse(pattern).is_ok_and(|p| p.matches(word))
}

pub use glob::expand_pathnames;
