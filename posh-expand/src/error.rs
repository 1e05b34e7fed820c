// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

use thiserror::Error;

/// Failure from [`crate::expand_word`]/[`crate::expand`], matching
/// `spec.md` §4.4's "returns negative length on failure" contract (here
/// rendered as a proper `Result` instead of a sentinel).
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ExpandError {
    /// `${name}` (or bare `$name`) referenced an unset variable while the
    /// `nounset` option is on.
    #[error("{name}: parameter not set")]
    UnsetParameter { name: String },
    /// `${name:?word}` fired because `name` was unset or null.
    #[error("{name}: {message}")]
    BadSubstitution { name: String, message: String },
    /// An unbalanced `${`/`$(`/backquote reached the end of the word
    /// before its closer — should not occur on a word produced by
    /// `posh-syntax`, which only ever hands over already-balanced text,
    /// but expansion can also run over text built by `eval`/`read` so the
    /// case is handled rather than panicking.
    #[error("unbalanced expansion in word")]
    Unbalanced,
}
