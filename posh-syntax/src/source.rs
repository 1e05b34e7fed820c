// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! Source locations used to blame diagnostics on a span of input text.
//!
//! This is a deliberately light-weight stand-in for the reference shell's
//! `Rc<RefCell<Code>>`-based character-by-character source tracking: each
//! [`Location`] just remembers which named input produced it and where in
//! that input's logical line it starts. That is enough for the
//! `{prefix}: {message}` and `annotate-snippets`-backed diagnostics this
//! crate renders (see `SyntaxError`).

use std::fmt;
use std::rc::Rc;

/// Name of a source of shell input, used only for error messages.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Source {
    /// Standard input of an interactive or non-interactive shell.
    Stdin,
    /// A script file given on the command line or read by `.`/`source`.
    File { name: Rc<str> },
    /// Text passed to `eval` or a similar built-in.
    Eval { parent: Box<Source> },
    /// Text supplied directly by a test or embedder, with no file backing.
    Unknown,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stdin => write!(f, "stdin"),
            Source::File { name } => write!(f, "{name}"),
            Source::Eval { parent } => write!(f, "eval ({parent})"),
            Source::Unknown => write!(f, "<unknown>"),
        }
    }
}

/// A span of input text blamed for a diagnostic.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Location {
    pub source: Rc<Source>,
    /// 1-based line number within `source`.
    pub line: u32,
    /// 1-based column number (in `char`s, not bytes) within the line.
    pub column: u32,
}

impl Location {
    pub fn new(source: Rc<Source>, line: u32, column: u32) -> Self {
        Location { source, line, column }
    }

    /// A placeholder location for synthetic tokens that have no real source
    /// span (e.g. ones built by tests).
    pub fn dummy() -> Self {
        Location::new(Rc::new(Source::Unknown), 1, 1)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.line, self.column)
    }
}
