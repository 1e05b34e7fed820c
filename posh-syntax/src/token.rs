// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! Token produced by the [lexer](crate::lexer).

use crate::source::Location;
use std::fmt;

/// The three token classes named by the grammar in `spec.md` §4.1.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenKind {
    /// A word: a command name, argument, keyword candidate, or assignment.
    Token,
    /// One of the fixed shell operators (`;`, `&&`, `(`, `\n`, ...).
    Operator,
    /// A run of digits immediately followed by `<` or `>` with no
    /// intervening whitespace.
    IoNumber,
}

/// A lexical token: its class and its literal (still-quoted) source text.
///
/// `text` is the token exactly as it appeared in the input, quoting and
/// escaping intact; nothing below the parser interprets quotes. Expansion
/// (`posh-expand`) is what later turns `text` into a value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: Location,
    /// True if any quoting or backslash-escaping was used while scanning
    /// this token. A reserved word or assignment-word must be unquoted.
    pub quoted: bool,
    /// Set on a `<<`/`<<-` operator token (a fresh id per occurrence) and
    /// copied onto the delimiter word token that immediately follows it, so
    /// the parser can correlate the two and later retrieve the captured
    /// body from the lexer.
    pub heredoc_id: Option<u64>,
    /// Meaningful only on a here-document delimiter word token: true if the
    /// delimiter was quoted, meaning the body is opaque (`HereDocQuoted`)
    /// rather than subject to expansion (`HereDoc`).
    pub heredoc_quoted: bool,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: Location) -> Self {
        Token {
            kind,
            text: text.into(),
            location,
            quoted: false,
            heredoc_id: None,
            heredoc_quoted: false,
        }
    }

    /// True if this token's literal text equals `op` and it is an operator.
    pub fn is_operator(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    /// True if this token is an unquoted `Token` equal to `word` exactly.
    /// Reserved-word recognition uses this: a reserved word that has been
    /// quoted in any way (`\if`, `"if"`, ...) no longer matches.
    pub fn is_bare_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Token && self.text == word
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// The fixed set of operator texts, checked longest-first so that e.g. `&&`
/// is preferred over `&`.
pub const OPERATORS: &[&str] = &[
    "&&", "||", ";;", ";&", "<<-", "<<", "<&", "<>", ">>", ">&", ">|", "&", "(", ")", ";", "|", "<",
    ">", "\n",
];
