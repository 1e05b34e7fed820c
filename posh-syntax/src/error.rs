// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! Errors produced while tokenizing or parsing shell source.

use crate::source::Location;
use thiserror::Error;

/// A syntax error together with the span of input that provoked it.
///
/// Every variant mirrors a condition named in `spec.md` §4.1/§4.2: an
/// unbalanced quote or substitution is a tokenizer-level error, while a
/// misplaced reserved word or missing separator is parser-level. Both are
/// reported the same way (`spec.md` §7: `syntax error: …`), so they share
/// one enum.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{}", self.message())]
#[non_exhaustive]
pub enum SyntaxError {
    /// A backslash is at the end of the input with no input left to escape.
    #[error("backslash at end of input")]
    IncompleteEscape,
    /// A single quotation lacks a closing `'`.
    UnclosedSingleQuote { opening_location: Location },
    /// A double quotation lacks a closing `"`.
    UnclosedDoubleQuote { opening_location: Location },
    /// A `${` lacks a closing `}`.
    UnclosedParam { opening_location: Location },
    /// A `$(` lacks a closing `)`.
    UnclosedCommandSubstitution { opening_location: Location },
    /// A `` ` `` lacks a closing `` ` ``.
    UnclosedBackquote { opening_location: Location },
    /// A here-document operator's content never reached a line matching the
    /// delimiter before the input was exhausted.
    UnclosedHereDocContent { redir_op_location: Location },
    /// A command begins with an inappropriate keyword or operator token.
    InvalidCommandToken { location: Location },
    /// A separator is missing between two commands.
    MissingSeparator { location: Location },
    /// The file descriptor specified for a redirection is out of range.
    FdOutOfRange { location: Location },
    /// A redirection operator is missing its operand word.
    MissingRedirOperand { location: Location },
    /// A here-document operator is missing its delimiter word.
    MissingHereDocDelimiter { location: Location },
    /// A `(…)`, `{…}`, or other grouping contains no commands.
    EmptyCompoundList { opening_location: Location },
    /// A `(` lacks a closing `)`.
    UnclosedSubshell { opening_location: Location },
    /// A `)` appears without a matching `(`.
    UnopenedSubshell { location: Location },
    /// A `{` lacks a closing `}`.
    UnclosedBraceGroup { opening_location: Location },
    /// A `}` appears without a matching `{`.
    UnopenedBraceGroup { location: Location },
    /// The variable name is missing in a `for` loop.
    MissingForName { location: Location },
    /// The variable name is not a valid `NAME` in a `for` loop.
    InvalidForName { location: Location },
    /// A `for`/`while`/`until`/`if`/`case` construct is missing its `do`,
    /// `then`, or `esac`/`in` terminator.
    UnclosedCompound { keyword: &'static str, opening_location: Location },
    /// An `if` command is missing its `then` clause.
    MissingThen { if_location: Location },
    /// A `case` item's pattern list is missing.
    MissingCasePattern { location: Location },
    /// A function definition's `()` is not immediately followed by a
    /// compound command.
    MissingFunctionBody { location: Location },
    /// The input ended while a construct above was still open.
    PrematureEof { location: Location },
}

impl SyntaxError {
    fn message(&self) -> String {
        use SyntaxError::*;
        match self {
            IncompleteEscape => "backslash at end of input".into(),
            UnclosedSingleQuote { .. } => "unclosed single quote".into(),
            UnclosedDoubleQuote { .. } => "unclosed double quote".into(),
            UnclosedParam { .. } => "unclosed parameter expansion".into(),
            UnclosedCommandSubstitution { .. } => "unclosed command substitution".into(),
            UnclosedBackquote { .. } => "unclosed backquote substitution".into(),
            UnclosedHereDocContent { .. } => "here-document delimiter not found".into(),
            InvalidCommandToken { .. } => "invalid token at start of command".into(),
            MissingSeparator { .. } => "missing separator between commands".into(),
            FdOutOfRange { .. } => "file descriptor out of range".into(),
            MissingRedirOperand { .. } => "missing redirection operand".into(),
            MissingHereDocDelimiter { .. } => "missing here-document delimiter".into(),
            EmptyCompoundList { .. } => "compound command has no commands".into(),
            UnclosedSubshell { .. } => "unclosed subshell".into(),
            UnopenedSubshell { .. } => "unmatched `)`".into(),
            UnclosedBraceGroup { .. } => "unclosed brace group".into(),
            UnopenedBraceGroup { .. } => "unmatched `}`".into(),
            MissingForName { .. } => "missing name in for loop".into(),
            InvalidForName { .. } => "invalid name in for loop".into(),
            UnclosedCompound { keyword, .. } => format!("missing `{keyword}`"),
            MissingThen { .. } => "missing `then`".into(),
            MissingCasePattern { .. } => "missing pattern in case item".into(),
            MissingFunctionBody { .. } => "missing function body".into(),
            PrematureEof { .. } => "unexpected end of input".into(),
        }
    }

    /// True if this error can only be fixed by supplying more input, i.e.
    /// an interactive shell should re-prompt with `PS2` rather than discard
    /// the partial command (`spec.md` §4.1's `NeedInput`/`PrematureEof`).
    pub fn needs_more_input(&self) -> bool {
        matches!(
            self,
            SyntaxError::UnclosedSingleQuote { .. }
                | SyntaxError::UnclosedDoubleQuote { .. }
                | SyntaxError::UnclosedParam { .. }
                | SyntaxError::UnclosedCommandSubstitution { .. }
                | SyntaxError::UnclosedBackquote { .. }
                | SyntaxError::UnclosedHereDocContent { .. }
                | SyntaxError::UnclosedSubshell { .. }
                | SyntaxError::UnclosedBraceGroup { .. }
                | SyntaxError::UnclosedCompound { .. }
                | SyntaxError::MissingThen { .. }
                | SyntaxError::PrematureEof { .. }
                | SyntaxError::IncompleteEscape
        )
    }
}
