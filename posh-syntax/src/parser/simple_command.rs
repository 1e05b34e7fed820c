// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! `simple_command := (io_redirect | assignment_word | word)+` and
//! `io_redirect := [IO_NUMBER] op word` (`spec.md` §4.2), including the
//! single backtracking point: an `IO_NUMBER` that turns out not to be
//! followed by a redirection operator is reinterpreted as a plain word.

use super::command::is_valid_name;
use super::Parser;
use crate::ast::{Assignment, Command, CommandKind, RedirKind, Redirection, SimpleCommand, Word};
use crate::error::SyntaxError;
use crate::source::Location;
use crate::token::{Token, TokenKind};

impl<'a> Parser<'a> {
    pub(super) fn parse_simple_command(&mut self, location: Location) -> Result<Command, SyntaxError> {
        let mut sc = SimpleCommand::default();
        let mut seen_word = false;
        loop {
            match self.peek()? {
                None => break,
                Some(tok) if tok.is_operator("\n") => break,
                Some(tok) if is_redir_operator_start(tok) => {
                    if let Some(redir) = self.try_parse_io_redirect()? {
                        sc.redirections.push(redir);
                        continue;
                    }
                    // Backtrack: the IO_NUMBER wasn't a redirection prefix
                    // after all; fall through to treat it as a word.
                }
                Some(tok) if is_list_or_pipe_terminator(tok) => break,
                Some(tok)
                    if tok.kind == TokenKind::Token
                        && !tok.quoted
                        && !seen_word
                        && super::RESERVED_WORDS.contains(&tok.text.as_str()) =>
                {
                    break;
                }
                _ => {}
            }
            if !seen_word {
                if let Some(assignment) = self.try_parse_assignment_word()? {
                    sc.assignments.push(assignment);
                    continue;
                }
            }
            let Some(tok) = self.peek()?.cloned() else { break };
            if is_list_or_pipe_terminator(&tok) || tok.is_operator("\n") {
                break;
            }
            self.bump()?;
            sc.words.push(Word::new(tok.text, tok.location));
            seen_word = true;
        }
        if sc.is_empty() {
            return Err(SyntaxError::InvalidCommandToken { location });
        }
        Ok(Command { kind: CommandKind::Simple(sc), redirections: Vec::new(), location })
    }

    /// An assignment-word is `NAME=value` where `NAME` is a valid name and
    /// no plain word has appeared yet (`spec.md` §3).
    fn try_parse_assignment_word(&mut self) -> Result<Option<Assignment>, SyntaxError> {
        let Some(tok) = self.peek()?.cloned() else { return Ok(None) };
        if tok.kind != TokenKind::Token || tok.quoted {
            return Ok(None);
        }
        let Some(eq) = tok.text.find('=') else { return Ok(None) };
        let name = &tok.text[..eq];
        if name.is_empty() || !is_valid_name(name) {
            return Ok(None);
        }
        self.bump()?;
        let value_text = tok.text[eq + 1..].to_string();
        Ok(Some(Assignment {
            name: name.to_string(),
            value: Word::new(value_text, tok.location.clone()),
            location: tok.location,
        }))
    }

    /// `io_redirect := [IO_NUMBER] op word`. Returns `Ok(None)` without
    /// consuming anything if the lookahead isn't actually a redirection
    /// (the `IO_NUMBER` backtracking point).
    pub(super) fn try_parse_io_redirect(&mut self) -> Result<Option<Redirection>, SyntaxError> {
        let first = self.peek()?.cloned().unwrap();
        let (explicit_fd, op_tok) = if first.kind == TokenKind::IoNumber {
            let Some(op) = self.peek2()?.cloned() else { return Ok(None) };
            if !is_redir_operator(&op) {
                return Ok(None);
            }
            (Some(first.clone()), op)
        } else if is_redir_operator(&first) {
            (None, first.clone())
        } else {
            return Ok(None);
        };
        let location = op_tok.location.clone();
        if explicit_fd.is_some() {
            self.bump()?; // IO_NUMBER
        }
        self.bump()?; // operator
        let kind = redir_kind(&op_tok.text);
        let default_fd = if matches!(kind, RedirKind::InputRead | RedirKind::HereDoc | RedirKind::HereDocQuoted | RedirKind::ReadWrite) {
            0
        } else {
            1
        };
        let fd = match &explicit_fd {
            Some(tok) => tok.text.parse::<u32>().map_err(|_| SyntaxError::FdOutOfRange { location: tok.location.clone() })?,
            None => default_fd,
        };
        if fd > 9 {
            return Err(SyntaxError::FdOutOfRange { location });
        }
        if matches!(kind, RedirKind::HereDoc | RedirKind::HereDocQuoted) {
            let Some(word_tok) = self.peek()?.cloned() else {
                return Err(SyntaxError::MissingHereDocDelimiter { location });
            };
            if word_tok.kind == TokenKind::Operator {
                return Err(SyntaxError::MissingHereDocDelimiter { location });
            }
            self.bump()?;
            let actual_kind = if word_tok.heredoc_quoted { RedirKind::HereDocQuoted } else { RedirKind::HereDoc };
            let heredoc_id = word_tok.heredoc_id;
            return Ok(Some(Redirection {
                fd,
                kind: actual_kind,
                operand: Word::new(String::new(), word_tok.location),
                location,
                heredoc_id,
            }));
        }
        let Some(word_tok) = self.peek()?.cloned() else {
            return Err(SyntaxError::MissingRedirOperand { location });
        };
        if word_tok.kind == TokenKind::Operator {
            return Err(SyntaxError::MissingRedirOperand { location });
        }
        self.bump()?;
        Ok(Some(Redirection {
            fd,
            kind,
            operand: Word::new(word_tok.text, word_tok.location),
            location,
            heredoc_id: None,
        }))
    }
}

fn is_redir_operator_start(tok: &Token) -> bool {
    tok.kind == TokenKind::IoNumber || is_redir_operator(tok)
}

fn is_redir_operator(tok: &Token) -> bool {
    tok.kind == TokenKind::Operator
        && matches!(tok.text.as_str(), "<" | ">" | ">>" | ">|" | "<&" | ">&" | "<>" | "<<" | "<<-")
}

fn is_list_or_pipe_terminator(tok: &Token) -> bool {
    tok.kind == TokenKind::Operator && matches!(tok.text.as_str(), ";" | "&&" | "||" | "&" | "|" | "(" | ")")
}

fn redir_kind(op: &str) -> RedirKind {
    match op {
        "<" => RedirKind::InputRead,
        ">" => RedirKind::OutputTrunc,
        ">|" => RedirKind::OutputClobber,
        ">>" => RedirKind::Append,
        "<&" | ">&" => RedirKind::DupFd,
        "<>" => RedirKind::ReadWrite,
        "<<" | "<<-" => RedirKind::HereDoc, // refined below once the delimiter's quoting is known
        _ => unreachable!("not a redirection operator: {op}"),
    }
}
