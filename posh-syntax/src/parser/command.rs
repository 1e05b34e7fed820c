// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! `command := simple_command | compound_command`, including the
//! function-definition special case from `spec.md` §4.2.

use super::Parser;
use crate::ast::{Command, CommandKind};
use crate::error::SyntaxError;
use crate::lexer::is_name_start;
use crate::token::TokenKind;

/// What the next token tells us about to parse, computed from a shared
/// borrow and then released before any further (mutating) parser calls.
enum Lead {
    BraceGroup,
    Case,
    For,
    If,
    While,
    Until,
    Subshell,
    ReservedWordMisuse,
    Simple,
    Eof,
}

impl<'a> Parser<'a> {
    pub(super) fn parse_command(&mut self) -> Result<Command, SyntaxError> {
        if self.looks_like_function_definition()? {
            return self.parse_function_definition();
        }
        let location = self.current_location()?;
        match self.classify_lead()? {
            Lead::BraceGroup => self.parse_brace_group(location),
            Lead::Case => self.parse_case_clause(location),
            Lead::For => self.parse_for_clause(location),
            Lead::If => self.parse_if_clause(location),
            Lead::While => self.parse_while_or_until(location, true),
            Lead::Until => self.parse_while_or_until(location, false),
            Lead::Subshell => self.parse_subshell(location),
            Lead::ReservedWordMisuse => Err(SyntaxError::InvalidCommandToken { location }),
            Lead::Eof => Err(SyntaxError::PrematureEof { location }),
            Lead::Simple => self.parse_simple_command(location),
        }
    }

    fn classify_lead(&mut self) -> Result<Lead, SyntaxError> {
        Ok(match self.peek()? {
            Some(tok) if tok.is_bare_word("{") => Lead::BraceGroup,
            Some(tok) if tok.is_bare_word("case") => Lead::Case,
            Some(tok) if tok.is_bare_word("for") => Lead::For,
            Some(tok) if tok.is_bare_word("if") => Lead::If,
            Some(tok) if tok.is_bare_word("while") => Lead::While,
            Some(tok) if tok.is_bare_word("until") => Lead::Until,
            Some(tok) if tok.is_operator("(") => Lead::Subshell,
            Some(tok)
                if tok.kind == TokenKind::Token
                    && !tok.quoted
                    && super::RESERVED_WORDS.contains(&tok.text.as_str()) =>
            {
                Lead::ReservedWordMisuse
            }
            None => Lead::Eof,
            _ => Lead::Simple,
        })
    }

    /// A simple command reduces to `FunctionDef` when it is exactly one
    /// unquoted `NAME` followed immediately by `(` `)` (`spec.md` §4.2).
    fn looks_like_function_definition(&mut self) -> Result<bool, SyntaxError> {
        let (is_name, name) = match self.peek()? {
            Some(tok) if tok.kind == TokenKind::Token && !tok.quoted => (true, tok.text.clone()),
            _ => (false, String::new()),
        };
        if !is_name || !is_valid_name(&name) {
            return Ok(false);
        }
        let open_is_paren = matches!(self.peek2()?, Some(tok) if tok.is_operator("("));
        if !open_is_paren {
            return Ok(false);
        }
        Ok(matches!(self.peek3()?, Some(tok) if tok.is_operator(")")))
    }

    fn parse_function_definition(&mut self) -> Result<Command, SyntaxError> {
        let location = self.current_location()?;
        let name_tok = self.bump()?;
        self.bump()?; // (
        self.bump()?; // )
        self.skip_linebreak()?;
        let body_location = self.current_location()?;
        let lead = self.classify_lead()?;
        let body = match lead {
            Lead::BraceGroup => self.parse_brace_group(body_location)?,
            Lead::Case => self.parse_case_clause(body_location)?,
            Lead::For => self.parse_for_clause(body_location)?,
            Lead::If => self.parse_if_clause(body_location)?,
            Lead::While => self.parse_while_or_until(body_location, true)?,
            Lead::Until => self.parse_while_or_until(body_location, false)?,
            Lead::Subshell => self.parse_subshell(body_location)?,
            _ => return Err(SyntaxError::MissingFunctionBody { location: body_location }),
        };
        Ok(Command {
            kind: CommandKind::FunctionDef { name: name_tok.text, body: Box::new(body) },
            redirections: Vec::new(),
            location,
        })
    }
}

pub(crate) fn is_valid_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_name_start(c) => {}
        _ => return false,
    }
    chars.all(crate::lexer::is_name_continue)
}
