// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! `compound_command` alternatives: brace group, subshell, `for`, `if`,
//! `while`/`until`, and `case` (`spec.md` §4.2).

use super::command::is_valid_name;
use super::{Parser, COMPOUND_LIST_TERMINATORS};
use crate::ast::{CaseItem, Command, CommandKind, ElifThen, Redirection, Word};
use crate::error::SyntaxError;
use crate::source::Location;
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    fn parse_trailing_redirections(&mut self) -> Result<Vec<Redirection>, SyntaxError> {
        let mut redirs = Vec::new();
        while let Some(r) = self.try_parse_io_redirect()? {
            redirs.push(r);
        }
        Ok(redirs)
    }

    fn expect_bare_word(&mut self, word: &str) -> Result<Location, SyntaxError> {
        match self.peek()?.cloned() {
            Some(tok) if tok.is_bare_word(word) => {
                self.bump()?;
                Ok(tok.location)
            }
            Some(tok) => Err(SyntaxError::InvalidCommandToken { location: tok.location }),
            None => Err(SyntaxError::PrematureEof { location: Location::dummy() }),
        }
    }

    pub(super) fn parse_brace_group(&mut self, location: Location) -> Result<Command, SyntaxError> {
        let opening_location = self.expect_bare_word("{")?;
        let list = self.parse_list(COMPOUND_LIST_TERMINATORS)?;
        if list.is_empty() {
            return Err(SyntaxError::EmptyCompoundList { opening_location });
        }
        self.expect_bare_word("}")?;
        let redirections = self.parse_trailing_redirections()?;
        Ok(Command { kind: CommandKind::BraceGroup(list), redirections, location })
    }

    pub(super) fn parse_subshell(&mut self, location: Location) -> Result<Command, SyntaxError> {
        let opening_location = self.current_location()?;
        self.bump()?; // (
        let list = self.parse_list(&[")"])?;
        if list.is_empty() {
            return Err(SyntaxError::EmptyCompoundList { opening_location });
        }
        match self.peek()?.cloned() {
            Some(tok) if tok.is_operator(")") => {
                self.bump()?;
            }
            _ => return Err(SyntaxError::UnclosedSubshell { opening_location }),
        }
        let redirections = self.parse_trailing_redirections()?;
        Ok(Command { kind: CommandKind::Subshell(list), redirections, location })
    }

    pub(super) fn parse_for_clause(&mut self, location: Location) -> Result<Command, SyntaxError> {
        self.bump()?; // for
        let name_tok = match self.peek()?.cloned() {
            Some(tok) if tok.kind == TokenKind::Token && !tok.quoted => tok,
            Some(tok) => return Err(SyntaxError::InvalidForName { location: tok.location }),
            None => return Err(SyntaxError::MissingForName { location }),
        };
        if !is_valid_name(&name_tok.text) {
            return Err(SyntaxError::InvalidForName { location: name_tok.location });
        }
        self.bump()?;
        self.skip_linebreak()?;
        let words = if self.peek_is_bare_word("in")? {
            self.bump()?;
            let mut words = Vec::new();
            while let Some(tok) = self.peek()?.cloned() {
                if tok.is_operator("\n") || tok.is_operator(";") {
                    break;
                }
                self.bump()?;
                words.push(Word::new(tok.text, tok.location));
            }
            if self.peek_is_operator(";")? {
                self.bump()?;
            }
            self.skip_linebreak()?;
            Some(words)
        } else {
            if self.peek_is_operator(";")? {
                self.bump()?;
            }
            self.skip_linebreak()?;
            None
        };
        let do_opening = self.expect_bare_word("do")?;
        let body = self.parse_list(COMPOUND_LIST_TERMINATORS)?;
        if body.is_empty() {
            return Err(SyntaxError::EmptyCompoundList { opening_location: do_opening });
        }
        self.expect_bare_word("done")?;
        let redirections = self.parse_trailing_redirections()?;
        Ok(Command { kind: CommandKind::For { name: name_tok.text, words, body }, redirections, location })
    }

    pub(super) fn parse_if_clause(&mut self, location: Location) -> Result<Command, SyntaxError> {
        self.bump()?; // if
        let mut arms = Vec::new();
        let if_location = location.clone();
        loop {
            let condition = self.parse_list(COMPOUND_LIST_TERMINATORS)?;
            if condition.is_empty() {
                return Err(SyntaxError::PrematureEof { location: if_location.clone() });
            }
            match self.peek()?.cloned() {
                Some(tok) if tok.is_bare_word("then") => {
                    self.bump()?;
                }
                _ => return Err(SyntaxError::MissingThen { if_location: if_location.clone() }),
            }
            let body = self.parse_list(COMPOUND_LIST_TERMINATORS)?;
            if body.is_empty() {
                return Err(SyntaxError::EmptyCompoundList { opening_location: if_location.clone() });
            }
            arms.push(ElifThen { condition, body });
            if self.peek_is_bare_word("elif")? {
                self.bump()?;
                continue;
            }
            break;
        }
        let else_body = if self.peek_is_bare_word("else")? {
            self.bump()?;
            let body = self.parse_list(COMPOUND_LIST_TERMINATORS)?;
            if body.is_empty() {
                return Err(SyntaxError::EmptyCompoundList { opening_location: if_location.clone() });
            }
            Some(body)
        } else {
            None
        };
        self.expect_bare_word("fi")?;
        let redirections = self.parse_trailing_redirections()?;
        Ok(Command { kind: CommandKind::If { arms, else_body }, redirections, location })
    }

    pub(super) fn parse_while_or_until(&mut self, location: Location, is_while: bool) -> Result<Command, SyntaxError> {
        self.bump()?; // while | until
        let condition = self.parse_list(COMPOUND_LIST_TERMINATORS)?;
        if condition.is_empty() {
            return Err(SyntaxError::PrematureEof { location: location.clone() });
        }
        let do_opening = self.expect_bare_word("do")?;
        let body = self.parse_list(COMPOUND_LIST_TERMINATORS)?;
        if body.is_empty() {
            return Err(SyntaxError::EmptyCompoundList { opening_location: do_opening });
        }
        self.expect_bare_word("done")?;
        let redirections = self.parse_trailing_redirections()?;
        let kind = if is_while {
            CommandKind::While { condition, body }
        } else {
            CommandKind::Until { condition, body }
        };
        Ok(Command { kind, redirections, location })
    }

    pub(super) fn parse_case_clause(&mut self, location: Location) -> Result<Command, SyntaxError> {
        self.bump()?; // case
        let word_tok = match self.peek()?.cloned() {
            Some(tok) if tok.kind != TokenKind::Operator => tok,
            Some(tok) => return Err(SyntaxError::InvalidCommandToken { location: tok.location }),
            None => return Err(SyntaxError::PrematureEof { location }),
        };
        self.bump()?;
        let word = Word::new(word_tok.text, word_tok.location);
        self.skip_linebreak()?;
        self.expect_bare_word("in")?;
        self.skip_linebreak()?;
        let mut items = Vec::new();
        while !self.peek_is_bare_word("esac")? {
            if self.peek_is_operator("(")? {
                self.bump()?;
            }
            let mut patterns = Vec::new();
            loop {
                let Some(tok) = self.peek()?.cloned() else {
                    return Err(SyntaxError::MissingCasePattern { location: self.current_location()? });
                };
                self.bump()?;
                patterns.push(Word::new(tok.text, tok.location));
                if self.peek_is_operator("|")? {
                    self.bump()?;
                    continue;
                }
                break;
            }
            match self.peek()?.cloned() {
                Some(tok) if tok.is_operator(")") => {
                    self.bump()?;
                }
                Some(tok) => return Err(SyntaxError::InvalidCommandToken { location: tok.location }),
                None => return Err(SyntaxError::PrematureEof { location: self.current_location()? }),
            }
            self.skip_linebreak()?;
            let body = if self.list_should_stop(&[";;", ";&", "esac"])? {
                None
            } else {
                Some(self.parse_list(&[";;", ";&", "esac"])?)
            };
            let fallthrough = if self.peek_is_operator(";&")? {
                self.bump()?;
                true
            } else {
                if self.peek_is_operator(";;")? {
                    self.bump()?;
                }
                // Otherwise `esac` was seen directly: the last item needs
                // no terminator.
                false
            };
            items.push(CaseItem { patterns, body, fallthrough });
            self.skip_linebreak()?;
        }
        self.expect_bare_word("esac")?;
        let redirections = self.parse_trailing_redirections()?;
        Ok(Command { kind: CommandKind::Case { word, items }, redirections, location })
    }
}
