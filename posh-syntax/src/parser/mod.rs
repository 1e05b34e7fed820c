// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! Recursive-descent parser driven by the [tokenizer](crate::lexer),
//! implementing the grammar in `spec.md` §4.2.

mod command;
mod compound;
mod simple_command;

use crate::ast::{CompleteCommand, List, Sep};
use crate::error::SyntaxError;
use crate::lexer::{LineSource, Lexer};
use crate::source::{Location, Source};
use crate::token::Token;
use std::collections::VecDeque;
use std::rc::Rc;

/// Words that are grammatically significant only in a command-start (or
/// construct-demanded) position (`spec.md` §4.2).
pub(crate) const RESERVED_WORDS: &[&str] = &[
    "!", "{", "}", "case", "do", "done", "elif", "else", "esac", "fi", "for", "if", "in", "then",
    "until", "while",
];

/// Words that terminate a `compound_list` (`spec.md` §4.2).
pub(crate) const COMPOUND_LIST_TERMINATORS: &[&str] =
    &[")", "}", ";;", "do", "done", "elif", "else", "esac", "fi", "then"];

/// Outcome of [`Parser::parse_complete_command`], exactly the three
/// outcomes named in `spec.md` §4.2 and tested by `spec.md` §8's first
/// invariant.
pub enum ParseResult {
    Match(CompleteCommand),
    NoCommand,
    Syntax(SyntaxError),
}

/// Recursive-descent parser over a [`Lexer`].
///
/// Holds a small lookahead buffer so that `parseIoRedirect`'s backtracking
/// point (`spec.md` §4.2) can be implemented as 2-token lookahead instead
/// of true token-stream rewinding: an `IO_NUMBER` is only reinterpreted as
/// a plain word if the token after it turns out not to be a redirection
/// operator.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    lookahead: VecDeque<Token>,
}

impl<'a> Parser<'a> {
    pub fn new(source: Rc<Source>, input: &'a mut dyn LineSource) -> Self {
        Parser { lexer: Lexer::new(source, input), lookahead: VecDeque::new() }
    }

    /// Retrieves a captured here-document body (see [`Token::heredoc_id`]).
    pub fn take_heredoc_body(&mut self, id: u64) -> String {
        self.lexer.take_heredoc_body(id)
    }

    fn fill(&mut self, n: usize) -> Result<(), SyntaxError> {
        while self.lookahead.len() < n {
            match self.lexer.next_token()? {
                Some(tok) => self.lookahead.push_back(tok),
                None => break,
            }
        }
        Ok(())
    }

    fn peek(&mut self) -> Result<Option<&Token>, SyntaxError> {
        self.fill(1)?;
        Ok(self.lookahead.front())
    }

    fn peek2(&mut self) -> Result<Option<&Token>, SyntaxError> {
        self.fill(2)?;
        Ok(self.lookahead.get(1))
    }

    fn peek3(&mut self) -> Result<Option<&Token>, SyntaxError> {
        self.fill(3)?;
        Ok(self.lookahead.get(2))
    }

    fn bump(&mut self) -> Result<Token, SyntaxError> {
        self.fill(1)?;
        self.lookahead
            .pop_front()
            .ok_or_else(|| SyntaxError::PrematureEof { location: Location::dummy() })
    }

    fn current_location(&mut self) -> Result<Location, SyntaxError> {
        Ok(match self.peek()? {
            Some(tok) => tok.location.clone(),
            None => Location::dummy(),
        })
    }

    fn peek_is_operator(&mut self, op: &str) -> Result<bool, SyntaxError> {
        Ok(matches!(self.peek()?, Some(tok) if tok.is_operator(op)))
    }

    fn peek_is_bare_word(&mut self, word: &str) -> Result<bool, SyntaxError> {
        Ok(matches!(self.peek()?, Some(tok) if tok.is_bare_word(word)))
    }

    /// Consumes zero or more `NEWLINE` operator tokens (the grammar's
    /// `linebreak`).
    fn skip_linebreak(&mut self) -> Result<(), SyntaxError> {
        while self.peek_is_operator("\n")? {
            self.bump()?;
        }
        Ok(())
    }

    fn at_eof(&mut self) -> Result<bool, SyntaxError> {
        Ok(self.peek()?.is_none())
    }

    /// True if no further tokens remain in the input. Exposed for callers
    /// that drive [`Parser::parse_complete_command`] in a loop (`eval`,
    /// `.`, the top-level read-eval loop) and need to tell "blank line,
    /// keep going" apart from "input exhausted, stop" after a `NoCommand`
    /// result, without consuming anything.
    pub fn is_at_end(&mut self) -> bool {
        self.at_eof().unwrap_or(true)
    }

    /// Entry point: parses one `complete_command`.
    pub fn parse_complete_command(&mut self) -> ParseResult {
        self.lexer.mark_new_command();
        match self.parse_complete_command_inner() {
            Ok(Some(cc)) => ParseResult::Match(cc),
            Ok(None) => ParseResult::NoCommand,
            Err(e) => ParseResult::Syntax(e),
        }
    }

    fn parse_complete_command_inner(&mut self) -> Result<Option<CompleteCommand>, SyntaxError> {
        if self.at_eof()? {
            return Ok(None);
        }
        if self.peek_is_operator("\n")? {
            self.bump()?;
            return Ok(None);
        }
        let mut list = self.parse_list(&[])?;
        if list.is_empty() {
            // Only blank/comment input was seen before EOF.
            return Ok(None);
        }
        if self.peek_is_operator("\n")? {
            self.bump()?;
        }
        self.patch_heredocs_in_list(&mut list);
        Ok(Some(CompleteCommand { list }))
    }

    /// Every `<<`/`<<-` redirection's body becomes available from the
    /// lexer the moment the physical line it ends is tokenized, which by
    /// construction has already happened by the time a whole
    /// `complete_command` has been parsed. This pass walks the freshly
    /// built tree and fills in each here-document's captured body.
    fn patch_heredocs_in_list(&mut self, list: &mut List) {
        for pipeline in &mut list.pipelines {
            for command in &mut pipeline.commands {
                self.patch_heredocs_in_command(command);
            }
        }
    }

    fn patch_heredocs_in_command(&mut self, command: &mut crate::ast::Command) {
        for redir in &mut command.redirections {
            self.patch_one_redir(redir);
        }
        match &mut command.kind {
            crate::ast::CommandKind::Simple(sc) => {
                for redir in &mut sc.redirections {
                    self.patch_one_redir(redir);
                }
            }
            crate::ast::CommandKind::BraceGroup(list) | crate::ast::CommandKind::Subshell(list) => {
                self.patch_heredocs_in_list(list);
            }
            crate::ast::CommandKind::For { body, .. } => self.patch_heredocs_in_list(body),
            crate::ast::CommandKind::If { arms, else_body } => {
                for arm in arms {
                    self.patch_heredocs_in_list(&mut arm.condition);
                    self.patch_heredocs_in_list(&mut arm.body);
                }
                if let Some(e) = else_body {
                    self.patch_heredocs_in_list(e);
                }
            }
            crate::ast::CommandKind::While { condition, body }
            | crate::ast::CommandKind::Until { condition, body } => {
                self.patch_heredocs_in_list(condition);
                self.patch_heredocs_in_list(body);
            }
            crate::ast::CommandKind::Case { items, .. } => {
                for item in items {
                    if let Some(body) = &mut item.body {
                        self.patch_heredocs_in_list(body);
                    }
                }
            }
            crate::ast::CommandKind::FunctionDef { body, .. } => {
                self.patch_heredocs_in_command(body);
            }
        }
    }

    fn patch_one_redir(&mut self, redir: &mut crate::ast::Redirection) {
        if let Some(id) = redir.heredoc_id.take() {
            redir.operand.text = self.take_heredoc_body(id);
        }
    }

    /// `list := pipeline (SEP linebreak pipeline)*` restricted to the given
    /// set of terminator words (empty for the top level, the relevant
    /// `compound_list` terminators for a nested construct).
    fn parse_list(&mut self, terminators: &[&str]) -> Result<List, SyntaxError> {
        let mut list = List::default();
        loop {
            self.skip_linebreak()?;
            if self.list_should_stop(terminators)? {
                break;
            }
            let pipeline = self.parse_pipeline()?;
            list.pipelines.push(pipeline);
            match self.peek()? {
                Some(tok) if tok.is_operator(";") => {
                    self.bump()?;
                    list.separators.push(Sep::Semi);
                }
                Some(tok) if tok.is_operator("&&") => {
                    self.bump()?;
                    list.separators.push(Sep::And);
                    self.skip_linebreak()?;
                }
                Some(tok) if tok.is_operator("||") => {
                    self.bump()?;
                    list.separators.push(Sep::Or);
                    self.skip_linebreak()?;
                }
                Some(tok) if tok.is_operator("&") => {
                    return Err(SyntaxError::InvalidCommandToken { location: tok.location.clone() });
                }
                _ => {
                    list.separators.push(Sep::Semi);
                    break;
                }
            }
        }
        Ok(list)
    }

    fn list_should_stop(&mut self, terminators: &[&str]) -> Result<bool, SyntaxError> {
        Ok(match self.peek()? {
            None => true,
            Some(tok) if tok.is_operator("\n") => true,
            Some(tok) if !tok.quoted && terminators.contains(&tok.text.as_str()) => true,
            _ => false,
        })
    }

    /// `pipeline := ['!']+ command ('|' linebreak command)*`
    fn parse_pipeline(&mut self) -> Result<crate::ast::Pipeline, SyntaxError> {
        let mut negated = false;
        while self.peek_is_bare_word("!")? {
            self.bump()?;
            negated = !negated;
        }
        let mut commands = vec![self.parse_command()?];
        loop {
            if self.peek_is_operator("|")? {
                self.bump()?;
                self.skip_linebreak()?;
                commands.push(self.parse_command()?);
            } else {
                break;
            }
        }
        Ok(crate::ast::Pipeline { negated, commands })
    }
}
