// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The tokenizer described in `spec.md` §4.1.
//!
//! The lexer pulls more input through a caller-supplied [`LineSource`]
//! whenever a token is left unbalanced at the end of a line (an open quote,
//! an open `$(`/`${`/backquote, a trailing backslash, or a pending
//! here-document). This folds the spec's `NeedInput`/`PrematureEof` return
//! codes into the `Result` returned by [`Lexer::next_token`]: a
//! [`SyntaxError`] whose [`SyntaxError::needs_more_input`] is true and the
//! [`LineSource`] being truly exhausted together mean `PrematureEof`; the
//! same error with more input available just means the lexer asked for
//! (and got) another line transparently.

use crate::error::SyntaxError;
use crate::source::{Location, Source};
use crate::token::{Token, TokenKind, OPERATORS};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Supplies one logical line of input at a time.
///
/// `new_command` is true when the lexer is about to start tokenizing a
/// fresh top-level command (useful for choosing between a primary and
/// continuation prompt); it is false for continuation lines requested to
/// close a quote, paren, or here-document.
pub trait LineSource {
    fn next_line(&mut self, new_command: bool) -> Option<String>;
}

/// Feeds a lexer from a fixed string, used by tests and by `eval`/`.`.
pub struct StrLines<'a> {
    lines: std::str::Lines<'a>,
}

impl<'a> StrLines<'a> {
    pub fn new(s: &'a str) -> Self {
        StrLines { lines: s.lines() }
    }
}

impl LineSource for StrLines<'_> {
    fn next_line(&mut self, _new_command: bool) -> Option<String> {
        self.lines.next().map(str::to_owned)
    }
}

struct PendingHereDoc {
    id: u64,
    delimiter: String,
    strip_tabs: bool,
}

/// Character-at-a-time tokenizer over a [`LineSource`].
pub struct Lexer<'a> {
    source: Rc<Source>,
    input: &'a mut dyn LineSource,
    buf: VecDeque<char>,
    line: u32,
    col: u32,
    eof: bool,
    next_is_new_command: bool,
    next_heredoc_id: u64,
    awaiting_delimiter: Option<(u64, bool)>,
    pending_heredocs: VecDeque<PendingHereDoc>,
    heredoc_bodies: HashMap<u64, String>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: Rc<Source>, input: &'a mut dyn LineSource) -> Self {
        Lexer {
            source,
            input,
            buf: VecDeque::new(),
            line: 1,
            col: 1,
            eof: false,
            next_is_new_command: true,
            next_heredoc_id: 0,
            awaiting_delimiter: None,
            pending_heredocs: VecDeque::new(),
            heredoc_bodies: HashMap::new(),
        }
    }

    /// Tells the lexer that the next line it fetches starts a brand new
    /// top-level command (affects only the `new_command` flag passed to
    /// the [`LineSource`], e.g. to pick a prompt).
    pub fn mark_new_command(&mut self) {
        if self.buf.is_empty() {
            self.next_is_new_command = true;
        }
    }

    /// Retrieves a here-document body captured for the redirection
    /// identified by `id` (see [`Token::heredoc_id`]).
    pub fn take_heredoc_body(&mut self, id: u64) -> String {
        self.heredoc_bodies.remove(&id).unwrap_or_default()
    }

    fn fill(&mut self) -> bool {
        if !self.buf.is_empty() {
            return true;
        }
        if self.eof {
            return false;
        }
        match self.input.next_line(self.next_is_new_command) {
            Some(line) => {
                self.next_is_new_command = false;
                self.buf.extend(line.chars());
                self.buf.push_back('\n');
                true
            }
            None => {
                self.eof = true;
                false
            }
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.fill().then(|| *self.buf.front().unwrap())
    }

    fn peek_at(&mut self, offset: usize) -> Option<char> {
        // Only ever used for 2-3 char operator lookahead, which never spans
        // a fetched line (operators don't straddle newlines).
        if !self.fill() {
            return None;
        }
        self.buf.get(offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        if !self.fill() {
            return None;
        }
        let c = self.buf.pop_front()?;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn loc(&mut self) -> Location {
        self.fill();
        Location::new(Rc::clone(&self.source), self.line, self.col)
    }

    /// Returns the next token, or `Ok(None)` at true end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, SyntaxError> {
        loop {
            self.skip_blanks();
            match self.peek() {
                None => return Ok(None),
                Some('#') => {
                    self.skip_comment();
                    continue;
                }
                Some('\n') => return self.read_newline().map(Some),
                Some(c) if is_operator_start(c) => {
                    if let Some(tok) = self.try_read_operator()? {
                        return Ok(Some(tok));
                    }
                    // Not actually an operator (shouldn't happen given
                    // is_operator_start), fall through to word scanning.
                }
                _ => {}
            }
            return self.read_word().map(Some);
        }
    }

    fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(' ') | Some('\t')) {
            self.bump();
        }
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn read_newline(&mut self) -> Result<Token, SyntaxError> {
        let location = self.loc();
        self.bump();
        while let Some(pending) = self.pending_heredocs.pop_front() {
            let body = self.collect_heredoc_body(&pending)?;
            self.heredoc_bodies.insert(pending.id, body);
        }
        Ok(Token::new(TokenKind::Operator, "\n", location))
    }

    fn collect_heredoc_body(&mut self, pending: &PendingHereDoc) -> Result<String, SyntaxError> {
        let mut body = String::new();
        loop {
            let Some(raw_line) = self.input.next_line(false) else {
                return Err(SyntaxError::UnclosedHereDocContent { redir_op_location: self.loc() });
            };
            let candidate = if pending.strip_tabs { raw_line.trim_start_matches('\t') } else { &raw_line[..] };
            if candidate == pending.delimiter {
                return Ok(body);
            }
            let content = if pending.strip_tabs { raw_line.trim_start_matches('\t') } else { &raw_line[..] };
            body.push_str(content);
            body.push('\n');
        }
    }

    fn try_read_operator(&mut self) -> Result<Option<Token>, SyntaxError> {
        let three: String = [self.peek(), self.peek_at(1), self.peek_at(2)]
            .into_iter()
            .flatten()
            .collect();
        let matched = OPERATORS
            .iter()
            .filter(|op| **op != "\n")
            .find(|op| three.starts_with(*op))
            .copied();
        let Some(op) = matched else { return Ok(None) };
        let location = self.loc();
        for _ in 0..op.chars().count() {
            self.bump();
        }
        let mut token = Token::new(TokenKind::Operator, op, location);
        if op == "<<" || op == "<<-" {
            let id = self.next_heredoc_id;
            self.next_heredoc_id += 1;
            self.awaiting_delimiter = Some((id, op == "<<-"));
            token.heredoc_id = Some(id);
        }
        Ok(Some(token))
    }

    fn read_word(&mut self) -> Result<Token, SyntaxError> {
        let location = self.loc();
        let mut text = String::new();
        let mut quoted = false;
        self.scan_word_body(&mut text, &mut quoted, 0)?;
        let all_digits = !text.is_empty() && text.chars().all(|c| c.is_ascii_digit());
        let kind = if all_digits && matches!(self.peek(), Some('<') | Some('>')) {
            TokenKind::IoNumber
        } else {
            TokenKind::Token
        };
        let mut token = Token::new(kind, text, location);
        token.quoted = quoted;
        if let Some((id, strip_tabs)) = self.awaiting_delimiter.take() {
            token.heredoc_id = Some(id);
            token.heredoc_quoted = quoted;
            let delimiter = unquote_literal(&token.text);
            self.pending_heredocs.push_back(PendingHereDoc { id, delimiter, strip_tabs });
        }
        Ok(token)
    }

    /// Scans a run of word characters at nesting `depth` (0 = top level of
    /// a word, >0 = inside a `$(`/`${`/backquote group). At depth 0, an
    /// unquoted blank, newline, or operator-starting character ends the
    /// word; at depth > 0 only the matching closer does.
    fn scan_word_body(&mut self, text: &mut String, quoted: &mut bool, depth: u32) -> Result<(), SyntaxError> {
        loop {
            let Some(c) = self.peek() else {
                if depth == 0 {
                    return Ok(());
                }
                return Err(SyntaxError::PrematureEof { location: self.loc() });
            };
            if depth == 0 && (c == ' ' || c == '\t' || c == '\n' || is_operator_start(c)) {
                return Ok(());
            }
            match c {
                '\\' => {
                    let start = self.loc();
                    self.bump();
                    match self.peek() {
                        None => return Err(SyntaxError::IncompleteEscape),
                        Some('\n') => {
                            self.bump(); // line continuation: consumed, nothing emitted
                        }
                        Some(n) => {
                            *quoted = true;
                            text.push('\\');
                            text.push(n);
                            self.bump();
                            let _ = start;
                        }
                    }
                }
                '\'' => {
                    *quoted = true;
                    self.scan_single_quote(text)?;
                }
                '"' => {
                    *quoted = true;
                    self.scan_double_quote(text)?;
                }
                '$' => self.scan_dollar(text)?,
                '`' => {
                    *quoted = true;
                    self.scan_backquote(text)?;
                }
                ')' if depth > 0 => return Ok(()),
                '}' if depth > 0 => return Ok(()),
                _ => {
                    text.push(c);
                    self.bump();
                }
            }
        }
    }

    fn scan_single_quote(&mut self, text: &mut String) -> Result<(), SyntaxError> {
        let opening_location = self.loc();
        text.push('\'');
        self.bump();
        loop {
            match self.peek() {
                None => return Err(SyntaxError::UnclosedSingleQuote { opening_location }),
                Some('\'') => {
                    text.push('\'');
                    self.bump();
                    return Ok(());
                }
                Some(c) => {
                    text.push(c);
                    self.bump();
                }
            }
        }
    }

    fn scan_double_quote(&mut self, text: &mut String) -> Result<(), SyntaxError> {
        let opening_location = self.loc();
        text.push('"');
        self.bump();
        loop {
            match self.peek() {
                None => return Err(SyntaxError::UnclosedDoubleQuote { opening_location }),
                Some('"') => {
                    text.push('"');
                    self.bump();
                    return Ok(());
                }
                Some('\\') => {
                    text.push('\\');
                    self.bump();
                    match self.peek() {
                        None => return Err(SyntaxError::IncompleteEscape),
                        Some(n) => {
                            text.push(n);
                            self.bump();
                        }
                    }
                }
                Some('$') => self.scan_dollar(text)?,
                Some('`') => self.scan_backquote(text)?,
                Some(c) => {
                    text.push(c);
                    self.bump();
                }
            }
        }
    }

    fn scan_dollar(&mut self, text: &mut String) -> Result<(), SyntaxError> {
        let opening_location = self.loc();
        text.push('$');
        self.bump();
        match self.peek() {
            Some('(') => {
                text.push('(');
                self.bump();
                self.scan_balanced_parens(text, opening_location)?;
            }
            Some('{') => {
                text.push('{');
                self.bump();
                self.scan_balanced_braces(text, opening_location)?;
            }
            Some(c) if c.is_ascii_digit() || matches!(c, '@' | '*' | '#' | '?' | '$' | '!' | '-') => {
                text.push(c);
                self.bump();
            }
            Some(c) if is_name_start(c) => {
                while let Some(n) = self.peek() {
                    if is_name_continue(n) {
                        text.push(n);
                        self.bump();
                    } else {
                        break;
                    }
                }
            }
            _ => {} // bare `$`, left as a literal dollar sign
        }
        Ok(())
    }

    fn scan_balanced_parens(&mut self, text: &mut String, opening_location: Location) -> Result<(), SyntaxError> {
        let mut depth = 1u32;
        loop {
            match self.peek() {
                None => return Err(SyntaxError::UnclosedCommandSubstitution { opening_location }),
                Some('(') => {
                    depth += 1;
                    text.push('(');
                    self.bump();
                }
                Some(')') => {
                    depth -= 1;
                    text.push(')');
                    self.bump();
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Some('\'') => self.scan_single_quote(text)?,
                Some('"') => self.scan_double_quote(text)?,
                Some('\\') => {
                    text.push('\\');
                    self.bump();
                    if let Some(n) = self.peek() {
                        text.push(n);
                        self.bump();
                    }
                }
                Some(c) => {
                    text.push(c);
                    self.bump();
                }
            }
        }
    }

    fn scan_balanced_braces(&mut self, text: &mut String, opening_location: Location) -> Result<(), SyntaxError> {
        let mut depth = 1u32;
        loop {
            match self.peek() {
                None => return Err(SyntaxError::UnclosedParam { opening_location }),
                Some('{') => {
                    depth += 1;
                    text.push('{');
                    self.bump();
                }
                Some('}') => {
                    depth -= 1;
                    text.push('}');
                    self.bump();
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Some('\'') => self.scan_single_quote(text)?,
                Some('"') => self.scan_double_quote(text)?,
                Some('$') => self.scan_dollar(text)?,
                Some('\\') => {
                    text.push('\\');
                    self.bump();
                    if let Some(n) = self.peek() {
                        text.push(n);
                        self.bump();
                    }
                }
                Some(c) => {
                    text.push(c);
                    self.bump();
                }
            }
        }
    }

    fn scan_backquote(&mut self, text: &mut String) -> Result<(), SyntaxError> {
        let opening_location = self.loc();
        text.push('`');
        self.bump();
        loop {
            match self.peek() {
                None => return Err(SyntaxError::UnclosedBackquote { opening_location }),
                Some('`') => {
                    text.push('`');
                    self.bump();
                    return Ok(());
                }
                Some('\\') => {
                    text.push('\\');
                    self.bump();
                    if let Some(n) = self.peek() {
                        text.push(n);
                        self.bump();
                    }
                }
                Some(c) => {
                    text.push(c);
                    self.bump();
                }
            }
        }
    }
}

fn is_operator_start(c: char) -> bool {
    matches!(c, '&' | '|' | ';' | '<' | '>' | '(' | ')')
}

pub fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub fn is_name_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Strips the outermost quoting/escaping from a raw token's text, used to
/// compute a here-document delimiter's comparison text (`spec.md` §4.1).
/// This is *not* full expansion: `$`, backquotes, and nested substitutions
/// are left untouched other than having their surrounding quotes removed,
/// since a delimiter is compared literally.
pub fn unquote_literal(raw: &str) -> String {
    let mut out = String::new();
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(n) = chars.next() {
                    out.push(n);
                }
            }
            '\'' => {
                for n in chars.by_ref() {
                    if n == '\'' {
                        break;
                    }
                    out.push(n);
                }
            }
            '"' => {
                while let Some(n) = chars.next() {
                    if n == '"' {
                        break;
                    }
                    if n == '\\' {
                        if let Some(m) = chars.next() {
                            out.push(m);
                        }
                    } else {
                        out.push(n);
                    }
                }
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token> {
        let mut lines = StrLines::new(src);
        let mut lexer = Lexer::new(Rc::new(Source::Unknown), &mut lines);
        let mut out = Vec::new();
        while let Some(tok) = lexer.next_token().unwrap() {
            out.push(tok);
        }
        out
    }

    #[test]
    fn simple_words_and_newline() {
        let toks = tokens("echo hello\n");
        assert_eq!(toks.len(), 3);
        assert_eq!(toks[0].text, "echo");
        assert_eq!(toks[0].kind, TokenKind::Token);
        assert_eq!(toks[1].text, "hello");
        assert_eq!(toks[2].text, "\n");
        assert_eq!(toks[2].kind, TokenKind::Operator);
    }

    #[test]
    fn operators_are_maximal_munch() {
        let toks = tokens("a && b || c\n");
        let ops: Vec<_> = toks.iter().filter(|t| t.kind == TokenKind::Operator).map(|t| t.text.as_str()).collect();
        assert_eq!(ops, ["&&", "||", "\n"]);
    }

    #[test]
    fn io_number_reclassified() {
        let toks = tokens("2>file\n");
        assert_eq!(toks[0].kind, TokenKind::IoNumber);
        assert_eq!(toks[0].text, "2");
        assert!(toks[1].is_operator(">"));
    }

    #[test]
    fn digits_without_adjacent_redirect_stay_a_word() {
        let toks = tokens("2 3\n");
        assert_eq!(toks[0].kind, TokenKind::Token);
    }

    #[test]
    fn single_quote_is_literal() {
        let toks = tokens("'a b $c'\n");
        assert_eq!(toks[0].text, "'a b $c'");
        assert!(toks[0].quoted);
    }

    #[test]
    fn backslash_newline_is_line_continuation() {
        let toks = tokens("ab\\\ncd\n");
        assert_eq!(toks[0].text, "abcd");
    }

    #[test]
    fn unclosed_single_quote_errors() {
        let mut lines = StrLines::new("'abc\n");
        let mut lexer = Lexer::new(Rc::new(Source::Unknown), &mut lines);
        let err = lexer.next_token().unwrap_err();
        assert!(matches!(err, SyntaxError::UnclosedSingleQuote { .. }));
        assert!(err.needs_more_input());
    }

    #[test]
    fn heredoc_body_is_captured() {
        let mut lines = StrLines::new("cat <<EOF\nhi\nEOF\n");
        let mut lexer = Lexer::new(Rc::new(Source::Unknown), &mut lines);
        let mut toks = Vec::new();
        while let Some(tok) = lexer.next_token().unwrap() {
            toks.push(tok);
        }
        // cat, <<, EOF, \n
        assert_eq!(toks.len(), 4);
        let id = toks[1].heredoc_id.unwrap();
        assert_eq!(lexer.take_heredoc_body(id), "hi\n");
    }

    #[test]
    fn heredoc_dash_strips_leading_tabs() {
        let mut lines = StrLines::new("cat <<-EOF\n\t\thi\n\tEOF\n");
        let mut lexer = Lexer::new(Rc::new(Source::Unknown), &mut lines);
        let mut toks = Vec::new();
        while let Some(tok) = lexer.next_token().unwrap() {
            toks.push(tok);
        }
        let id = toks[1].heredoc_id.unwrap();
        assert_eq!(lexer.take_heredoc_body(id), "hi\n");
    }

    #[test]
    fn nested_command_substitution_is_balanced() {
        let toks = tokens("echo $(echo $(echo a))\n");
        assert_eq!(toks[1].text, "$(echo $(echo a))");
    }
}
