// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The quote-aware scanner that interprets a [`Word`](posh_syntax::ast::Word)'s
//! raw text: parameter/command substitution and quote removal happen here,
//! in one left-to-right pass, exactly as `spec.md` §4.1 says the tokenizer
//! left them ("tracks nesting but does not evaluate") for this crate to
//! interpret. Tilde expansion is handled by `crate::lib` before a word's
//! text reaches this scanner, since it only ever applies to a fixed
//! prefix of the raw word.

use crate::error::ExpandError;
use crate::param::{self, Modifier};
use crate::CommandSubstituter;
use posh_env::{Env, System};
use posh_syntax::lexer::{is_name_continue, is_name_start};

/// One run of expanded text, tagged with whether it came from inside a
/// quote (or a backslash escape) and is therefore exempt from `IFS`
/// splitting and pathname expansion.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Segment {
    pub text: String,
    pub quoted: bool,
}

fn push_char(out: &mut Vec<Segment>, c: char, quoted: bool) {
    if let Some(last) = out.last_mut() {
        if last.quoted == quoted {
            last.text.push(c);
            return;
        }
    }
    out.push(Segment { text: c.to_string(), quoted });
}

/// Scans `raw` (a [`Word`](posh_syntax::ast::Word)'s text, or a nested
/// modifier word's text) into expanded segments.
pub(crate) fn scan<S: System>(
    raw: &str,
    env: &mut Env<S>,
    subst: &mut dyn CommandSubstituter<S>,
) -> Result<Vec<Segment>, ExpandError> {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;
    scan_unquoted(&chars, &mut i, env, subst, &mut out)?;
    Ok(out)
}

/// Convenience for contexts (a modifier's `word`, a here-doc body) that
/// only need the joined, quote-removed string with no field splitting.
pub(crate) fn expand_text<S: System>(
    raw: &str,
    env: &mut Env<S>,
    subst: &mut dyn CommandSubstituter<S>,
) -> Result<String, ExpandError> {
    let segments = scan(raw, env, subst)?;
    Ok(segments.into_iter().map(|s| s.text).collect())
}

fn trim_trailing_newlines(s: &str) -> &str {
    s.trim_end_matches('\n')
}

fn scan_unquoted<S: System>(
    chars: &[char],
    i: &mut usize,
    env: &mut Env<S>,
    subst: &mut dyn CommandSubstituter<S>,
    out: &mut Vec<Segment>,
) -> Result<(), ExpandError> {
    while *i < chars.len() {
        match chars[*i] {
            '\\' => {
                *i += 1;
                if *i < chars.len() {
                    push_char(out, chars[*i], true);
                    *i += 1;
                }
            }
            '\'' => {
                *i += 1;
                while *i < chars.len() && chars[*i] != '\'' {
                    push_char(out, chars[*i], true);
                    *i += 1;
                }
                *i += 1;
            }
            '"' => {
                *i += 1;
                scan_double_quoted(chars, i, env, subst, out)?;
                *i += 1;
            }
            '$' => scan_dollar(chars, i, env, subst, out, false)?,
            '`' => {
                *i += 1;
                let (body, next) = extract_backquote(chars, *i)?;
                *i = next;
                let output = subst.substitute(env, &body);
                for ch in trim_trailing_newlines(&output).chars() {
                    push_char(out, ch, false);
                }
            }
            c => {
                push_char(out, c, false);
                *i += 1;
            }
        }
    }
    Ok(())
}

fn scan_double_quoted<S: System>(
    chars: &[char],
    i: &mut usize,
    env: &mut Env<S>,
    subst: &mut dyn CommandSubstituter<S>,
    out: &mut Vec<Segment>,
) -> Result<(), ExpandError> {
    while *i < chars.len() && chars[*i] != '"' {
        match chars[*i] {
            '\\' if *i + 1 < chars.len() && matches!(chars[*i + 1], '$' | '`' | '"' | '\\') => {
                push_char(out, chars[*i + 1], true);
                *i += 2;
            }
            '\\' if *i + 1 < chars.len() => {
                push_char(out, '\\', true);
                push_char(out, chars[*i + 1], true);
                *i += 2;
            }
            '$' => scan_dollar(chars, i, env, subst, out, true)?,
            '`' => {
                *i += 1;
                let (body, next) = extract_backquote(chars, *i)?;
                *i = next;
                let output = subst.substitute(env, &body);
                for ch in trim_trailing_newlines(&output).chars() {
                    push_char(out, ch, true);
                }
            }
            c => {
                push_char(out, c, true);
                *i += 1;
            }
        }
    }
    Ok(())
}

fn scan_dollar<S: System>(
    chars: &[char],
    i: &mut usize,
    env: &mut Env<S>,
    subst: &mut dyn CommandSubstituter<S>,
    out: &mut Vec<Segment>,
    quoted: bool,
) -> Result<(), ExpandError> {
    *i += 1;
    let Some(&c) = chars.get(*i) else {
        push_char(out, '$', quoted);
        return Ok(());
    };
    match c {
        '(' if chars.get(*i + 1) == Some(&'(') => {
            let (text, next) = extract_arithmetic_literal(chars, *i)?;
            *i = next;
            push_char(out, '$', quoted);
            for ch in text.chars() {
                push_char(out, ch, quoted);
            }
        }
        '(' => {
            *i += 1;
            let (body, next) = extract_balanced(chars, *i, '(', ')')?;
            *i = next;
            let output = subst.substitute(env, &body);
            for ch in trim_trailing_newlines(&output).chars() {
                push_char(out, ch, quoted);
            }
        }
        '{' => {
            *i += 1;
            let (body, next) = extract_balanced(chars, *i, '{', '}')?;
            *i = next;
            let value = expand_braced_param(&body, env, subst)?;
            for ch in value.chars() {
                push_char(out, ch, quoted);
            }
        }
        c if c.is_ascii_digit() || matches!(c, '@' | '*' | '#' | '?' | '$' | '!' | '-') => {
            *i += 1;
            emit_simple_param(&c.to_string(), env, out, quoted)?;
        }
        c if is_name_start(c) => {
            let mut name = String::new();
            while let Some(&n) = chars.get(*i) {
                if is_name_continue(n) {
                    name.push(n);
                    *i += 1;
                } else {
                    break;
                }
            }
            emit_simple_param(&name, env, out, quoted)?;
        }
        _ => push_char(out, '$', quoted),
    }
    Ok(())
}

fn emit_simple_param<S: System>(
    name: &str,
    env: &mut Env<S>,
    out: &mut Vec<Segment>,
    quoted: bool,
) -> Result<(), ExpandError> {
    let value = match param::lookup(name, env) {
        Some(v) => v,
        None => {
            if env.options.is_on(posh_env::Option::NoUnset) {
                return Err(ExpandError::UnsetParameter { name: name.to_string() });
            }
            String::new()
        }
    };
    for ch in value.chars() {
        push_char(out, ch, quoted);
    }
    Ok(())
}

/// Extracts the text between a balanced pair of `open`/`close` (already
/// past the opening character), skipping over nested quotes so a paren or
/// brace inside a string literal isn't miscounted. Returns the index just
/// past the matching close.
fn extract_balanced(chars: &[char], mut i: usize, open: char, close: char) -> Result<(String, usize), ExpandError> {
    let mut depth = 1usize;
    let mut body = String::new();
    while i < chars.len() {
        let c = chars[i];
        match c {
            '\\' if i + 1 < chars.len() => {
                body.push(c);
                body.push(chars[i + 1]);
                i += 2;
            }
            '\'' => {
                body.push(c);
                i += 1;
                while i < chars.len() && chars[i] != '\'' {
                    body.push(chars[i]);
                    i += 1;
                }
                if i < chars.len() {
                    body.push(chars[i]);
                    i += 1;
                }
            }
            '"' => {
                body.push(c);
                i += 1;
                while i < chars.len() && chars[i] != '"' {
                    if chars[i] == '\\' && i + 1 < chars.len() {
                        body.push(chars[i]);
                        body.push(chars[i + 1]);
                        i += 2;
                    } else {
                        body.push(chars[i]);
                        i += 1;
                    }
                }
                if i < chars.len() {
                    body.push(chars[i]);
                    i += 1;
                }
            }
            c if c == open => {
                depth += 1;
                body.push(c);
                i += 1;
            }
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Ok((body, i + 1));
                }
                body.push(c);
                i += 1;
            }
            _ => {
                body.push(c);
                i += 1;
            }
        }
    }
    Err(ExpandError::Unbalanced)
}

/// `$((...))` is left untouched (`spec.md` §4.4's declared arithmetic
/// non-goal); this just locates the matching `))` so expansion can copy
/// the whole span through literally.
fn extract_arithmetic_literal(chars: &[char], start: usize) -> Result<(String, usize), ExpandError> {
    let mut i = start;
    let mut depth = 0i32;
    let mut text = String::new();
    loop {
        let Some(&c) = chars.get(i) else { return Err(ExpandError::Unbalanced) };
        text.push(c);
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((text, i + 1));
                }
            }
            _ => {}
        }
        i += 1;
    }
}

/// Extracts an old-style `` `command` `` substitution's command text,
/// resolving the limited backslash-escaping POSIX gives inside backquotes
/// (only `` \` ``, `\$`, `\\` are escapes; any other backslash is literal).
fn extract_backquote(chars: &[char], mut i: usize) -> Result<(String, usize), ExpandError> {
    let mut body = String::new();
    while i < chars.len() {
        match chars[i] {
            '`' => return Ok((body, i + 1)),
            '\\' if i + 1 < chars.len() && matches!(chars[i + 1], '`' | '$' | '\\') => {
                body.push(chars[i + 1]);
                i += 2;
            }
            c => {
                body.push(c);
                i += 1;
            }
        }
    }
    Err(ExpandError::Unbalanced)
}

/// Expands an unquoted here-document body (`spec.md` §4.4's
/// `NO_QUOTES`/here-doc note): only `$`/backquote substitution and the
/// restricted backslash-escape set POSIX gives such bodies (`\$ \` \\` and
/// backslash-newline line continuation) apply. Unlike [`scan`], a literal
/// `'`/`"` is never treated as opening a quote.
pub(crate) fn scan_heredoc<S: System>(
    raw: &str,
    env: &mut Env<S>,
    subst: &mut dyn CommandSubstituter<S>,
) -> Result<String, ExpandError> {
    let chars: Vec<char> = raw.chars().collect();
    let mut i = 0;
    let mut out = String::new();
    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 < chars.len() && matches!(chars[i + 1], '$' | '`' | '\\') => {
                out.push(chars[i + 1]);
                i += 2;
            }
            '\\' if i + 1 < chars.len() && chars[i + 1] == '\n' => {
                i += 2;
            }
            '$' => {
                let mut segments = Vec::new();
                scan_dollar(&chars, &mut i, env, subst, &mut segments, false)?;
                for segment in segments {
                    out.push_str(&segment.text);
                }
            }
            '`' => {
                i += 1;
                let (body, next) = extract_backquote(&chars, i)?;
                i = next;
                let output = subst.substitute(env, &body);
                out.push_str(trim_trailing_newlines(&output));
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    Ok(out)
}

/// `${name}` and `${name:X word}` (`spec.md` §4.4's four colon modifiers).
fn expand_braced_param<S: System>(
    body: &str,
    env: &mut Env<S>,
    subst: &mut dyn CommandSubstituter<S>,
) -> Result<String, ExpandError> {
    let chars: Vec<char> = body.chars().collect();
    let mut i = 0;
    let name = match chars.first() {
        Some(&c) if c.is_ascii_digit() || matches!(c, '@' | '*' | '#' | '?' | '$' | '!' | '-') => {
            i += 1;
            c.to_string()
        }
        Some(&c) if is_name_start(c) => {
            let mut n = String::new();
            while let Some(&n2) = chars.get(i) {
                if is_name_continue(n2) {
                    n.push(n2);
                    i += 1;
                } else {
                    break;
                }
            }
            n
        }
        _ => String::new(),
    };
    let modifier = if chars.get(i) == Some(&':') {
        chars.get(i + 1).and_then(|c| Modifier::from_char(*c)).map(|m| {
            i += 2;
            m
        })
    } else {
        None
    };
    let word_text: String = chars[i..].iter().collect();
    let current = param::lookup(&name, env);
    let unset_or_null = current.as_deref().map_or(true, str::is_empty);

    match modifier {
        None => match current {
            Some(v) => Ok(v),
            None if env.options.is_on(posh_env::Option::NoUnset) => Err(ExpandError::UnsetParameter { name }),
            None => Ok(String::new()),
        },
        Some(Modifier::UseDefault) => {
            if unset_or_null {
                expand_text(&word_text, env, subst)
            } else {
                Ok(current.unwrap_or_default())
            }
        }
        Some(Modifier::AssignDefault) => {
            if unset_or_null {
                let value = expand_text(&word_text, env, subst)?;
                env.variables
                    .get_or_new(name.clone(), posh_env::Scope::Global)
                    .assign(value.clone(), None)
                    .map_err(|e| ExpandError::BadSubstitution { name: name.clone(), message: e.to_string() })?;
                Ok(value)
            } else {
                Ok(current.unwrap_or_default())
            }
        }
        Some(Modifier::Error) => {
            if unset_or_null {
                let message = if word_text.is_empty() {
                    "parameter null or not set".to_string()
                } else {
                    expand_text(&word_text, env, subst)?
                };
                Err(ExpandError::BadSubstitution { name, message })
            } else {
                Ok(current.unwrap_or_default())
            }
        }
        Some(Modifier::UseAlternate) => {
            if unset_or_null {
                Ok(String::new())
            } else {
                expand_text(&word_text, env, subst)
            }
        }
    }
}
