// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! Lowers a pattern [`Ast`] to an anchored `regex::Regex`.

use crate::ast::{Ast, Atom, Bracket, BracketAtom, BracketItem, PosixClass};
use regex::Regex;

/// Builds an anchored regex equivalent to `ast`. `*` and `?` never match a
/// path separator when `no_slash` is set, so pathname expansion can reuse
/// this lowering without letting `*` cross a directory boundary.
pub fn to_regex(ast: &Ast, no_slash: bool) -> Regex {
    let mut pattern = String::from("(?s)\\A");
    for atom in &ast.atoms {
        push_atom(&mut pattern, atom, no_slash);
    }
    pattern.push_str("\\z");
    // The AST is always well-formed by construction, so compilation cannot
    // fail; a failure here would be a bug in `to_regex` itself.
    Regex::new(&pattern).expect("generated glob regex must be valid")
}

fn push_atom(pattern: &mut String, atom: &Atom, no_slash: bool) {
    match atom {
        Atom::Char(c) => pattern.push_str(&regex::escape(&c.to_string())),
        Atom::AnyChar => {
            if no_slash {
                pattern.push_str("[^/]");
            } else {
                pattern.push('.');
            }
        }
        Atom::AnyString => {
            if no_slash {
                pattern.push_str("[^/]*");
            } else {
                pattern.push_str(".*");
            }
        }
        Atom::Bracket(bracket) => push_bracket(pattern, bracket, no_slash),
    }
}

fn push_bracket(pattern: &mut String, bracket: &Bracket, no_slash: bool) {
    pattern.push('[');
    if bracket.complement {
        pattern.push('^');
    }
    if no_slash {
        pattern.push_str("&&[^/]");
    }
    for item in &bracket.items {
        match item {
            BracketItem::Atom(BracketAtom::Char(c)) => push_class_char(pattern, *c),
            BracketItem::Atom(BracketAtom::CharClass(class)) => pattern.push_str(posix_class_regex(*class)),
            BracketItem::Range(lo, hi) => {
                push_class_char(pattern, *lo);
                pattern.push('-');
                push_class_char(pattern, *hi);
            }
        }
    }
    pattern.push(']');
}

fn push_class_char(pattern: &mut String, c: char) {
    if matches!(c, '^' | ']' | '\\' | '-' | '&') {
        pattern.push('\\');
    }
    pattern.push(c);
}

fn posix_class_regex(class: PosixClass) -> &'static str {
    match class {
        PosixClass::Alpha => "[:alpha:]",
        PosixClass::Digit => "[:digit:]",
        PosixClass::Alnum => "[:alnum:]",
        PosixClass::Upper => "[:upper:]",
        PosixClass::Lower => "[:lower:]",
        PosixClass::Space => "[:space:]",
        PosixClass::Punct => "[:punct:]",
        PosixClass::Cntrl => "[:cntrl:]",
        PosixClass::Graph => "[:graph:]",
        PosixClass::Print => "[:print:]",
        PosixClass::Xdigit => "[:xdigit:]",
        PosixClass::Blank => "[:blank:]",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_pattern_matches_exactly() {
        let ast = Ast::parse("abc").unwrap();
        let re = to_regex(&ast, false);
        assert!(re.is_match("abc"));
        assert!(!re.is_match("abcd"));
    }

    #[test]
    fn wildcard_does_not_cross_slash_when_scanning_paths() {
        let ast = Ast::parse("*").unwrap();
        let re = to_regex(&ast, true);
        assert!(re.is_match("foo"));
        assert!(!re.is_match("foo/bar"));
    }

    #[test]
    fn bracket_range_and_class() {
        let ast = Ast::parse("[a-c[:digit:]]").unwrap();
        let re = to_regex(&ast, false);
        assert!(re.is_match("b"));
        assert!(re.is_match("5"));
        assert!(!re.is_match("z"));
    }
}
