// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The glob pattern AST, parsed from raw pattern text and later lowered
//! to a `regex::Regex` by [`crate::regex`].
//!
//! Scoped down from the reference implementation: collating symbols
//! (`[.ch.]`) and equivalence classes (`[=a=]`) are not supported, since
//! `spec.md` names only `?`, `*`, and bracket expressions with ranges,
//! complementation, and POSIX character classes. See DESIGN.md.

use crate::error::PatternError;

/// One atom of a bracket expression (`[...]`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketAtom {
    Char(char),
    /// `[:alpha:]` and friends.
    CharClass(PosixClass),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PosixClass {
    Alpha,
    Digit,
    Alnum,
    Upper,
    Lower,
    Space,
    Punct,
    Cntrl,
    Graph,
    Print,
    Xdigit,
    Blank,
}

impl PosixClass {
    pub fn from_name(name: &str) -> std::option::Option<PosixClass> {
        Some(match name {
            "alpha" => PosixClass::Alpha,
            "digit" => PosixClass::Digit,
            "alnum" => PosixClass::Alnum,
            "upper" => PosixClass::Upper,
            "lower" => PosixClass::Lower,
            "space" => PosixClass::Space,
            "punct" => PosixClass::Punct,
            "cntrl" => PosixClass::Cntrl,
            "graph" => PosixClass::Graph,
            "print" => PosixClass::Print,
            "xdigit" => PosixClass::Xdigit,
            "blank" => PosixClass::Blank,
            _ => return None,
        })
    }

    pub fn matches(self, c: char) -> bool {
        match self {
            PosixClass::Alpha => c.is_alphabetic(),
            PosixClass::Digit => c.is_ascii_digit(),
            PosixClass::Alnum => c.is_alphanumeric(),
            PosixClass::Upper => c.is_uppercase(),
            PosixClass::Lower => c.is_lowercase(),
            PosixClass::Space => c.is_whitespace(),
            PosixClass::Punct => c.is_ascii_punctuation(),
            PosixClass::Cntrl => c.is_control(),
            PosixClass::Graph => !c.is_whitespace() && !c.is_control() && c != '\0',
            PosixClass::Print => !c.is_control(),
            PosixClass::Xdigit => c.is_ascii_hexdigit(),
            PosixClass::Blank => c == ' ' || c == '\t',
        }
    }
}

/// One item inside a bracket expression: a single atom, or a `lo-hi`
/// character range.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketItem {
    Atom(BracketAtom),
    Range(char, char),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Bracket {
    pub complement: bool,
    pub items: Vec<BracketItem>,
}

impl Bracket {
    pub fn matches(&self, c: char) -> bool {
        let found = self.items.iter().any(|item| match item {
            BracketItem::Atom(BracketAtom::Char(ch)) => *ch == c,
            BracketItem::Atom(BracketAtom::CharClass(class)) => class.matches(c),
            BracketItem::Range(lo, hi) => *lo <= c && c <= *hi,
        });
        found != self.complement
    }
}

/// One atom of a top-level pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Atom {
    Char(char),
    /// `?`
    AnyChar,
    /// `*`
    AnyString,
    Bracket(Bracket),
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Ast {
    pub atoms: Vec<Atom>,
}

impl Ast {
    /// Parses a full pattern string into an AST. Unterminated bracket
    /// expressions and other syntax errors (an empty `[]`'s `]` being
    /// literal is handled, not an error) fall back to treating `[` as a
    /// literal character, per traditional glob behavior.
    pub fn parse(pattern: &str) -> Result<Ast, PatternError> {
        let chars: Vec<char> = pattern.chars().collect();
        let mut atoms = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            match chars[i] {
                '?' => {
                    atoms.push(Atom::AnyChar);
                    i += 1;
                }
                '*' => {
                    atoms.push(Atom::AnyString);
                    i += 1;
                }
                '[' => match parse_bracket(&chars, i) {
                    Some((bracket, next)) => {
                        atoms.push(Atom::Bracket(bracket));
                        i = next;
                    }
                    None => {
                        atoms.push(Atom::Char('['));
                        i += 1;
                    }
                },
                '\\' if i + 1 < chars.len() => {
                    atoms.push(Atom::Char(chars[i + 1]));
                    i += 2;
                }
                c => {
                    atoms.push(Atom::Char(c));
                    i += 1;
                }
            }
        }
        Ok(Ast { atoms })
    }
}

/// Tries to parse a bracket expression starting at `chars[start] == '['`.
/// Returns `None` (treat `[` as literal) if no matching `]` is found.
fn parse_bracket(chars: &[char], start: usize) -> std::option::Option<(Bracket, usize)> {
    let mut i = start + 1;
    if i >= chars.len() {
        return None;
    }
    let complement = matches!(chars[i], '!' | '^');
    if complement {
        i += 1;
    }
    let mut items = Vec::new();
    let mut first = true;
    loop {
        if i >= chars.len() {
            return None;
        }
        if chars[i] == ']' && !first {
            i += 1;
            break;
        }
        first = false;
        if chars[i] == '[' && chars.get(i + 1) == Some(&':') {
            if let Some((class, next)) = parse_char_class(chars, i) {
                items.push(BracketItem::Atom(BracketAtom::CharClass(class)));
                i = next;
                continue;
            }
        }
        let atom_char = chars[i];
        i += 1;
        if chars.get(i) == Some(&'-') && chars.get(i + 1).is_some_and(|c| *c != ']') {
            let hi = chars[i + 1];
            items.push(BracketItem::Range(atom_char, hi));
            i += 2;
        } else {
            items.push(BracketItem::Atom(BracketAtom::Char(atom_char)));
        }
    }
    Some((Bracket { complement, items }, i))
}

/// Parses a `[:name:]` character class starting at `chars[start] == '['`.
fn parse_char_class(chars: &[char], start: usize) -> std::option::Option<(PosixClass, usize)> {
    let end = chars[start + 2..].iter().position(|&c| c == ':')?;
    let name_end = start + 2 + end;
    if chars.get(name_end + 1) != Some(&']') {
        return None;
    }
    let name: String = chars[start + 2..name_end].iter().collect();
    let class = PosixClass::from_name(&name)?;
    Some((class, name_end + 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_literal_text() {
        let ast = Ast::parse("abc").unwrap();
        assert_eq!(ast.atoms, vec![Atom::Char('a'), Atom::Char('b'), Atom::Char('c')]);
    }

    #[test]
    fn parses_wildcards() {
        let ast = Ast::parse("a?*").unwrap();
        assert_eq!(ast.atoms, vec![Atom::Char('a'), Atom::AnyChar, Atom::AnyString]);
    }

    #[test]
    fn parses_bracket_with_range_and_complement() {
        let ast = Ast::parse("[!a-z0]").unwrap();
        let Atom::Bracket(bracket) = &ast.atoms[0] else { panic!("expected bracket") };
        assert!(bracket.complement);
        assert_eq!(bracket.items, vec![BracketItem::Range('a', 'z'), BracketItem::Atom(BracketAtom::Char('0'))]);
    }

    #[test]
    fn parses_posix_character_class() {
        let ast = Ast::parse("[[:digit:]]").unwrap();
        let Atom::Bracket(bracket) = &ast.atoms[0] else { panic!("expected bracket") };
        assert_eq!(bracket.items, vec![BracketItem::Atom(BracketAtom::CharClass(PosixClass::Digit))]);
    }

    #[test]
    fn unterminated_bracket_is_literal() {
        let ast = Ast::parse("[abc").unwrap();
        assert_eq!(ast.atoms[0], Atom::Char('['));
    }

    #[test]
    fn leading_close_bracket_is_literal_member() {
        let ast = Ast::parse("[]a]").unwrap();
        let Atom::Bracket(bracket) = &ast.atoms[0] else { panic!("expected bracket") };
        assert_eq!(bracket.items, vec![BracketItem::Atom(BracketAtom::Char(']')), BracketItem::Atom(BracketAtom::Char('a'))]);
    }
}
