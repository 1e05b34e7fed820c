// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! `IFS` field splitting (`spec.md` §4.4/§4.6's `read`).
//!
//! One run of `IFS` whitespace is a single delimiter and is trimmed from
//! the start/end of the input; a non-whitespace `IFS` character is always
//! a delimiter on its own, even back-to-back with another one (so `a::b`
//! with `IFS=:` is three fields, the middle one empty).

/// Splits plain text on `ifs`, with no notion of quoting — used by the
/// `read` built-in, which reads raw bytes from a file descriptor.
pub fn split_fields(s: &str, ifs: &str) -> Vec<String> {
    split_annotated(&s.chars().map(|c| (c, false)).collect::<Vec<_>>(), ifs)
        .into_iter()
        .map(|(text, _)| text)
        .collect()
}

/// Splits a stream of `(char, quoted)` pairs on `ifs`, treating every
/// quoted character as ordinary text regardless of whether it matches
/// `ifs` (the quote-aware variant `crate::expand` needs). Each returned
/// field is paired with whether any of its source characters were
/// quoted — `crate::expand`'s documented simplification disables pathname
/// expansion for a field if any part of it was quoted, rather than
/// tracking literalness per character all the way into `posh-fnmatch`.
pub(crate) fn split_annotated(chars: &[(char, bool)], ifs: &str) -> Vec<(String, bool)> {
    if chars.is_empty() {
        return Vec::new();
    }
    if ifs.is_empty() {
        let any_quoted = chars.iter().any(|(_, q)| *q);
        return vec![(chars.iter().map(|(c, _)| c).collect(), any_quoted)];
    }
    let is_ws = |c: char| c.is_whitespace() && ifs.contains(c);
    let is_non_ws_ifs = |c: char| ifs.contains(c) && !c.is_whitespace();

    let mut i = 0;
    while i < chars.len() && !chars[i].1 && is_ws(chars[i].0) {
        i += 1;
    }

    let mut fields = Vec::new();
    let mut current = String::new();
    let mut current_quoted = false;
    let mut in_field = false;
    while i < chars.len() {
        let (c, quoted) = chars[i];
        if !quoted && is_ws(c) {
            if in_field {
                fields.push((std::mem::take(&mut current), current_quoted));
                current_quoted = false;
                in_field = false;
            }
            i += 1;
            while i < chars.len() && !chars[i].1 && is_ws(chars[i].0) {
                i += 1;
            }
        } else if !quoted && is_non_ws_ifs(c) {
            fields.push((std::mem::take(&mut current), current_quoted));
            current_quoted = false;
            in_field = false;
            i += 1;
            while i < chars.len() && !chars[i].1 && is_ws(chars[i].0) {
                i += 1;
            }
        } else {
            current.push(c);
            current_quoted |= quoted;
            in_field = true;
            i += 1;
        }
    }
    if in_field || !current.is_empty() {
        fields.push((current, current_quoted));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_whitespace_splitting_trims_ends() {
        assert_eq!(split_fields("  a  b c  ", " \t\n"), vec!["a", "b", "c"]);
    }

    #[test]
    fn non_whitespace_delimiter_produces_empty_field() {
        assert_eq!(split_fields("a::b", ":"), vec!["a", "", "b"]);
    }

    #[test]
    fn empty_ifs_disables_splitting() {
        assert_eq!(split_fields("a b c", ""), vec!["a b c"]);
    }

    #[test]
    fn quoted_characters_are_never_split_points() {
        let chars: Vec<(char, bool)> =
            "a b".chars().map(|c| (c, c == ' ')).collect();
        assert_eq!(split_annotated(&chars, " "), vec![("a b".to_string(), true)]);
    }
}
