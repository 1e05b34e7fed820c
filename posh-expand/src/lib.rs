// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! Word expansion: tilde, parameter, command, and arithmetic-literal
//! expansion, followed by field splitting, quote removal, and pathname
//! expansion, matching `spec.md` §4.4's `expand_word`/`expand` contract.
//!
//! Command substitution needs to run the executor, which lives in
//! `posh-semantics` and itself depends on this crate for word expansion.
//! [`CommandSubstituter`] breaks that cycle: this crate only depends on a
//! trait object that `posh-semantics` implements, never on the crate
//! itself.

mod error;
mod ifs;
mod param;
mod scan;

pub use error::ExpandError;

use bitflags::bitflags;
use posh_env::{Env, System};
use posh_syntax::ast::Word;

bitflags! {
    /// Which of the optional later expansion stages to apply, mirroring
    /// `spec.md` §4.4's `expand(w, flags)`.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct ExpandFlags: u8 {
        /// Run pathname expansion on fields with no quoted characters.
        const PATHNAMES = 0b001;
        /// Skip quote removal (used for `case` patterns, which keep their
        /// quoting information for `posh-fnmatch` to treat literally).
        /// Unquoted here-document bodies need a different rule entirely
        /// (no `'`/`"` quoting at all, only `$`/backquote substitution and
        /// a restricted backslash escape set) and go through
        /// [`expand_heredoc_body`] instead of this flag.
        const NO_QUOTES = 0b010;
        /// Skip `IFS` field splitting (used for assignment right-hand
        /// sides and `case` words, which are always a single field).
        const NO_FIELD_SPLIT = 0b100;
    }
}

/// Runs a shell command and returns its standard output, trimmed of
/// trailing newlines, for `$(...)` and `` `...` ``. Implemented by
/// `posh-semantics`, which owns the real executor.
///
/// `env` is threaded through as an ordinary parameter (a fresh reborrow on
/// every call) rather than captured by the implementor at construction
/// time — the latter would leave the implementing struct holding its own
/// `&mut Env<S>` for as long as it's alive, which conflicts with the
/// `env: &mut Env<S>` this crate's own `expand`/`expand_word` already hold
/// for the whole scan. Taking it as a call parameter keeps every borrow a
/// short-lived reborrow instead.
pub trait CommandSubstituter<S: System> {
    fn substitute(&mut self, env: &mut Env<S>, command_text: &str) -> String;
}

/// Expands `word` to a single string: quote removal and parameter/command
/// substitution, but no field splitting or pathname expansion. Used for
/// assignment values, `case` subject/patterns, and redirection operands
/// (`spec.md` §4.4).
pub fn expand_word<S: System>(
    word: &Word,
    env: &mut Env<S>,
    subst: &mut dyn CommandSubstituter<S>,
) -> Result<String, ExpandError> {
    let prefix_len = tilde_prefix_len(&word.text);
    let prefix = expand_tilde(&word.text[..prefix_len], env);
    let rest = scan::expand_text(&word.text[prefix_len..], env, subst)?;
    Ok(prefix + &rest)
}

/// Full expansion of `word` into zero or more fields: parameter/command
/// substitution, field splitting on `$IFS`, quote removal, and (if
/// `ExpandFlags::PATHNAMES` is set and `noglob` is off) pathname
/// expansion.
///
/// `$@`/`${@}`/`"$@"`/`"${@}"` occurring as the word's entire text is
/// special-cased to return one field per positional parameter directly
/// (quoted or not — POSIX gives `"$@"` this same one-field-per-parameter
/// split); any other occurrence (embedded in a longer word) falls back to
/// `$*`-style space-joining, a documented simplification of full POSIX
/// field semantics for `$@` embedded alongside other text.
pub fn expand<S: System>(
    word: &Word,
    env: &mut Env<S>,
    subst: &mut dyn CommandSubstituter<S>,
    flags: ExpandFlags,
) -> Result<Vec<String>, ExpandError> {
    if !flags.contains(ExpandFlags::NO_FIELD_SPLIT) && is_whole_word_positional(&word.text) {
        return Ok(param::positional_fields(env));
    }

    let prefix_len = tilde_prefix_len(&word.text);
    let tilde = expand_tilde(&word.text[..prefix_len], env);
    let segments = scan::scan(&word.text[prefix_len..], env, subst)?;

    let fields: Vec<(String, bool)> = if flags.contains(ExpandFlags::NO_FIELD_SPLIT) {
        let text: String = segments.iter().map(|s| s.text.as_str()).collect();
        let quoted = segments.iter().any(|s| s.quoted);
        vec![(text, quoted)]
    } else {
        let ifs = env
            .variables
            .get("IFS")
            .and_then(|v| v.value.clone())
            .unwrap_or_else(|| " \t\n".to_string());
        let annotated: Vec<(char, bool)> =
            segments.iter().flat_map(|s| s.text.chars().map(move |c| (c, s.quoted))).collect();
        ifs::split_annotated(&annotated, &ifs)
    };

    let noglob = env.options.is_on(posh_env::Option::NoGlob);
    let mut out = Vec::new();
    for (i, (field, quoted)) in fields.into_iter().enumerate() {
        let field = if i == 0 { tilde.clone() + &field } else { field };
        if flags.contains(ExpandFlags::PATHNAMES) && !noglob && !quoted && is_pattern(&field) {
            out.extend(posh_fnmatch::expand_pathnames(&field, &env.pwd));
        } else {
            out.push(field);
        }
    }
    Ok(out)
}

fn is_pattern(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

/// Expands an unquoted here-document body: `$`/backquote substitution and
/// line-continuation, with no field splitting, pathname expansion, or
/// `'`/`"` quote interpretation (`spec.md` §4.4/§6). A here-document whose
/// delimiter was quoted at parse time (`HereDocQuoted`) skips this entirely
/// and is used byte-for-byte instead.
pub fn expand_heredoc_body<S: System>(
    text: &str,
    env: &mut Env<S>,
    subst: &mut dyn CommandSubstituter<S>,
) -> Result<String, ExpandError> {
    scan::scan_heredoc(text, env, subst)
}

/// True if `text` is, in its entirety, `$@`/`${@}`, quoted or not — the
/// one case this crate gives true one-field-per-positional-parameter
/// semantics rather than space-joining (see [`expand`]'s doc comment).
fn is_whole_word_positional(text: &str) -> bool {
    matches!(text, "$@" | "${@}" | "\"$@\"" | "\"${@}\"")
}

/// Length of a leading `~`, `~+`, or `~-` token that should undergo tilde
/// expansion — only recognized unquoted at the very start of the word, up
/// to (not including) the first `/` or the end of the word (`spec.md`
/// §4.4 scopes tilde expansion down to the login/`PWD`/`OLDPWD` forms,
/// dropping `~user`).
fn tilde_prefix_len(text: &str) -> usize {
    if !text.starts_with('~') {
        return 0;
    }
    let rest = &text[1..];
    match rest.chars().next() {
        None => 1,
        Some('/') => 1,
        Some('+') | Some('-') => {
            let n = 1 + rest.chars().next().unwrap().len_utf8();
            match text[n..].chars().next() {
                None | Some('/') => n,
                _ => 0,
            }
        }
        _ => 0,
    }
}

fn expand_tilde<S: System>(prefix: &str, env: &Env<S>) -> String {
    match prefix {
        "" => String::new(),
        "~" => env.variables.get("HOME").and_then(|v| v.value.clone()).unwrap_or_default(),
        "~+" => env.pwd.to_string_lossy().into_owned(),
        "~-" => env
            .variables
            .get("OLDPWD")
            .and_then(|v| v.value.clone())
            .unwrap_or_else(|| env.pwd.to_string_lossy().into_owned()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posh_env::VirtualSystem;
    use posh_syntax::ast::Location;

    struct NoSubst;
    impl CommandSubstituter<VirtualSystem> for NoSubst {
        fn substitute(&mut self, _env: &mut Env<VirtualSystem>, _command_text: &str) -> String {
            String::new()
        }
    }

    struct StubSubst(String);
    impl CommandSubstituter<VirtualSystem> for StubSubst {
        fn substitute(&mut self, _env: &mut Env<VirtualSystem>, _command_text: &str) -> String {
            self.0.clone()
        }
    }

    fn word(text: &str) -> Word {
        Word { text: text.to_string(), location: Location::dummy() }
    }

    fn env() -> Env<VirtualSystem> {
        Env::new(VirtualSystem::default(), "posh")
    }

    #[test]
    fn expand_word_removes_quotes() {
        let mut env = env();
        let mut subst = NoSubst;
        let got = expand_word(&word("a\"b c\"d"), &mut env, &mut subst).unwrap();
        assert_eq!(got, "ab cd");
    }

    #[test]
    fn expand_splits_on_ifs_and_skips_quoted_spaces() {
        let mut env = env();
        let mut subst = NoSubst;
        let got = expand(&word("foo \"bar baz\""), &mut env, &mut subst, ExpandFlags::empty()).unwrap();
        assert_eq!(got, vec!["foo", "bar baz"]);
    }

    #[test]
    fn use_default_modifier_substitutes_when_unset() {
        let mut env = env();
        let mut subst = NoSubst;
        let got = expand_word(&word("${missing:-fallback}"), &mut env, &mut subst).unwrap();
        assert_eq!(got, "fallback");
    }

    #[test]
    fn use_default_modifier_keeps_set_value() {
        let mut env = env();
        env.variables
            .get_or_new("name".to_string(), posh_env::Scope::Global)
            .assign("set".to_string(), None)
            .unwrap();
        let mut subst = NoSubst;
        let got = expand_word(&word("${name:-fallback}"), &mut env, &mut subst).unwrap();
        assert_eq!(got, "set");
    }

    #[test]
    fn assign_default_modifier_sets_the_variable() {
        let mut env = env();
        let mut subst = NoSubst;
        expand_word(&word("${name:=value}"), &mut env, &mut subst).unwrap();
        assert_eq!(env.variables.get("name").and_then(|v| v.value.clone()).as_deref(), Some("value"));
    }

    #[test]
    fn assign_default_modifier_survives_an_overlay_popping() {
        let mut env = env();
        let mut subst = NoSubst;
        // The assignment must land in the global scope, not whatever overlay
        // happens to be on top, so it survives the overlay's own pop.
        env.variables.push_bare_context();
        expand_word(&word("${name:=value}"), &mut env, &mut subst).unwrap();
        env.variables.pop_context();
        assert_eq!(env.variables.get("name").and_then(|v| v.value.clone()).as_deref(), Some("value"));
    }

    #[test]
    fn error_modifier_fails_when_unset() {
        let mut env = env();
        let mut subst = NoSubst;
        let err = expand_word(&word("${missing:?must be set}"), &mut env, &mut subst).unwrap_err();
        assert_eq!(err, ExpandError::BadSubstitution { name: "missing".to_string(), message: "must be set".to_string() });
    }

    #[test]
    fn use_alternate_modifier_is_empty_when_unset() {
        let mut env = env();
        let mut subst = NoSubst;
        let got = expand_word(&word("${missing:+shown}"), &mut env, &mut subst).unwrap();
        assert_eq!(got, "");
    }

    #[test]
    fn nounset_errors_on_unset_bare_parameter() {
        let mut env = env();
        env.options.set(posh_env::Option::NoUnset, posh_env::State::On);
        let mut subst = NoSubst;
        let err = expand_word(&word("$missing"), &mut env, &mut subst).unwrap_err();
        assert_eq!(err, ExpandError::UnsetParameter { name: "missing".to_string() });
    }

    #[test]
    fn command_substitution_runs_through_the_trait() {
        let mut env = env();
        let mut subst = StubSubst("hello\n\n".to_string());
        let got = expand_word(&word("$(echo hello)"), &mut env, &mut subst).unwrap();
        assert_eq!(got, "hello");
    }

    #[test]
    fn arithmetic_expansion_is_left_literal() {
        let mut env = env();
        let mut subst = NoSubst;
        let got = expand_word(&word("$((1 + 2))"), &mut env, &mut subst).unwrap();
        assert_eq!(got, "$((1 + 2))");
    }

    #[test]
    fn tilde_expands_home_at_word_start_only() {
        let mut env = env();
        env.variables
            .get_or_new("HOME".to_string(), posh_env::Scope::Global)
            .assign("/home/u".to_string(), None)
            .unwrap();
        let mut subst = NoSubst;
        let got = expand_word(&word("~/bin"), &mut env, &mut subst).unwrap();
        assert_eq!(got, "/home/u/bin");
        let got = expand_word(&word("a~"), &mut env, &mut subst).unwrap();
        assert_eq!(got, "a~");
    }

    #[test]
    fn whole_word_at_sign_yields_one_field_per_positional_param() {
        let mut env = env();
        env.variables.set_positional_params(vec!["a b".to_string(), "c".to_string()]);
        let mut subst = NoSubst;
        let got = expand(&word("$@"), &mut env, &mut subst, ExpandFlags::empty()).unwrap();
        assert_eq!(got, vec!["a b", "c"]);
    }

    #[test]
    fn quoted_at_sign_also_yields_one_field_per_positional_param() {
        let mut env = env();
        env.variables.set_positional_params(vec!["a b".to_string(), "c".to_string()]);
        let mut subst = NoSubst;
        let got = expand(&word("\"$@\""), &mut env, &mut subst, ExpandFlags::empty()).unwrap();
        assert_eq!(got, vec!["a b", "c"]);
    }

    #[test]
    fn pathname_expansion_is_gated_by_flag_and_quoting() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::File::create(dir.path().join("a.txt")).unwrap();
        let mut env = env();
        env.pwd = dir.path().to_path_buf();
        let mut subst = NoSubst;

        let got = expand(&word("*.txt"), &mut env, &mut subst, ExpandFlags::PATHNAMES).unwrap();
        assert_eq!(got, vec!["a.txt"]);

        let got = expand(&word("\"*.txt\""), &mut env, &mut subst, ExpandFlags::PATHNAMES).unwrap();
        assert_eq!(got, vec!["*.txt"]);

        let got = expand(&word("*.txt"), &mut env, &mut subst, ExpandFlags::empty()).unwrap();
        assert_eq!(got, vec!["*.txt"]);
    }
}
