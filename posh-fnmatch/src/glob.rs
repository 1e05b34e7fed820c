// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! Pathname expansion (`spec.md` §4.4's "glob(7)-style pathname
//! expansion").
//!
//! Grounded on the reference shell's own glob module doc: only path
//! components that actually contain a pattern character are scanned with
//! a directory read; a component with no `*`/`?`/`[` is checked for
//! existence instead (cheaper, and doesn't require read permission on
//! its parent). Matches are returned sorted alphabetically. A component
//! beginning with `.` is only matched by a pattern that itself begins
//! with a literal `.`, matching traditional glob behavior of hiding
//! dotfiles from an unqualified `*`.
//!
//! Unlike the reference shell, which reads directories through its own
//! `System` abstraction so tests can run against a simulated filesystem,
//! this crate reads the real filesystem directly via `std::fs`:
//! `posh-fnmatch` has no dependency on `posh-env`, and pathname expansion
//! is always answered against whatever filesystem the process actually
//! sees (see DESIGN.md).

use crate::ast::Ast;
use crate::regex;
use std::path::{Path, PathBuf};

struct Component {
    text: String,
    has_pattern: bool,
}

fn is_pattern_char(c: char) -> bool {
    matches!(c, '*' | '?' | '[')
}

fn split_components(pattern: &str) -> (bool, Vec<Component>) {
    let absolute = pattern.starts_with('/');
    let components = pattern
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| Component { text: s.to_string(), has_pattern: s.chars().any(is_pattern_char) })
        .collect();
    (absolute, components)
}

/// Expands `pattern` against `cwd` (used to resolve a relative pattern
/// and as the scan root). Returns the matching pathnames, sorted
/// alphabetically. If nothing matches, returns `pattern` unchanged — the
/// conventional glob(7) fallback, so `echo *.nonexistent` still prints
/// the literal text rather than nothing.
pub fn expand_pathnames(pattern: &str, cwd: &Path) -> Vec<String> {
    let (absolute, components) = split_components(pattern);
    if components.is_empty() {
        return vec![pattern.to_string()];
    }
    let root = if absolute { PathBuf::from("/") } else { cwd.to_path_buf() };
    let prefix = if absolute { "/" } else { "" };
    let mut results = walk(&root, &components, 0, prefix);
    if results.is_empty() {
        return vec![pattern.to_string()];
    }
    results.sort();
    results
}

fn walk(dir: &Path, components: &[Component], index: usize, accumulated: &str) -> Vec<String> {
    let Some(component) = components.get(index) else {
        return Vec::new();
    };
    let is_last = index + 1 == components.len();
    let mut matches = Vec::new();

    if !component.has_pattern {
        let candidate_path = dir.join(&component.text);
        if !candidate_path.exists() && !candidate_path.is_symlink() {
            return matches;
        }
        let next = join_component(accumulated, &component.text);
        if is_last {
            matches.push(next);
        } else {
            matches.extend(walk(&candidate_path, components, index + 1, &next));
        }
        return matches;
    }

    let Ok(entries) = std::fs::read_dir(dir) else {
        return matches;
    };
    let ast = match Ast::parse(&component.text) {
        Ok(ast) => ast,
        Err(_) => return matches,
    };
    let regex = regex::to_regex(&ast, true);
    let allow_leading_dot = component.text.starts_with('.');

    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with('.') && !allow_leading_dot {
            continue;
        }
        if !regex.is_match(name) {
            continue;
        }
        let next = join_component(accumulated, name);
        if is_last {
            matches.push(next);
        } else {
            let child_path = dir.join(name);
            if child_path.is_dir() {
                matches.extend(walk(&child_path, components, index + 1, &next));
            }
        }
    }
    matches
}

fn join_component(accumulated: &str, component: &str) -> String {
    if accumulated.is_empty() {
        component.to_string()
    } else if accumulated.ends_with('/') {
        format!("{accumulated}{component}")
    } else {
        format!("{accumulated}/{component}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("apple.txt"), "").unwrap();
        fs::write(dir.path().join("avocado.txt"), "").unwrap();
        fs::write(dir.path().join("banana.txt"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("inner.txt"), "").unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        dir
    }

    #[test]
    fn expands_single_component_glob() {
        let dir = make_tree();
        let mut results = expand_pathnames("a*.txt", dir.path());
        results.sort();
        assert_eq!(results, vec!["apple.txt", "avocado.txt"]);
    }

    #[test]
    fn hides_dotfiles_from_unqualified_star() {
        let dir = make_tree();
        let results = expand_pathnames("*", dir.path());
        assert!(!results.iter().any(|r| r == ".hidden"));
    }

    #[test]
    fn explicit_leading_dot_matches_dotfiles() {
        let dir = make_tree();
        let results = expand_pathnames(".*", dir.path());
        assert_eq!(results, vec![".hidden"]);
    }

    #[test]
    fn glob_does_not_cross_directory_boundary() {
        let dir = make_tree();
        let results = expand_pathnames("*/*.txt", dir.path());
        assert_eq!(results, vec!["sub/inner.txt"]);
    }

    #[test]
    fn no_match_falls_back_to_literal_pattern() {
        let dir = make_tree();
        let results = expand_pathnames("*.nonexistent", dir.path());
        assert_eq!(results, vec!["*.nonexistent"]);
    }
}
