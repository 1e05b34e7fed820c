// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The `cd [dir]` built-in (`spec.md` §4.6), grounded on the reference
//! shell's `yash-builtin::cd` module but collapsed to the one resolution
//! rule `spec.md` actually specifies: no `CDPATH` search, no `-L`/`-P`
//! switch, just a logical target resolved against the shell's own idea of
//! the current directory and canonicalized by collapsing `.`/`..`
//! components textually (never touching the filesystem, so a symbolic
//! link component is preserved rather than resolved).

use std::path::{Component, Path, PathBuf};

use posh_env::{Env, Scope, System};
use posh_semantics::ExecResult;

use crate::common::failure;

pub fn run<S: System>(env: &mut Env<S>, args: Vec<String>) -> ExecResult {
    if args.len() > 2 {
        return failure("cd", "too many operands");
    }
    let target = match args.get(1) {
        Some(dir) => dir.clone(),
        None => match env.variables.get("HOME").and_then(|v| v.value.clone()) {
            Some(home) => home,
            None => return failure("cd", "HOME not set"),
        },
    };

    let new_logical_pwd = canonicalize(&env.pwd, Path::new(&target));

    if let Err(e) = env.system.chdir(&new_logical_pwd) {
        return failure("cd", format!("{target}: {e}"));
    }

    let old_pwd = env.pwd.to_string_lossy().into_owned();
    env.pwd = new_logical_pwd.clone();
    let _ = env.variables.get_or_new("OLDPWD".to_string(), Scope::Global).assign(old_pwd, None);
    let _ = env
        .variables
        .get_or_new("PWD".to_string(), Scope::Global)
        .assign(new_logical_pwd.to_string_lossy().into_owned(), None);
    std::ops::ControlFlow::Continue(0)
}

/// Resolves `target` against `base` (the shell's logical `$PWD`),
/// collapsing `.` and `..` components purely textually. A leading `..`
/// that would walk above the root is dropped rather than erroring, matching
/// ordinary path-canonicalization tools' tolerance of it.
fn canonicalize(base: &Path, target: &Path) -> PathBuf {
    let joined = if target.is_absolute() { target.to_path_buf() } else { base.join(target) };
    let mut out = PathBuf::from("/");
    for component in joined.components() {
        match component {
            Component::RootDir | Component::Prefix(_) => {}
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use posh_env::VirtualSystem;

    #[test]
    fn relative_target_resolves_against_pwd() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        env.pwd = PathBuf::from("/home/user");
        let result = run(&mut env, vec!["cd".to_string(), "project".to_string()]);
        assert_eq!(result, std::ops::ControlFlow::Continue(0));
        assert_eq!(env.pwd, PathBuf::from("/home/user/project"));
        assert_eq!(env.variables.get("PWD").unwrap().value.as_deref(), Some("/home/user/project"));
        assert_eq!(env.variables.get("OLDPWD").unwrap().value.as_deref(), Some("/home/user"));
    }

    #[test]
    fn dot_dot_walks_up_without_touching_the_filesystem() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        env.pwd = PathBuf::from("/a/b/c");
        run(&mut env, vec!["cd".to_string(), "../../d".to_string()]);
        assert_eq!(env.pwd, PathBuf::from("/a/d"));
    }

    #[test]
    fn missing_home_is_an_error_with_no_argument() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        let result = run(&mut env, vec!["cd".to_string()]);
        assert_eq!(result, std::ops::ControlFlow::Continue(1));
    }
}
