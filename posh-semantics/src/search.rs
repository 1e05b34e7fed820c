// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! Command search (`spec.md` §4.5's `executeSimpleCommand` step 4 and
//! §4.6's built-in priority table), grounded on the reference shell's
//! `yash-semantics/src/command_search.rs`.
//!
//! Priority order, for a name with no `/`:
//! 1. special built-ins
//! 2. functions
//! 3. regular built-ins
//! 4. external utilities found on `$PATH`
//!
//! A name containing a `/` is always an external utility, regardless of
//! whether a file actually exists there yet (resolution failure surfaces
//! later, as ENOENT/126/127 per `spec.md` §6).

use std::path::{Path, PathBuf};

use posh_env::{Env, Function, System};

use crate::builtins::Builtins;

/// What a name resolved to, for `execute_simple_command` to dispatch on.
pub enum Target {
    SpecialBuiltin,
    RegularBuiltin,
    Function(Function),
    External { path: PathBuf },
}

/// Standard search path used when `$PATH` is unset, and by `command -p`
/// (`spec.md` §6). `confstr(_CS_PATH)` isn't portably exposed without an
/// extra FFI surface for a single constant, so this crate uses the POSIX
/// fallback value directly.
pub const STANDARD_PATH: &str = "/bin:/usr/bin";

pub fn search<S: System>(env: &Env<S>, builtins: &dyn Builtins<S>, name: &str) -> Option<Target> {
    if name.contains('/') {
        return Some(Target::External { path: PathBuf::from(name) });
    }

    if let Some(info) = builtins.find(name) {
        if info.special {
            return Some(Target::SpecialBuiltin);
        }
    }

    if let Some(function) = env.functions.get(name) {
        return Some(Target::Function(function.clone()));
    }

    if let Some(info) = builtins.find(name) {
        if !info.special {
            return Some(Target::RegularBuiltin);
        }
    }

    search_path(env, name).map(|path| Target::External { path })
}

/// Resolves `name` against `$PATH` (or [`STANDARD_PATH`] if unset), the
/// way `command -p` and ordinary external-utility search both need to,
/// differing only in which path list they search.
pub fn search_path<S: System>(env: &Env<S>, name: &str) -> Option<PathBuf> {
    let path = env.variables.get("PATH").and_then(|v| v.value.clone()).unwrap_or_default();
    search_in(&path, name, &env.pwd)
}

pub fn search_standard_path(name: &str, cwd: &Path) -> Option<PathBuf> {
    search_in(STANDARD_PATH, name, cwd)
}

fn search_in(path_var: &str, name: &str, cwd: &Path) -> Option<PathBuf> {
    for dir in path_var.split(':') {
        let dir = if dir.is_empty() { "." } else { dir };
        let candidate = if Path::new(dir).is_absolute() { PathBuf::from(dir).join(name) } else { cwd.join(dir).join(name) };
        if is_executable_file(&candidate) {
            return Some(PathBuf::from(dir).join(name));
        }
    }
    None
}

fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match std::fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}
