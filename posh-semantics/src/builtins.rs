// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The seam between this crate (which drives command execution) and
//! `posh-builtin` (which implements the 17 entries in `spec.md` §4.6's
//! table). `posh-builtin` depends on `posh-semantics` to get at the
//! executor for `.`/`eval`/`exec`'s script-restart case, so a direct
//! `posh-semantics -> posh-builtin` dependency would be circular; this
//! trait is the same inversion [`posh_expand::CommandSubstituter`] uses
//! for the expander/executor cycle (see DESIGN.md).

use posh_env::{Env, System};

use crate::result::ExecResult;

/// What the command search (`spec.md` §4.6's priority table) needs to know
/// about a built-in once its name has matched.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BuiltinInfo {
    /// A special built-in's assignment prefix is permanent, and a syntax or
    /// usage error in one is fatal for a non-interactive shell
    /// (`spec.md` §4.6's "Special vs regular" note).
    pub special: bool,
}

/// Implemented by `posh-builtin`'s registry; injected into the executor as
/// a trait object so `posh-semantics` never names `posh-builtin` itself.
pub trait Builtins<S: System> {
    /// Looks up a built-in by name without running it, for command search.
    fn find(&self, name: &str) -> Option<BuiltinInfo>;

    /// Runs the named built-in. `args` is the simple command's words after
    /// expansion, with `args[0]` equal to `name` (matching a utility's own
    /// `argv[0]`, as external utilities see it).
    ///
    /// Returns `Continue(status)` for an ordinary completion, or
    /// `Break(Unwind::...)` for `break`/`continue`/`return`/`exit`, which
    /// the caller (`crate::simple_command::execute_simple_command`)
    /// propagates outward untouched.
    fn run(&mut self, name: &str, env: &mut Env<S>, args: Vec<String>) -> ExecResult;
}
