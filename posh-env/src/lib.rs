// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The shell execution environment: variables, positional parameters,
//! options, functions, and the [`System`] abstraction over the OS.
//!
//! `posh-env` holds state; it has no notion of how a command tree is
//! walked (that is `posh-semantics`'s job) or how a word is expanded (that
//! is `posh-expand`'s). An [`Env`] bundles everything a running shell
//! needs to refer to in one place.

pub mod error;
pub mod function;
pub mod option;
pub mod system;
pub mod trap;
pub mod variable;

pub use error::ShellError;
pub use function::{Function, FunctionSet};
pub use option::{Option, OptionSet, State};
pub use system::real::RealSystem;
pub use system::virtual_system::VirtualSystem;
pub use system::System;
pub use trap::{Action, TrapSet};
pub use variable::{Scope, Variable, VariableSet};

use std::path::PathBuf;

/// Everything a running shell instance needs: variables, functions,
/// options, and a handle on the OS.
///
/// `Env` is generic over its [`System`] so that the same executor code
/// runs against `RealSystem` in `posh-cli` and `VirtualSystem` in tests.
#[derive(Debug)]
pub struct Env<S> {
    pub variables: VariableSet,
    pub functions: FunctionSet,
    pub options: OptionSet,
    pub system: S,
    /// The shell's own idea of the current directory, tracked logically so
    /// that `cd` can follow symbolic-link-preserving paths without calling
    /// `getcwd` on every lookup.
    pub pwd: PathBuf,
    /// Exit status of the most recently completed pipeline.
    pub exit_status: i32,
    /// `$0`: the name the shell was invoked as.
    pub shell_name: String,
    /// Count of lexically active `for`/`while`/`until` loop frames on the
    /// executor's call stack (`spec.md` §3's `loopCounter`), reset to zero
    /// across a function-call boundary so `break`/`continue` cannot escape
    /// the function that contains them. Read by the `break`/`continue`
    /// built-ins to clamp their argument to however many loops are
    /// actually active.
    pub loop_depth: u32,
    /// Count of function invocations and `.`-sourced scripts currently on
    /// the executor's call stack, so the `return` built-in can tell
    /// "inside a function or dot-script" (where `return` unwinds one
    /// frame) from "at the top level" (where `spec.md` §4.6 says `return`
    /// is an error) without a dedicated boolean per call site.
    pub call_depth: u32,
    /// Signal/`EXIT` trap handlers installed by the `trap` built-in.
    pub traps: crate::trap::TrapSet,
}

impl<S: System> Env<S> {
    pub fn new(system: S, shell_name: impl Into<String>) -> Self {
        let pwd = system.getcwd().unwrap_or_else(|_| PathBuf::from("."));
        Env {
            variables: VariableSet::new(),
            functions: FunctionSet::new(),
            options: OptionSet::default(),
            system,
            pwd,
            exit_status: 0,
            shell_name: shell_name.into(),
            loop_depth: 0,
            call_depth: 0,
            traps: trap::TrapSet::new(),
        }
    }

    /// Pushes a new variable overlay, returning a guard that pops it when
    /// dropped (see [`VariableSet::push_context`]).
    pub fn push_variable_context(&mut self) -> variable::ContextGuard<'_> {
        self.variables.push_context()
    }
}
