// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! Non-local control flow, grounded on the reference shell's
//! `yash_env::semantics::Divert`/`Result` (`examples/magicant-yash-rs`'s
//! `yash-env/src/semantics.rs`), but rendered as the tagged return value
//! `spec.md` §9's first Design Note names as the language-neutral
//! strategy, rather than as process-local mutable globals.
//!
//! The reference shell distinguishes `Interrupt`/`Exit`/`Abort` so its
//! async executor can tell a signal-interrupted unwind from a deliberate
//! `exit` from one triggered by an unrecoverable system-call failure. This
//! crate's executor is synchronous and has no interactive-trap-reentrancy
//! distinction to preserve, so all three collapse into one `Exit` variant
//! (see DESIGN.md).

use std::ops::ControlFlow;

/// A reason execution is unwinding past the point that would otherwise
/// continue to the next command, per `spec.md` §9's
/// `Unwind ∈ { Break(n), Continue(n), Return(status), Exit(status) }`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Unwind {
    /// `break n`: unwind out of `n` enclosing loops (clamped to however
    /// many are actually on the Rust call stack).
    Break(u32),
    /// `continue n`: unwind out of `n - 1` enclosing loops and restart the
    /// condition/step of the `n`th.
    Continue(u32),
    /// `return n`: unwind out of the innermost function or dot-script.
    Return(i32),
    /// `exit n`: unwind all the way to the top-level loop.
    Exit(i32),
}

/// `Result<ExitStatus, Unwind>` per `spec.md` §9: `Continue(status)` is an
/// ordinary completed command, `Break(unwind)` is a non-local exit in
/// progress that every level up the call stack inspects and either
/// consumes (loops consume `Break`/`Continue` at their own depth) or
/// re-emits (everything else just propagates it outward).
pub type ExecResult<T = i32> = ControlFlow<Unwind, T>;

/// Collapses an [`ExecResult`] to a plain exit status, the way a process
/// boundary (a forked pipeline command, a subshell, the shell itself at
/// `exit`) must: `Break`/`Continue` escaping all the way to a process
/// boundary without an enclosing loop to consume them is a no-op rather
/// than a panic, matching real shells' tolerance of a stray `break` at
/// the top level of a script.
pub fn unwind_status(result: ExecResult) -> i32 {
    match result {
        ControlFlow::Continue(status) => status,
        ControlFlow::Break(Unwind::Exit(status) | Unwind::Return(status)) => status,
        ControlFlow::Break(Unwind::Break(_) | Unwind::Continue(_)) => 0,
    }
}

/// Maps a reaped child's [`std::process::ExitStatus`] onto the `128+N`
/// convention `spec.md` §6 specifies for death by signal.
pub fn exit_status_code(status: std::process::ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    status.code().unwrap_or(127)
}
