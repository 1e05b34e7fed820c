// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! Shared usage-error reporting, grounded on the reference shell's
//! `yash-builtin::common` module but collapsed to this crate's synchronous,
//! non-diagnostic-annotated style: a built-in usage error is a single
//! `name: message` line on stderr plus a status code, nothing more.
//!
//! `spec.md` §7: "Built-in usage errors: `warnx`-style message to stderr,
//! status 1 (2 for `read`); for special built-ins, a non-interactive shell
//! treats a usage error as fatal." That last clause is `posh-cli`'s
//! responsibility (it decides what "fatal" means for the top-level loop);
//! this module only produces the message and the ordinary exit status.

use posh_env::{Env, System};
use posh_semantics::{ExecResult, Unwind};
use std::ops::ControlFlow;

/// Prints a `warnx`-style usage error and returns status 1.
pub fn usage_error(name: &str, message: impl std::fmt::Display) -> ExecResult {
    eprintln!("{name}: {message}");
    ControlFlow::Continue(1)
}

/// Like [`usage_error`], but for a special built-in: `spec.md` §7 makes a
/// special built-in's usage error fatal for a non-interactive shell, so
/// this unwinds all the way out (as if `exit 1` had been called) unless
/// the shell is interactive, in which case it behaves like an ordinary
/// usage error instead.
pub fn special_usage_error<S: System>(env: &Env<S>, name: &str, message: impl std::fmt::Display) -> ExecResult {
    eprintln!("{name}: {message}");
    if env.options.is_on(posh_env::Option::Interactive) {
        ControlFlow::Continue(1)
    } else {
        ControlFlow::Break(Unwind::Exit(1))
    }
}

/// Like [`usage_error`] but with the `read` built-in's status 2.
pub fn usage_error_2(name: &str, message: impl std::fmt::Display) -> ExecResult {
    eprintln!("{name}: {message}");
    ControlFlow::Continue(2)
}

/// Prints an ordinary (non-usage) failure and returns status 1.
pub fn failure(name: &str, message: impl std::fmt::Display) -> ExecResult {
    eprintln!("{name}: {message}");
    ControlFlow::Continue(1)
}
