// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! Errors surfaced by [`System`](crate::system::System) calls, unified so
//! the executor can map them onto `spec.md` §6/§7's exit-status rules
//! without matching on raw [`std::io::ErrorKind`] everywhere.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// An OS-facing operation failed.
#[derive(Debug, Error)]
#[error("{operation}: {source}")]
pub struct ShellError {
    pub operation: Operation,
    #[source]
    pub source: std::io::Error,
}

impl ShellError {
    pub fn new(operation: Operation, source: std::io::Error) -> Self {
        ShellError { operation, source }
    }

    /// True when the underlying error is `ENOEXEC`, the signal that a
    /// script without a shebang was handed to `execve` and should be
    /// re-interpreted as shell input (`spec.md` §4.5's "non-local exit
    /// paths").
    pub fn is_enoexec(&self) -> bool {
        self.source.raw_os_error() == Some(libc::ENOEXEC)
    }
}

/// What the shell was trying to do when a [`ShellError`] occurred.
#[derive(Debug)]
pub enum Operation {
    Open(PathBuf),
    Exec(PathBuf),
    Fork,
    Pipe,
    Dup2,
    Chdir(PathBuf),
    GetCwd,
    Wait,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Open(path) => write!(f, "cannot open {}", path.display()),
            Operation::Exec(path) => write!(f, "cannot execute {}", path.display()),
            Operation::Fork => write!(f, "cannot fork"),
            Operation::Pipe => write!(f, "cannot create pipe"),
            Operation::Dup2 => write!(f, "cannot duplicate file descriptor"),
            Operation::Chdir(path) => write!(f, "cannot change directory to {}", path.display()),
            Operation::GetCwd => write!(f, "cannot determine current directory"),
            Operation::Wait => write!(f, "cannot wait for child process"),
        }
    }
}
