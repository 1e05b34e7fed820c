// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The OS-facing seam between the shell and the outside world.
//!
//! `spec.md` §4.3 calls for "`System` trait abstracting OS calls"; this
//! module declares it and its two implementations: [`real::RealSystem`]
//! (a thin wrapper over `nix`/`libc`, used by `posh-cli`) and
//! [`virtual_system::VirtualSystem`] (an in-memory stand-in used by this
//! workspace's own test suites).
//!
//! Unlike the reference shell, which splits this seam into two dozen
//! single-method sub-traits composed back together (so that async
//! scheduling code can require only the handful it needs), `System` here
//! is one trait: this crate has exactly two implementors and no
//! cooperative scheduler picking among partial capabilities, so the extra
//! indirection buys nothing (see DESIGN.md).

pub mod real;
pub mod virtual_system;

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

/// A raw file descriptor, newtyped so redirection code can't mix it up
/// with an arbitrary `i32`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Fd(pub i32);

impl Fd {
    pub const STDIN: Fd = Fd(0);
    pub const STDOUT: Fd = Fd(1);
    pub const STDERR: Fd = Fd(2);
}

/// How an `open` call should create/truncate its target, covering every
/// case `spec.md` §4.5's redirection table names.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OpenMode {
    /// `<`: read-only, must already exist.
    ReadOnly,
    /// `>`: write-only, create if missing, truncate if it exists.
    WriteTruncate,
    /// `>` with `noclobber` on: write-only, create if missing, fail with
    /// `EEXIST` if an existing regular file would otherwise be truncated.
    WriteNoClobber,
    /// `>|`: write-only, create if missing, truncate unconditionally.
    WriteClobber,
    /// `>>`: write-only, create if missing, append.
    Append,
    /// `<>`: read-write, create if missing.
    ReadWrite,
}

/// Outcome of [`System::fork`].
#[derive(Debug)]
pub enum ForkResult {
    Parent { child: i32 },
    Child,
}

/// The OS-facing interface `posh-semantics` and `posh-builtin` program
/// against, never the real syscalls directly.
pub trait System {
    fn fork(&mut self) -> std::io::Result<ForkResult>;

    /// Replaces the current process image. On success this never returns;
    /// on failure (including `ENOEXEC`, which the caller may choose to
    /// handle by re-parsing the file as shell input) it returns the error.
    fn execve(&mut self, path: &Path, args: &[String], envp: &[String]) -> std::io::Result<std::convert::Infallible>;

    fn waitpid(&mut self, pid: i32) -> std::io::Result<ExitStatus>;

    fn pipe(&mut self) -> std::io::Result<(Fd, Fd)>;

    fn dup2(&mut self, from: Fd, to: Fd) -> std::io::Result<Fd>;

    fn close(&mut self, fd: Fd) -> std::io::Result<()>;

    fn open(&mut self, path: &Path, mode: OpenMode) -> std::io::Result<Fd>;

    fn read(&mut self, fd: Fd, buf: &mut [u8]) -> std::io::Result<usize>;

    fn write(&mut self, fd: Fd, buf: &[u8]) -> std::io::Result<usize>;

    fn chdir(&mut self, path: &Path) -> std::io::Result<()>;

    fn getcwd(&self) -> std::io::Result<PathBuf>;

    fn isatty(&self, fd: Fd) -> bool;

    /// Sets the file-creation mask, returning the previous value.
    fn umask(&mut self, mask: u32) -> u32;

    fn getpid(&self) -> i32;

    /// Terminates the current process immediately (`_exit`, not `exit`:
    /// no `atexit` handlers, no buffer flushing), used by the here-document
    /// feeder child and by a forked pipeline command after it completes
    /// (`spec.md` §4.5).
    fn exit_process(&mut self, status: i32) -> std::convert::Infallible;
}
