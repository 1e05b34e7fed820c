// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! [`RealSystem`]: the `System` implementation backed by actual syscalls,
//! via `nix` and `libc`.

use super::{Fd, ForkResult, OpenMode, System};
use std::convert::Infallible;
use std::ffi::CString;
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

/// `System` implemented against the real operating system.
///
/// The caller must not construct more than one `RealSystem` per process:
/// `fork` relies on there being a single owner of the process's file
/// descriptor table.
#[derive(Clone, Copy, Debug, Default)]
pub struct RealSystem;

fn to_cstring(path: &Path) -> io::Result<CString> {
    CString::new(path.as_os_str().as_bytes()).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}

impl System for RealSystem {
    fn fork(&mut self) -> io::Result<ForkResult> {
        use nix::unistd::ForkResult::{Child, Parent};
        // SAFETY: the child performs only async-signal-safe work (file
        // descriptor manipulation, `execve`, `_exit`) before leaving this
        // function, per the contract `posh-semantics` upholds.
        match unsafe { nix::unistd::fork() }.map_err(io::Error::from)? {
            Parent { child } => Ok(ForkResult::Parent { child: child.as_raw() }),
            Child => Ok(ForkResult::Child),
        }
    }

    fn execve(&mut self, path: &Path, args: &[String], envp: &[String]) -> io::Result<Infallible> {
        let path = to_cstring(path)?;
        let args: Vec<CString> = args
            .iter()
            .map(|a| CString::new(a.as_str()).unwrap_or_default())
            .collect();
        let envp: Vec<CString> = envp
            .iter()
            .map(|e| CString::new(e.as_str()).unwrap_or_default())
            .collect();
        Err(nix::unistd::execve(&path, &args, &envp).unwrap_err().into())
    }

    fn waitpid(&mut self, pid: i32) -> io::Result<ExitStatus> {
        use nix::sys::wait::{waitpid, WaitStatus};
        use std::os::unix::process::ExitStatusExt;
        loop {
            match waitpid(nix::unistd::Pid::from_raw(pid), None) {
                Ok(WaitStatus::Exited(_, code)) => return Ok(ExitStatus::from_raw(code << 8)),
                Ok(WaitStatus::Signaled(_, signal, _)) => return Ok(ExitStatus::from_raw(signal as i32)),
                Ok(_) => continue,
                Err(nix::errno::Errno::EINTR) => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn pipe(&mut self) -> io::Result<(Fd, Fd)> {
        let (reader, writer) = nix::unistd::pipe().map_err(io::Error::from)?;
        Ok((Fd(reader), Fd(writer)))
    }

    fn dup2(&mut self, from: Fd, to: Fd) -> io::Result<Fd> {
        loop {
            match nix::unistd::dup2(from.0, to.0) {
                Ok(fd) => return Ok(Fd(fd)),
                Err(nix::errno::Errno::EINTR) => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn close(&mut self, fd: Fd) -> io::Result<()> {
        match nix::unistd::close(fd.0) {
            Ok(()) | Err(nix::errno::Errno::EBADF) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn open(&mut self, path: &Path, mode: OpenMode) -> io::Result<Fd> {
        use nix::fcntl::OFlag;
        use nix::sys::stat::Mode;
        let flags = match mode {
            OpenMode::ReadOnly => OFlag::O_RDONLY,
            OpenMode::WriteTruncate => OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
            OpenMode::WriteNoClobber => OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_EXCL,
            OpenMode::WriteClobber => OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
            OpenMode::Append => OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_APPEND,
            OpenMode::ReadWrite => OFlag::O_RDWR | OFlag::O_CREAT,
        };
        let perm = Mode::from_bits_truncate(0o666);
        nix::fcntl::open(path, flags, perm).map(Fd).map_err(io::Error::from)
    }

    fn read(&mut self, fd: Fd, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match nix::unistd::read(fd.0, buf) {
                Ok(n) => return Ok(n),
                Err(nix::errno::Errno::EINTR) => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn write(&mut self, fd: Fd, buf: &[u8]) -> io::Result<usize> {
        loop {
            match nix::unistd::write(fd.0, buf) {
                Ok(n) => return Ok(n),
                Err(nix::errno::Errno::EINTR) => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn chdir(&mut self, path: &Path) -> io::Result<()> {
        nix::unistd::chdir(path).map_err(io::Error::from)
    }

    fn getcwd(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn isatty(&self, fd: Fd) -> bool {
        nix::unistd::isatty(fd.0).unwrap_or(false)
    }

    fn umask(&mut self, mask: u32) -> u32 {
        use nix::sys::stat::{umask, Mode};
        umask(Mode::from_bits_truncate(mask)).bits()
    }

    fn getpid(&self) -> i32 {
        nix::unistd::getpid().as_raw()
    }

    fn exit_process(&mut self, status: i32) -> Infallible {
        std::process::exit(status)
    }
}
