// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! [`VirtualSystem`]: an in-memory `System` used by this workspace's own
//! test suites so that parser/executor/builtin tests don't need a real
//! process tree.
//!
//! Process creation (`fork`/`execve`/`waitpid`) has no meaningful
//! in-memory simulation once the reference shell's cooperative async
//! executor is dropped (see `posh-semantics`'s module docs and
//! DESIGN.md), so those three return `ErrorKind::Unsupported`.
//! Everything a built-in or a redirection might touch — an in-memory
//! filesystem, open file descriptors, the working directory, the umask —
//! is fully simulated.

use super::{Fd, ForkResult, OpenMode, System};
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::rc::Rc;

#[derive(Debug, Default)]
struct OpenFile {
    /// Shared so that a pipe's read and write ends (and any fd `dup2`
    /// points at the same underlying file) see each other's writes.
    content: Rc<RefCell<Vec<u8>>>,
    position: usize,
    writable: bool,
    /// The backing path, so a writable descriptor can flush its buffered
    /// content back into the filesystem map when closed.
    path: Option<PathBuf>,
}

/// An in-memory stand-in for the operating system.
#[derive(Debug)]
pub struct VirtualSystem {
    files: HashMap<PathBuf, Vec<u8>>,
    open_files: HashMap<i32, OpenFile>,
    next_fd: i32,
    cwd: PathBuf,
    umask: u32,
    pid: i32,
}

impl Default for VirtualSystem {
    fn default() -> Self {
        VirtualSystem {
            files: HashMap::new(),
            open_files: HashMap::new(),
            next_fd: 3,
            cwd: PathBuf::from("/"),
            umask: 0o022,
            pid: 1000,
        }
    }
}

impl VirtualSystem {
    pub fn new() -> Self {
        Default::default()
    }

    /// Seeds the in-memory filesystem with a file's content, for tests
    /// that redirect from an existing path.
    pub fn put_file(&mut self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }

    /// Reads back everything written to `path` via a `VirtualSystem`-backed
    /// redirection, for tests asserting on output.
    pub fn file_content(&self, path: impl AsRef<Path>) -> Option<&[u8]> {
        self.files.get(path.as_ref()).map(Vec::as_slice)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

fn unsupported(what: &str) -> io::Error {
    io::Error::new(ErrorKind::Unsupported, format!("VirtualSystem does not support {what}"))
}

impl System for VirtualSystem {
    fn fork(&mut self) -> io::Result<ForkResult> {
        Err(unsupported("fork"))
    }

    fn execve(&mut self, _path: &Path, _args: &[String], _envp: &[String]) -> io::Result<Infallible> {
        Err(unsupported("execve"))
    }

    fn waitpid(&mut self, _pid: i32) -> io::Result<ExitStatus> {
        Err(unsupported("waitpid"))
    }

    fn pipe(&mut self) -> io::Result<(Fd, Fd)> {
        let read = self.next_fd;
        let write = self.next_fd + 1;
        self.next_fd += 2;
        let buffer = Rc::new(RefCell::new(Vec::new()));
        self.open_files.insert(read, OpenFile { content: Rc::clone(&buffer), position: 0, writable: false, path: None });
        self.open_files.insert(write, OpenFile { content: buffer, position: 0, writable: true, path: None });
        Ok((Fd(read), Fd(write)))
    }

    fn dup2(&mut self, from: Fd, to: Fd) -> io::Result<Fd> {
        let Some(file) = self.open_files.get(&from.0) else {
            return Err(io::Error::from(ErrorKind::NotFound));
        };
        let cloned = OpenFile {
            content: Rc::clone(&file.content),
            position: file.position,
            writable: file.writable,
            path: file.path.clone(),
        };
        self.open_files.insert(to.0, cloned);
        Ok(to)
    }

    fn close(&mut self, fd: Fd) -> io::Result<()> {
        if let Some(file) = self.open_files.remove(&fd.0) {
            if let (true, Some(path)) = (file.writable, file.path) {
                self.files.insert(path, file.content.borrow().clone());
            }
        }
        Ok(())
    }

    fn open(&mut self, path: &Path, mode: OpenMode) -> io::Result<Fd> {
        let resolved = self.resolve(path);
        let (content, writable) = match mode {
            OpenMode::ReadOnly => {
                let content = self.files.get(&resolved).cloned().ok_or_else(|| io::Error::from(ErrorKind::NotFound))?;
                (content, false)
            }
            OpenMode::WriteNoClobber if self.files.contains_key(&resolved) => {
                return Err(io::Error::from(ErrorKind::AlreadyExists));
            }
            OpenMode::WriteTruncate | OpenMode::WriteNoClobber | OpenMode::WriteClobber => {
                self.files.entry(resolved.clone()).or_default();
                (Vec::new(), true)
            }
            OpenMode::Append | OpenMode::ReadWrite => {
                let content = self.files.entry(resolved.clone()).or_default().clone();
                (content, true)
            }
        };
        let fd = self.next_fd;
        self.next_fd += 1;
        let position = if matches!(mode, OpenMode::Append) { content.len() } else { 0 };
        let content = Rc::new(RefCell::new(content));
        self.open_files.insert(fd, OpenFile { content, position, writable, path: Some(resolved) });
        Ok(Fd(fd))
    }

    fn read(&mut self, fd: Fd, buf: &mut [u8]) -> io::Result<usize> {
        let file = self.open_files.get_mut(&fd.0).ok_or_else(|| io::Error::from(ErrorKind::NotFound))?;
        let content = file.content.borrow();
        let remaining = &content[file.position.min(content.len())..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        drop(content);
        file.position += n;
        Ok(n)
    }

    fn write(&mut self, fd: Fd, buf: &[u8]) -> io::Result<usize> {
        let file = self.open_files.get_mut(&fd.0).ok_or_else(|| io::Error::from(ErrorKind::NotFound))?;
        if !file.writable {
            return Err(io::Error::from(ErrorKind::PermissionDenied));
        }
        file.content.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn chdir(&mut self, path: &Path) -> io::Result<()> {
        self.cwd = self.resolve(path);
        Ok(())
    }

    fn getcwd(&self) -> io::Result<PathBuf> {
        Ok(self.cwd.clone())
    }

    fn isatty(&self, _fd: Fd) -> bool {
        false
    }

    fn umask(&mut self, mask: u32) -> u32 {
        std::mem::replace(&mut self.umask, mask)
    }

    fn getpid(&self) -> i32 {
        self.pid
    }

    fn exit_process(&mut self, _status: i32) -> Infallible {
        panic!("VirtualSystem cannot terminate the test process")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_back_through_reopen() {
        let mut system = VirtualSystem::new();
        let fd = system.open(Path::new("/tmp/out"), OpenMode::WriteTruncate).unwrap();
        system.write(fd, b"hello").unwrap();
        system.close(fd).unwrap();
        assert_eq!(system.file_content("/tmp/out"), Some(&b"hello"[..]));
    }

    #[test]
    fn noclobber_rejects_existing_file() {
        let mut system = VirtualSystem::new();
        system.put_file("/tmp/out", "existing");
        let err = system.open(Path::new("/tmp/out"), OpenMode::WriteNoClobber).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[test]
    fn append_preserves_existing_content() {
        let mut system = VirtualSystem::new();
        system.put_file("/tmp/out", "existing-");
        let fd = system.open(Path::new("/tmp/out"), OpenMode::Append).unwrap();
        system.write(fd, b"more").unwrap();
        system.close(fd).unwrap();
        assert_eq!(system.file_content("/tmp/out"), Some(&b"existing-more"[..]));
    }

    #[test]
    fn pipe_write_end_is_visible_from_read_end() {
        let mut system = VirtualSystem::new();
        let (read, write) = system.pipe().unwrap();
        system.write(write, b"hello").unwrap();
        let mut buf = [0u8; 5];
        assert_eq!(system.read(read, &mut buf).unwrap(), 5);
        assert_eq!(&buf, b"hello");
    }

    #[test]
    fn dup2_shares_the_underlying_pipe_buffer() {
        let mut system = VirtualSystem::new();
        let (read, write) = system.pipe().unwrap();
        let dup_write = Fd(100);
        system.dup2(write, dup_write).unwrap();
        system.write(dup_write, b"via-dup").unwrap();
        let mut buf = [0u8; 7];
        assert_eq!(system.read(read, &mut buf).unwrap(), 7);
        assert_eq!(&buf, b"via-dup");
    }

    #[test]
    fn chdir_updates_relative_resolution() {
        let mut system = VirtualSystem::new();
        system.chdir(Path::new("/home/user")).unwrap();
        system.put_file("/home/user/a", "x");
        let fd = system.open(Path::new("a"), OpenMode::ReadOnly).unwrap();
        let mut buf = [0u8; 1];
        assert_eq!(system.read(fd, &mut buf).unwrap(), 1);
        assert_eq!(&buf, b"x");
    }
}
