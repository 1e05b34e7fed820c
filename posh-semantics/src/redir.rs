// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! Redirection semantics (`spec.md` §4.5's "Redirections (per operator
//! kind)" and §5's shared-resource rule: fds 0..9 are user-visible, 10+
//! are save slots), grounded on the reference shell's `yash-semantics`'s
//! `redir.rs`/`redir/here_doc.rs`.

use std::path::PathBuf;

use posh_env::system::{Fd, OpenMode};
use posh_env::{Env, System};
use posh_expand::CommandSubstituter;
use posh_syntax::ast::{RedirKind, Redirection};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RedirError {
    #[error("{0}: {1}")]
    Expand(String, posh_expand::ExpandError),
    #[error("{path}: {source}")]
    Open { path: String, #[source] source: std::io::Error },
    #[error("{operand}: not a valid file descriptor")]
    BadFd { operand: String },
    #[error("{fd}: bad file descriptor")]
    MissingSourceFd { fd: u32 },
    #[error("{0}")]
    System(#[source] std::io::Error),
}

/// One entry of the save-slot undo log `spec.md` §4.5 describes: before a
/// redirection is applied, the target fd's previous binding (if any) is
/// duplicated into the 10+ range so [`pop_redirections`] can restore it.
pub struct SavedFd {
    target: Fd,
    saved: Option<Fd>,
}

/// Applies redirections left to right, later ones overriding earlier ones
/// for the same fd (`spec.md` §5's sequencing rule). On failure, whatever
/// was already applied is unwound before the error is returned, matching
/// "the command... is not executed" (`spec.md` §7).
pub fn apply_redirections<S: System>(
    redirs: &[Redirection],
    env: &mut Env<S>,
    subst: &mut dyn CommandSubstituter<S>,
    save: bool,
) -> Result<Vec<SavedFd>, RedirError> {
    let mut saved = Vec::new();
    for redir in redirs {
        match apply_one(redir, env, subst, save) {
            Ok(entry) => saved.push(entry),
            Err(e) => {
                pop_redirections(saved, env);
                return Err(e);
            }
        }
    }
    Ok(saved)
}

/// Reverses every entry in `saved`, in reverse order, restoring whatever
/// each target fd pointed to before its redirection was applied.
pub fn pop_redirections<S: System>(saved: Vec<SavedFd>, env: &mut Env<S>) {
    for entry in saved.into_iter().rev() {
        let _ = env.system.close(entry.target);
        if let Some(slot) = entry.saved {
            let _ = env.system.dup2(slot, entry.target);
            let _ = env.system.close(slot);
        }
    }
}

/// Like [`pop_redirections`], but leaves each `target` fd exactly as the
/// redirection left it instead of restoring it; only the backup
/// descriptors in the save slots are closed. Used by `exec` with no
/// operands, whose redirections outlive the command line that applied
/// them (`spec.md` §4.6).
pub fn discard_saved<S: System>(saved: Vec<SavedFd>, env: &mut Env<S>) {
    for entry in saved.into_iter().rev() {
        if let Some(slot) = entry.saved {
            let _ = env.system.close(slot);
        }
    }
}

fn save_target<S: System>(target: Fd, env: &mut Env<S>, save: bool) -> Option<Fd> {
    if !save {
        return None;
    }
    // Duplicating a target that has nothing open yet fails; that's fine,
    // it just means there is nothing to restore.
    let slot = Fd(target.0 + 10);
    env.system.dup2(target, slot).ok()
}

fn apply_one<S: System>(
    redir: &Redirection,
    env: &mut Env<S>,
    subst: &mut dyn CommandSubstituter<S>,
    save: bool,
) -> Result<SavedFd, RedirError> {
    let target = Fd(redir.fd as i32);

    match redir.kind {
        RedirKind::HereDoc | RedirKind::HereDocQuoted => {
            let body = if redir.kind == RedirKind::HereDocQuoted {
                redir.operand.text.clone()
            } else {
                posh_expand::expand_heredoc_body(&redir.operand.text, env, subst)
                    .map_err(|e| RedirError::Expand(redir.operand.text.clone(), e))?
            };
            let saved_fd = save_target(target, env, save);
            feed_heredoc(&body, target, env).map_err(RedirError::System)?;
            Ok(SavedFd { target, saved: saved_fd })
        }
        RedirKind::DupFd => {
            let operand = posh_expand::expand_word(&redir.operand, env, subst)
                .map_err(|e| RedirError::Expand(redir.operand.text.clone(), e))?;
            let saved_fd = save_target(target, env, save);
            if operand == "-" {
                let _ = env.system.close(target);
            } else {
                let source: i32 =
                    operand.parse().map_err(|_| RedirError::BadFd { operand: operand.clone() })?;
                env.system.dup2(Fd(source), target).map_err(|_| RedirError::MissingSourceFd { fd: redir.fd })?;
            }
            Ok(SavedFd { target, saved: saved_fd })
        }
        _ => {
            let operand = posh_expand::expand_word(&redir.operand, env, subst)
                .map_err(|e| RedirError::Expand(redir.operand.text.clone(), e))?;
            let path = PathBuf::from(&operand);
            let mode = match redir.kind {
                RedirKind::InputRead => OpenMode::ReadOnly,
                RedirKind::OutputTrunc => {
                    if env.options.is_on(posh_env::Option::NoClobber) {
                        OpenMode::WriteNoClobber
                    } else {
                        OpenMode::WriteTruncate
                    }
                }
                RedirKind::OutputClobber => OpenMode::WriteClobber,
                RedirKind::Append => OpenMode::Append,
                RedirKind::ReadWrite => OpenMode::ReadWrite,
                RedirKind::DupFd | RedirKind::HereDoc | RedirKind::HereDocQuoted => unreachable!(),
            };
            let saved_fd = save_target(target, env, save);
            let opened = env.system.open(&path, mode).map_err(|source| RedirError::Open { path: operand, source })?;
            env.system.dup2(opened, target).map_err(RedirError::System)?;
            let _ = env.system.close(opened);
            Ok(SavedFd { target, saved: saved_fd })
        }
    }
}

/// Delivers a here-document body to `target` via a pipe (`spec.md` §4.5:
/// "spawn a helper child that writes the body into a pipe; parent keeps
/// the read end"). Forking avoids deadlocking on a body larger than the
/// OS pipe buffer; when `fork` isn't available (`VirtualSystem`, whose
/// in-memory pipes have no such capacity limit) the body is written
/// directly in-process instead.
fn feed_heredoc<S: System>(body: &str, target: Fd, env: &mut Env<S>) -> std::io::Result<()> {
    let (read, write) = env.system.pipe()?;
    match env.system.fork() {
        Ok(posh_env::system::ForkResult::Child) => {
            let _ = env.system.close(read);
            write_all(env, write, body.as_bytes());
            let _ = env.system.close(write);
            let _: std::convert::Infallible = env.system.exit_process(0);
        }
        Ok(posh_env::system::ForkResult::Parent { child }) => {
            env.system.close(write)?;
            env.system.dup2(read, target)?;
            env.system.close(read)?;
            let _ = env.system.waitpid(child);
        }
        Err(_) => {
            write_all(env, write, body.as_bytes());
            env.system.close(write)?;
            env.system.dup2(read, target)?;
            env.system.close(read)?;
        }
    }
    Ok(())
}

fn write_all<S: System>(env: &mut Env<S>, fd: Fd, mut buf: &[u8]) {
    while !buf.is_empty() {
        match env.system.write(fd, buf) {
            Ok(0) => break,
            Ok(n) => buf = &buf[n..],
            Err(_) => break,
        }
    }
}
