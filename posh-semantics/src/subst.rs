// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! Command substitution (`spec.md` §4.4's `$(...)`/backquote forms),
//! grounded on the reference shell's
//! `yash-semantics/src/expansion/command_subst.rs`: open a pipe, run the
//! substituted text as a command list with stdout pointed at the pipe's
//! write end, collect everything written to the read end, and trim
//! trailing newlines.
//!
//! The reference shell always forks for this (its subshell needs its own
//! process to get its own address space for variable/cd isolation). This
//! crate's [`posh_env::System`] abstraction only sometimes offers a real
//! `fork` (`RealSystem` does, `VirtualSystem` used by tests always returns
//! `Unsupported`), so this falls back to running the substituted command
//! in-process, sharing `env`, when forking isn't available. That is a
//! documented simplification (no subshell variable/cwd isolation under the
//! test harness) recorded in DESIGN.md; it does not affect `RealSystem`,
//! where every substitution still gets a true subshell.

use std::rc::Rc;

use posh_env::system::{Fd, ForkResult};
use posh_env::{Env, System};
use posh_syntax::lexer::StrLines;
use posh_syntax::parser::{ParseResult, Parser};
use posh_syntax::source::Source;

use crate::command::execute_complete_command;
use crate::result::Unwind;
use crate::Executor;

/// Runs `command_text` with stdout captured, returning its output with
/// trailing newlines trimmed (`CommandSubstituter::substitute`'s contract).
pub(crate) fn run_captured<S: System>(exec: &mut Executor<'_, S>, env: &mut Env<S>, command_text: &str) -> String {
    let (read, write) = match env.system.pipe() {
        Ok(pair) => pair,
        Err(_) => return String::new(),
    };

    match env.system.fork() {
        Ok(ForkResult::Child) => {
            let _ = env.system.close(read);
            let _ = env.system.dup2(write, Fd::STDOUT);
            let _ = env.system.close(write);
            let status = run_text(exec, env, command_text);
            let _: std::convert::Infallible = env.system.exit_process(status);
        }
        Ok(ForkResult::Parent { child }) => {
            let _ = env.system.close(write);
            let output = drain(env, read);
            let _ = env.system.close(read);
            let _ = env.system.waitpid(child);
            trim_trailing_newlines(&output)
        }
        Err(_) => {
            // No real fork available: run in-process, sharing `env`
            // directly (see module docs). stdout is still redirected to
            // the pipe so nested output capture behaves the same way.
            let saved_stdout = env.system.dup2(Fd::STDOUT, Fd(98)).ok();
            let _ = env.system.dup2(write, Fd::STDOUT);
            let _ = env.system.close(write);
            run_text(exec, env, command_text);
            if let Some(saved) = saved_stdout {
                let _ = env.system.dup2(saved, Fd::STDOUT);
                let _ = env.system.close(saved);
            }
            let output = drain(env, read);
            let _ = env.system.close(read);
            trim_trailing_newlines(&output)
        }
    }
}

fn drain<S: System>(env: &mut Env<S>, read: Fd) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        match env.system.read(read, &mut chunk) {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(_) => break,
        }
    }
    buf
}

fn trim_trailing_newlines(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.trim_end_matches('\n').to_string()
}

/// Parses and runs `text` as a full program, the way `eval`/`.` and the
/// top-level read-eval loop all do, returning the resulting exit status.
pub(crate) fn run_text<S: System>(exec: &mut Executor<'_, S>, env: &mut Env<S>, text: &str) -> i32 {
    let source = Rc::new(Source::Eval { parent: Box::new(Source::Unknown) });
    let mut input = StrLines::new(text);
    let mut parser = Parser::new(Rc::clone(&source), &mut input);
    let mut status = 0;
    loop {
        match parser.parse_complete_command() {
            ParseResult::NoCommand => break,
            ParseResult::Syntax(_) => {
                status = 2;
                break;
            }
            ParseResult::Match(command) => match execute_complete_command(&command, env, exec) {
                std::ops::ControlFlow::Continue(code) => status = code,
                std::ops::ControlFlow::Break(Unwind::Exit(code)) => {
                    status = code;
                    break;
                }
                std::ops::ControlFlow::Break(_) => break,
            },
        }
    }
    status
}
