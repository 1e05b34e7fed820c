// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! Implementations of the 17 built-in utilities `spec.md` §4.6 names,
//! registered behind a single [`Registry`] that implements
//! [`posh_semantics::Builtins`]. Grounded on the reference shell's
//! `yash-builtin` crate, but collapsed to a synchronous `match` dispatch
//! (`yash-builtin::BUILTINS`/`iter` is an async-futures registry, which
//! this crate's synchronous executor has no use for).

pub mod r#break;
pub mod cd;
pub mod colon;
pub mod command;
pub mod common;
pub mod r#continue;
pub mod dot;
pub mod eval;
pub mod exec;
pub mod exit;
pub mod export;
pub mod read;
pub mod r#return;
pub mod set;
pub mod shift;
pub mod trap;
pub mod umask;
pub mod unset;

use posh_env::{Env, System};
use posh_semantics::{BuiltinInfo, Builtins, ExecResult};

/// One row of `spec.md` §4.6's table: a built-in's name and whether it is
/// special (permanent assignments, fatal usage errors when non-interactive)
/// or regular.
const TABLE: &[(&str, bool)] = &[
    (":", true),
    (".", true),
    ("break", true),
    ("cd", false),
    ("command", false),
    ("continue", true),
    ("eval", true),
    ("exec", true),
    ("exit", true),
    ("export", true),
    ("read", false),
    ("return", true),
    ("set", true),
    ("shift", true),
    ("trap", true),
    ("umask", false),
    ("unset", true),
];

/// The shell's built-in registry: a stateless dispatcher over the modules
/// in this crate, installed into [`posh_semantics::Executor`] at every
/// entry point that runs a command list.
#[derive(Default)]
pub struct Registry;

impl<S: System> Builtins<S> for Registry {
    fn find(&self, name: &str) -> Option<BuiltinInfo> {
        TABLE.iter().find(|(n, _)| *n == name).map(|(_, special)| BuiltinInfo { special: *special })
    }

    fn run(&mut self, name: &str, env: &mut Env<S>, args: Vec<String>) -> ExecResult {
        match name {
            ":" => colon::run(env, args),
            "." => dot::run(env, args, self),
            "break" => r#break::run(env, args),
            "cd" => cd::run(env, args),
            "command" => command::run(env, args, self),
            "continue" => r#continue::run(env, args),
            "eval" => eval::run(env, args, self),
            "exec" => exec::run(env, args),
            "exit" => exit::run(env, args),
            "export" => export::run(env, args),
            "read" => read::run(env, args),
            "return" => r#return::run(env, args),
            "set" => set::run(env, args),
            "shift" => shift::run(env, args),
            "trap" => trap::run(env, args),
            "umask" => umask::run(env, args),
            "unset" => unset::run(env, args),
            _ => common::failure(name, "not a built-in"),
        }
    }
}
