// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The `exit [n]` built-in: unwinds all the way to the top-level loop
//! (`spec.md` §4.6). Defaults to the current `$?`; an out-of-range integer
//! is clamped to 255 rather than treated as a usage error, matching
//! `spec.md`'s explicit "out-of-range integer → 255" contract.

use std::ops::ControlFlow;

use posh_env::{Env, System};
use posh_semantics::{ExecResult, Unwind};

use crate::common::usage_error;

pub fn run<S: System>(env: &mut Env<S>, args: Vec<String>) -> ExecResult {
    if args.len() > 2 {
        return usage_error("exit", "too many operands");
    }
    let status = match args.get(1) {
        None => env.exit_status,
        Some(arg) => match arg.parse::<i64>() {
            Ok(n) if (0..=255).contains(&n) => n as i32,
            Ok(_) => 255,
            Err(_) => return usage_error("exit", format!("{arg}: not an integer")),
        },
    };
    ControlFlow::Break(Unwind::Exit(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use posh_env::VirtualSystem;

    #[test]
    fn defaults_to_current_status() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        env.exit_status = 7;
        let result = run(&mut env, vec!["exit".to_string()]);
        assert_eq!(result, ControlFlow::Break(Unwind::Exit(7)));
    }

    #[test]
    fn out_of_range_clamps_to_255() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        let result = run(&mut env, vec!["exit".to_string(), "9999".to_string()]);
        assert_eq!(result, ControlFlow::Break(Unwind::Exit(255)));
    }
}
