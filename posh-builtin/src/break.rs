// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The `break [n]` built-in: sets `numBreaks = min(n, loopCounter)` and
//! unwinds to the `n`th enclosing loop (`spec.md` §4.6), clamped against
//! [`Env::loop_depth`] rather than a process-local `loopCounter` global.

use std::ops::ControlFlow;

use posh_env::{Env, System};
use posh_semantics::{ExecResult, Unwind};

use crate::common::usage_error;

pub fn run<S: System>(env: &mut Env<S>, args: Vec<String>) -> ExecResult {
    let n = match parse_count(&args) {
        Ok(n) => n,
        Err(message) => return usage_error("break", message),
    };
    if env.loop_depth == 0 {
        return usage_error("break", "not in a loop");
    }
    ControlFlow::Break(Unwind::Break(n.min(env.loop_depth)))
}

/// Parses `break`/`continue`'s optional count operand: defaults to 1,
/// must be a positive integer.
pub(crate) fn parse_count(args: &[String]) -> Result<u32, String> {
    match args.get(1) {
        None => Ok(1),
        Some(arg) => match arg.parse::<u32>() {
            Ok(0) | Err(_) => Err(format!("{arg}: not a positive integer")),
            Ok(n) => {
                if args.len() > 2 {
                    Err("too many operands".to_string())
                } else {
                    Ok(n)
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posh_env::VirtualSystem;

    #[test]
    fn breaking_outside_a_loop_is_an_error() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        let result = run(&mut env, vec!["break".to_string()]);
        assert_eq!(result, ControlFlow::Continue(1));
    }

    #[test]
    fn breaking_one_loop_deep() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        env.loop_depth = 1;
        let result = run(&mut env, vec!["break".to_string()]);
        assert_eq!(result, ControlFlow::Break(Unwind::Break(1)));
    }

    #[test]
    fn count_is_clamped_to_loop_depth() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        env.loop_depth = 2;
        let result = run(&mut env, vec!["break".to_string(), "5".to_string()]);
        assert_eq!(result, ControlFlow::Break(Unwind::Break(2)));
    }
}
