// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The `return [n]` built-in: sets `returning`/`returnStatus` and unwinds
//! one function or `.`-sourced-script frame (`spec.md` §4.6). Only valid
//! inside a function or dot-script, tracked by [`Env::call_depth`].

use std::ops::ControlFlow;

use posh_env::{Env, System};
use posh_semantics::{ExecResult, Unwind};

use crate::common::usage_error;

pub fn run<S: System>(env: &mut Env<S>, args: Vec<String>) -> ExecResult {
    if args.len() > 2 {
        return usage_error("return", "too many operands");
    }
    let status = match args.get(1) {
        None => env.exit_status,
        Some(arg) => match arg.parse::<i32>() {
            Ok(n) => n,
            Err(_) => return usage_error("return", format!("{arg}: not an integer")),
        },
    };
    if env.call_depth == 0 {
        return usage_error("return", "can only be used in a function or dot-script");
    }
    ControlFlow::Break(Unwind::Return(status))
}

#[cfg(test)]
mod tests {
    use super::*;
    use posh_env::VirtualSystem;

    #[test]
    fn returning_outside_a_function_is_an_error() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        let result = run(&mut env, vec!["return".to_string()]);
        assert_eq!(result, ControlFlow::Continue(1));
    }

    #[test]
    fn returning_with_status() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        env.call_depth = 1;
        let result = run(&mut env, vec!["return".to_string(), "3".to_string()]);
        assert_eq!(result, ControlFlow::Break(Unwind::Return(3)));
    }
}
