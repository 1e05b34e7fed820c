// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The `continue [n]` built-in: mirrors `break` via `numContinues`
//! (`spec.md` §4.6).

use std::ops::ControlFlow;

use posh_env::{Env, System};
use posh_semantics::{ExecResult, Unwind};

use crate::common::usage_error;
use crate::r#break::parse_count;

pub fn run<S: System>(env: &mut Env<S>, args: Vec<String>) -> ExecResult {
    let n = match parse_count(&args) {
        Ok(n) => n,
        Err(message) => return usage_error("continue", message),
    };
    if env.loop_depth == 0 {
        return usage_error("continue", "not in a loop");
    }
    ControlFlow::Break(Unwind::Continue(n.min(env.loop_depth)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use posh_env::VirtualSystem;

    #[test]
    fn continuing_one_loop_deep() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        env.loop_depth = 1;
        let result = run(&mut env, vec!["continue".to_string()]);
        assert_eq!(result, ControlFlow::Break(Unwind::Continue(1)));
    }
}
