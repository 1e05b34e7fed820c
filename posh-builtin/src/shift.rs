// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The `shift [n]` built-in: drops the first `n` positional parameters
//! (`spec.md` §4.6). `n` defaults to 1; `n == 0` is a no-op; shifting more
//! parameters than are set is a usage error.

use posh_env::{Env, System};
use posh_semantics::ExecResult;

use crate::common::usage_error;

pub fn run<S: System>(env: &mut Env<S>, args: Vec<String>) -> ExecResult {
    if args.len() > 2 {
        return usage_error("shift", "too many operands");
    }
    let n = match args.get(1) {
        None => 1,
        Some(arg) => match arg.parse::<usize>() {
            Ok(n) => n,
            Err(_) => return usage_error("shift", format!("{arg}: not a non-negative integer")),
        },
    };
    let params = env.variables.positional_params();
    if n > params.len() {
        return usage_error("shift", "shift count out of range");
    }
    if n > 0 {
        let remaining = params[n..].to_vec();
        env.variables.set_positional_params(remaining);
    }
    std::ops::ControlFlow::Continue(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use posh_env::VirtualSystem;

    fn env_with(params: &[&str]) -> Env<VirtualSystem> {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        env.variables.set_positional_params(params.iter().map(|s| s.to_string()).collect());
        env
    }

    #[test]
    fn default_shifts_by_one() {
        let mut env = env_with(&["a", "b", "c"]);
        let result = run(&mut env, vec!["shift".to_string()]);
        assert_eq!(result, std::ops::ControlFlow::Continue(0));
        assert_eq!(env.variables.positional_params(), ["b", "c"]);
    }

    #[test]
    fn zero_is_a_no_op() {
        let mut env = env_with(&["a", "b"]);
        run(&mut env, vec!["shift".to_string(), "0".to_string()]);
        assert_eq!(env.variables.positional_params(), ["a", "b"]);
    }

    #[test]
    fn shifting_past_the_end_is_an_error() {
        let mut env = env_with(&["a"]);
        let result = run(&mut env, vec!["shift".to_string(), "5".to_string()]);
        assert_eq!(result, std::ops::ControlFlow::Continue(1));
    }
}
