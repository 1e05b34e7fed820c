// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The `:` built-in: a no-op that ignores its arguments and succeeds.

use posh_env::{Env, System};
use posh_semantics::ExecResult;

pub fn run<S: System>(_env: &mut Env<S>, _args: Vec<String>) -> ExecResult {
    std::ops::ControlFlow::Continue(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use posh_env::VirtualSystem;

    #[test]
    fn always_succeeds() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        let result = run(&mut env, vec![":".to_string(), "ignored".to_string()]);
        assert_eq!(result, std::ops::ControlFlow::Continue(0));
    }
}
