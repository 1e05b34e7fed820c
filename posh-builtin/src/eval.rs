// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The `eval` built-in (`spec.md` §4.6): joins its arguments with spaces
//! and a trailing newline, then parses and executes the result in the
//! current shell, the same way [`crate::dot`] runs a sourced file's
//! content.

use std::rc::Rc;

use posh_env::{Env, System};
use posh_semantics::{Builtins, ExecResult, Unwind};
use posh_syntax::lexer::StrLines;
use posh_syntax::source::Source;

pub fn run<S: System>(env: &mut Env<S>, args: Vec<String>, builtins: &mut dyn Builtins<S>) -> ExecResult {
    let operands = &args[1..];
    if operands.is_empty() {
        return std::ops::ControlFlow::Continue(0);
    }
    let mut text = operands.join(" ");
    text.push('\n');

    let source = Rc::new(Source::Eval { parent: Box::new(Source::Unknown) });
    let mut input = StrLines::new(&text);
    let mut exec = posh_semantics::Executor::new(builtins);
    let result = posh_semantics::run_program(source, &mut input, env, &mut exec);
    match result {
        std::ops::ControlFlow::Break(Unwind::Return(status)) => std::ops::ControlFlow::Continue(status),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Registry;
    use posh_env::VirtualSystem;

    #[test]
    fn runs_the_joined_arguments() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        let mut registry = Registry;
        let result = run(&mut env, vec!["eval".to_string(), "x=1".to_string()], &mut registry);
        assert_eq!(result, std::ops::ControlFlow::Continue(0));
        assert_eq!(env.variables.get("x").unwrap().value.as_deref(), Some("1"));
    }

    #[test]
    fn no_operands_is_a_no_op() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        let mut registry = Registry;
        let result = run(&mut env, vec!["eval".to_string()], &mut registry);
        assert_eq!(result, std::ops::ControlFlow::Continue(0));
    }
}
