// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The `unset [-f|-v] name...` built-in: removes variables (the default,
//! or with `-v`) or functions (`-f`) (`spec.md` §4.6).

use posh_env::System;
use posh_semantics::ExecResult;

enum Target {
    Variable,
    Function,
}

pub fn run<S: System>(env: &mut posh_env::Env<S>, args: Vec<String>) -> ExecResult {
    let mut target = Target::Variable;
    let mut names = Vec::new();
    let mut iter = args.into_iter().skip(1).peekable();
    while let Some(arg) = iter.peek() {
        match arg.as_str() {
            "-f" => {
                target = Target::Function;
                iter.next();
            }
            "-v" => {
                target = Target::Variable;
                iter.next();
            }
            "--" => {
                iter.next();
                break;
            }
            _ => break,
        }
    }
    names.extend(iter);

    let mut status = 0;
    for name in names {
        let result = match target {
            Target::Variable => env.variables.unset(&name).map(|_| ()).map_err(|e| e.to_string()),
            Target::Function => env.functions.unset(&name).map(|_| ()).map_err(|e| e.to_string()),
        };
        if let Err(message) = result {
            eprintln!("unset: {message}");
            status = 1;
        }
    }
    std::ops::ControlFlow::Continue(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use posh_env::{Scope, VirtualSystem};

    #[test]
    fn unsets_a_variable() {
        let mut env = posh_env::Env::new(VirtualSystem::default(), "posh");
        env.variables.get_or_new("FOO".to_string(), Scope::Global).assign("x".to_string(), None).unwrap();
        let result = run(&mut env, vec!["unset".to_string(), "FOO".to_string()]);
        assert_eq!(result, std::ops::ControlFlow::Continue(0));
        assert!(env.variables.get("FOO").is_none());
    }

    #[test]
    fn unsets_a_function_with_dash_f() {
        use posh_syntax::ast::{Command, CommandKind, List};
        use posh_syntax::source::Location;
        use std::rc::Rc;

        let mut env = posh_env::Env::new(VirtualSystem::default(), "posh");
        let body = Rc::new(Command {
            kind: CommandKind::BraceGroup(List::default()),
            redirections: Vec::new(),
            location: Location::dummy(),
        });
        env.functions.define(posh_env::Function::new("f", body, Location::dummy())).unwrap();
        let result = run(&mut env, vec!["unset".to_string(), "-f".to_string(), "f".to_string()]);
        assert_eq!(result, std::ops::ControlFlow::Continue(0));
        assert!(env.functions.get("f").is_none());
    }
}
