// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The `export` built-in: marks variables for inclusion in a child
//! process's environment (`spec.md` §4.6). `NAME=value` operands assign
//! and export; bare `NAME` operands mark an existing (or newly declared)
//! variable as exported without touching its value; with no operands,
//! lists every currently exported variable.

use posh_env::{Env, Scope, System};
use posh_semantics::ExecResult;

use crate::common::failure;

pub fn run<S: System>(env: &mut Env<S>, args: Vec<String>) -> ExecResult {
    let operands = &args[1..];
    if operands.is_empty() {
        let mut names: Vec<(String, Option<String>)> = env
            .variables
            .iter()
            .filter(|(_, v)| v.is_exported)
            .map(|(name, v)| (name.to_string(), v.value.clone()))
            .collect();
        names.sort();
        for (name, value) in names {
            match value {
                Some(value) => println!("export {name}={value}"),
                None => println!("export {name}"),
            }
        }
        return std::ops::ControlFlow::Continue(0);
    }

    for operand in operands {
        let (name, value) = match operand.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (operand.as_str(), None),
        };
        let mut var = env.variables.get_or_new(name.to_string(), Scope::Global);
        if let Some(value) = value {
            if var.assign(value.to_string(), None).is_err() {
                return failure("export", format!("{name}: read-only variable"));
            }
        }
        var.export(true);
    }
    std::ops::ControlFlow::Continue(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use posh_env::VirtualSystem;

    #[test]
    fn assigns_and_exports() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        let result = run(&mut env, vec!["export".to_string(), "FOO=bar".to_string()]);
        assert_eq!(result, std::ops::ControlFlow::Continue(0));
        let var = env.variables.get("FOO").unwrap();
        assert_eq!(var.value.as_deref(), Some("bar"));
        assert!(var.is_exported);
    }

    #[test]
    fn bare_name_exports_without_assigning() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        env.variables.get_or_new("FOO".to_string(), Scope::Global).assign("existing".to_string(), None).unwrap();
        run(&mut env, vec!["export".to_string(), "FOO".to_string()]);
        let var = env.variables.get("FOO").unwrap();
        assert_eq!(var.value.as_deref(), Some("existing"));
        assert!(var.is_exported);
    }
}
