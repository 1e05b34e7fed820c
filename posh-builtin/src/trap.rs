// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The `trap` built-in (`spec.md` §4.6): installs a handler (a command
//! string, `-` for the default disposition, or an empty string to ignore)
//! for one or more signal names or the `EXIT` pseudo-signal, tracked in
//! [`posh_env::trap::TrapSet`]. With no operands, lists every handler
//! currently installed.

use posh_env::{Action, Env, System};
use posh_semantics::ExecResult;

pub fn run<S: System>(env: &mut Env<S>, args: Vec<String>) -> ExecResult {
    let operands = &args[1..];
    if operands.is_empty() {
        for (name, action) in env.traps.iter() {
            match action {
                Action::Default => {}
                Action::Ignore => println!("trap -- '' {name}"),
                Action::Command(command) => println!("trap -- '{command}' {name}"),
            }
        }
        return std::ops::ControlFlow::Continue(0);
    }

    let (action, names) = if operands[0] == "--" {
        (&operands[1], &operands[2..])
    } else {
        (&operands[0], &operands[1..])
    };
    let action = if action == "-" {
        Action::Default
    } else if action.is_empty() {
        Action::Ignore
    } else {
        Action::Command(action.clone())
    };
    for name in names {
        env.traps.set(name.clone(), action.clone());
    }
    std::ops::ControlFlow::Continue(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use posh_env::VirtualSystem;

    #[test]
    fn installs_a_command_handler() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        run(&mut env, vec!["trap".to_string(), "echo bye".to_string(), "EXIT".to_string()]);
        assert_eq!(env.traps.get("EXIT"), Some(&Action::Command("echo bye".to_string())));
    }

    #[test]
    fn dash_resets_to_default() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        env.traps.set("INT", Action::Ignore);
        run(&mut env, vec!["trap".to_string(), "-".to_string(), "INT".to_string()]);
        assert!(env.traps.get("INT").is_none());
    }
}
