// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The `exec` built-in (`spec.md` §4.6): with no operands, the
//! redirections already applied to this command line are left in place
//! rather than restored (handled by `posh-semantics::simple_command`'s
//! special case for "`exec` with no operands"); with operands, replaces
//! the shell process image directly via [`System::execve`] — unlike an
//! ordinary external command, this built-in runs without forking, so a
//! successful `execve` really does replace the running shell.

use std::path::PathBuf;

use posh_env::{Env, System};
use posh_semantics::ExecResult;

use crate::common::failure;

pub fn run<S: System>(env: &mut Env<S>, args: Vec<String>) -> ExecResult {
    let argv = &args[1..];
    if argv.is_empty() {
        return std::ops::ControlFlow::Continue(0);
    }

    let name = &argv[0];
    let path = if name.contains('/') {
        PathBuf::from(name)
    } else {
        match posh_semantics::search_path(env, name) {
            Some(path) => path,
            None => return failure("exec", format!("{name}: not found")),
        }
    };

    let envp = env.variables.exported_strings();
    match env.system.execve(&path, argv, &envp) {
        Ok(never) => match never {},
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => std::ops::ControlFlow::Continue(127),
        Err(_) => std::ops::ControlFlow::Continue(126),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posh_env::VirtualSystem;

    #[test]
    fn no_operands_is_a_no_op() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        let result = run(&mut env, vec!["exec".to_string()]);
        assert_eq!(result, std::ops::ControlFlow::Continue(0));
    }

    #[test]
    fn missing_command_reports_not_found() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        let result = run(&mut env, vec!["exec".to_string(), "nonexistent-command".to_string()]);
        assert_eq!(result, std::ops::ControlFlow::Continue(127));
    }
}
