// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The `command` built-in (`spec.md` §4.6): `-p` searches
//! [`posh_semantics::search::STANDARD_PATH`] instead of `$PATH`; `-v`/`-V`
//! report how the next word would resolve instead of running it; with
//! neither flag, runs the next word the way an ordinary simple command
//! would, except that shell function lookup is skipped (`spec.md` §4.6's
//! "bypassing function lookup").

use posh_env::{Env, System};
use posh_semantics::{search_path, search_standard_path, Builtins, ExecResult};

use crate::common::usage_error;

pub fn run<S: System>(env: &mut Env<S>, args: Vec<String>, builtins: &mut dyn Builtins<S>) -> ExecResult {
    let mut i = 1;
    let mut use_standard_path = false;
    let mut mode = Mode::Run;

    while i < args.len() {
        match args[i].as_str() {
            "-p" => use_standard_path = true,
            "-v" => mode = Mode::Terse,
            "-V" => mode = Mode::Verbose,
            "--" => {
                i += 1;
                break;
            }
            arg if arg.starts_with('-') && arg.len() > 1 => {
                return usage_error("command", format!("{arg}: unknown option"));
            }
            _ => break,
        }
        i += 1;
    }

    let Some(name) = args.get(i) else {
        return usage_error("command", "missing command name");
    };

    match mode {
        Mode::Run => run_bypassing_functions(env, &args[i..], name, use_standard_path, builtins),
        Mode::Terse => describe(env, name, use_standard_path, builtins, false),
        Mode::Verbose => describe(env, name, use_standard_path, builtins, true),
    }
}

enum Mode {
    Run,
    Terse,
    Verbose,
}

fn run_bypassing_functions<S: System>(
    env: &mut Env<S>,
    argv: &[String],
    name: &str,
    use_standard_path: bool,
    builtins: &mut dyn Builtins<S>,
) -> ExecResult {
    if builtins.find(name).is_some() {
        return builtins.run(name, env, argv.to_vec());
    }

    let path = if name.contains('/') {
        std::path::PathBuf::from(name)
    } else if use_standard_path {
        match search_standard_path(name, &env.pwd) {
            Some(path) => path,
            None => {
                eprintln!("{name}: command not found");
                return std::ops::ControlFlow::Continue(127);
            }
        }
    } else {
        match search_path(env, name) {
            Some(path) => path,
            None => {
                eprintln!("{name}: command not found");
                return std::ops::ControlFlow::Continue(127);
            }
        }
    };

    let envp = env.variables.exported_strings();
    match env.system.fork() {
        Ok(posh_env::system::ForkResult::Child) => {
            let status = match env.system.execve(&path, argv, &envp) {
                Ok(never) => match never {},
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => 127,
                Err(_) => 126,
            };
            env.system.exit_process(status);
        }
        Ok(posh_env::system::ForkResult::Parent { child }) => {
            let status = env.system.waitpid(child).map(posh_semantics::exit_status_code).unwrap_or(127);
            return std::ops::ControlFlow::Continue(status);
        }
        Err(_) => {
            eprintln!("{name}: cannot execute: fork not supported");
            return std::ops::ControlFlow::Continue(127);
        }
    }
    std::ops::ControlFlow::Continue(127)
}

fn describe<S: System>(
    env: &Env<S>,
    name: &str,
    use_standard_path: bool,
    builtins: &dyn Builtins<S>,
    verbose: bool,
) -> ExecResult {
    if env.functions.get(name).is_some() {
        println!("{name}");
        return std::ops::ControlFlow::Continue(0);
    }
    if builtins.find(name).is_some() {
        if verbose {
            println!("{name}: a shell built-in");
        } else {
            println!("{name}");
        }
        return std::ops::ControlFlow::Continue(0);
    }
    let found = if name.contains('/') {
        Some(std::path::PathBuf::from(name))
    } else if use_standard_path {
        search_standard_path(name, &env.pwd)
    } else {
        search_path(env, name)
    };
    match found {
        Some(path) => {
            println!("{}", path.display());
            std::ops::ControlFlow::Continue(0)
        }
        None => {
            if verbose {
                eprintln!("{name}: not found");
            }
            std::ops::ControlFlow::Continue(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Registry;
    use posh_env::VirtualSystem;

    #[test]
    fn dash_v_reports_a_builtin_by_name() {
        let env = Env::new(VirtualSystem::default(), "posh");
        let registry = Registry;
        let result = describe(&env, "cd", false, &registry, false);
        assert_eq!(result, std::ops::ControlFlow::Continue(0));
    }

    #[test]
    fn missing_command_name_is_a_usage_error() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        let mut registry = Registry;
        let result = run(&mut env, vec!["command".to_string()], &mut registry);
        assert_eq!(result, std::ops::ControlFlow::Continue(1));
    }
}
