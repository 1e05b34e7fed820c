// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! `execute_simple_command` (`spec.md` §4.5's 8-step algorithm), grounded
//! on the reference shell's `yash-semantics/src/command/simple_command.rs`.

use std::path::Path;
use std::rc::Rc;

use posh_env::system::{Fd, ForkResult};
use posh_env::{Env, Scope, System};
use posh_expand::ExpandFlags;
use posh_syntax::ast::SimpleCommand;

use crate::redir;
use crate::result::{ExecResult, Unwind};
use crate::search::{self, Target};
use crate::Executor;

/// Runs one simple command: assignment expansion, word expansion, command
/// search, assignment scoping, redirection, and dispatch.
pub fn execute_simple_command<S: System>(
    cmd: &SimpleCommand,
    env: &mut Env<S>,
    exec: &mut Executor<'_, S>,
) -> ExecResult {
    if cmd.is_empty() {
        return std::ops::ControlFlow::Continue(env.exit_status);
    }

    let mut expanded_assignments = Vec::with_capacity(cmd.assignments.len());
    for assignment in &cmd.assignments {
        let value = match posh_expand::expand_word(&assignment.value, env, exec) {
            Ok(v) => v,
            Err(_) => return std::ops::ControlFlow::Continue(1),
        };
        expanded_assignments.push((assignment.name.clone(), value, assignment.value.location.clone()));
    }

    if cmd.words.is_empty() {
        // Assignment-only command: assignments persist in the global
        // scope (`spec.md` §4.5 step 6's "no command word" case), and any
        // redirections apply and unwind without an actual command to run.
        let saved = match redir::apply_redirections(&cmd.redirections, env, exec, true) {
            Ok(saved) => saved,
            Err(_) => return std::ops::ControlFlow::Continue(1),
        };
        let status = apply_assignments(env, Scope::Global, &expanded_assignments);
        redir::pop_redirections(saved, env);
        return std::ops::ControlFlow::Continue(status);
    }

    let flags = if env.options.is_on(posh_env::Option::NoGlob) {
        ExpandFlags::empty()
    } else {
        ExpandFlags::PATHNAMES
    };
    let mut fields = Vec::new();
    for word in &cmd.words {
        match posh_expand::expand(word, env, exec, flags) {
            Ok(mut words) => fields.append(&mut words),
            Err(_) => return std::ops::ControlFlow::Continue(1),
        }
    }
    if fields.is_empty() {
        // Every word expanded away (e.g. an unset, unquoted `$var`); POSIX
        // treats this the same as an assignment-only command.
        let status = apply_assignments(env, Scope::Global, &expanded_assignments);
        return std::ops::ControlFlow::Continue(status);
    }

    let name = fields[0].clone();
    let target = search::search(env, exec.builtins, &name);

    match target {
        Some(Target::SpecialBuiltin) => {
            apply_assignments(env, Scope::Global, &expanded_assignments);
            let saved = match redir::apply_redirections(&cmd.redirections, env, exec, true) {
                Ok(saved) => saved,
                Err(_) => return std::ops::ControlFlow::Continue(1),
            };
            // `exec` with no operands keeps its redirections for the rest
            // of the shell's life instead of popping them back (`spec.md`
            // §4.6): the save slots are simply abandoned here.
            let is_bare_exec = name == "exec" && fields.len() == 1;
            let result = exec.builtins.run(&name, env, fields);
            if is_bare_exec {
                redir::discard_saved(saved, env);
            } else {
                redir::pop_redirections(saved, env);
            }
            result
        }
        Some(Target::RegularBuiltin) => {
            // A scoped overlay for the assignment prefix (`spec.md` §4.5
            // step 6), but NOT a fresh positional-parameter frame: unlike a
            // function call, `FOO=bar somebuiltin "$1"` must still see the
            // caller's `$1..$N`. `push_context` always starts a pushed
            // overlay with empty positional params, so they're copied
            // forward explicitly right after pushing.
            let outer_params = env.variables.positional_params().to_vec();
            env.variables.push_bare_context();
            env.variables.set_positional_params(outer_params);
            apply_assignments(env, Scope::Local, &expanded_assignments);
            let result = match redir::apply_redirections(&cmd.redirections, env, exec, true) {
                Ok(saved) => {
                    let result = exec.builtins.run(&name, env, fields);
                    redir::pop_redirections(saved, env);
                    result
                }
                Err(_) => std::ops::ControlFlow::Continue(1),
            };
            env.variables.pop_context();
            result
        }
        Some(Target::Function(function)) => {
            env.variables.push_bare_context();
            env.variables.set_positional_params(fields[1..].to_vec());
            apply_assignments(env, Scope::Local, &expanded_assignments);
            let result = match redir::apply_redirections(&cmd.redirections, env, exec, true) {
                Ok(saved) => {
                    let call_guard = function.enter();
                    let saved_loop_depth = env.loop_depth;
                    env.loop_depth = 0;
                    env.call_depth += 1;
                    let result = crate::command::execute_command(&function.body, env, exec);
                    env.call_depth -= 1;
                    env.loop_depth = saved_loop_depth;
                    drop(call_guard);
                    redir::pop_redirections(saved, env);
                    match result {
                        std::ops::ControlFlow::Break(Unwind::Return(status)) => {
                            std::ops::ControlFlow::Continue(status)
                        }
                        std::ops::ControlFlow::Break(Unwind::Break(_) | Unwind::Continue(_)) => {
                            std::ops::ControlFlow::Continue(0)
                        }
                        other => other,
                    }
                }
                Err(_) => std::ops::ControlFlow::Continue(1),
            };
            env.variables.pop_context();
            result
        }
        Some(Target::External { path }) => {
            run_external(&path, &name, fields, &expanded_assignments, &cmd.redirections, env, exec)
        }
        None => {
            eprintln!("{name}: command not found");
            std::ops::ControlFlow::Continue(127)
        }
    }
}

fn apply_assignments<S: System>(
    env: &mut Env<S>,
    scope: Scope,
    assignments: &[(String, String, posh_syntax::source::Location)],
) -> i32 {
    let allexport = env.options.is_on(posh_env::Option::AllExport);
    let mut status = 0;
    for (name, value, location) in assignments {
        let mut var = env.variables.get_or_new(name.clone(), scope);
        match var.assign(value.clone(), location.clone()) {
            Ok(_) => {
                if allexport {
                    var.export(true);
                }
            }
            Err(_err) => status = 1,
        }
    }
    status
}

/// Forks (when supported), applies redirections and assignments in the
/// child's own image, and `execve`s `path`. On `VirtualSystem`, where
/// `fork`/`execve` are always `Unsupported`, this reports `127` (no
/// external command can actually run), matching §5's documented scope-down
/// to the in-process builtins the test harness can observe.
fn run_external<S: System>(
    path: &Path,
    name: &str,
    args: Vec<String>,
    assignments: &[(String, String, posh_syntax::source::Location)],
    redirections: &[posh_syntax::ast::Redirection],
    env: &mut Env<S>,
    exec: &mut Executor<'_, S>,
) -> ExecResult {
    match env.system.fork() {
        Ok(ForkResult::Child) => {
            for (name, value, location) in assignments {
                let _ = env.variables.get_or_new(name.clone(), Scope::Global).assign(value.clone(), location.clone());
            }
            if redir::apply_redirections(redirections, env, exec, false).is_err() {
                let _: std::convert::Infallible = env.system.exit_process(1);
            }
            for fd in 10..20 {
                let _ = env.system.close(Fd(fd));
            }
            let envp = env.variables.exported_strings();
            let status = match env.system.execve(path, &args, &envp) {
                Ok(never) => match never {},
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => 127,
                Err(e) if is_enoexec(&e) => reinterpret_as_script(path, &args, env, exec),
                Err(_) => 126,
            };
            env.system.exit_process(status);
            unreachable!("exit_process does not return")
        }
        Ok(ForkResult::Parent { child }) => {
            let status = env.system.waitpid(child).map(crate::result::exit_status_code).unwrap_or(127);
            std::ops::ControlFlow::Continue(status)
        }
        Err(_) => {
            eprintln!("{name}: cannot execute: fork not supported");
            std::ops::ControlFlow::Continue(127)
        }
    }
}

fn is_enoexec(e: &std::io::Error) -> bool {
    e.raw_os_error() == Some(nix::errno::Errno::ENOEXEC as i32)
}

/// `spec.md` §4.5 step 7 and §9's "process restart via longjmp" note: a
/// file that cannot be `execve`d because it has no recognized executable
/// format is read as a shell script instead, in the already-forked child
/// that was about to run it. This mirrors restarting the top-level loop
/// with new input without the complexity of unwinding the outer loop's own
/// state, since the child has nothing else left to do but exit with
/// whatever status the reinterpreted script produces.
fn reinterpret_as_script<S: System>(path: &Path, args: &[String], env: &mut Env<S>, exec: &mut Executor<'_, S>) -> i32 {
    let content = match read_whole_file(env, path) {
        Ok(content) => content,
        Err(_) => return 126,
    };
    env.variables.set_positional_params(args[1..].to_vec());
    let source = std::rc::Rc::new(posh_syntax::source::Source::File { name: Rc::from(path.to_string_lossy().as_ref()) });
    let mut input = posh_syntax::lexer::StrLines::new(&content);
    match crate::run_program(source, &mut input, env, exec) {
        std::ops::ControlFlow::Continue(status) => status,
        std::ops::ControlFlow::Break(Unwind::Exit(status)) => status,
        std::ops::ControlFlow::Break(_) => 0,
    }
}

fn read_whole_file<S: System>(env: &mut Env<S>, path: &Path) -> std::io::Result<String> {
    let fd = env.system.open(path, posh_env::system::OpenMode::ReadOnly)?;
    let mut bytes = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        match env.system.read(fd, &mut buf) {
            Ok(0) => break,
            Ok(n) => bytes.extend_from_slice(&buf[..n]),
            Err(e) => {
                let _ = env.system.close(fd);
                return Err(e);
            }
        }
    }
    let _ = env.system.close(fd);
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::{BuiltinInfo, Builtins};
    use posh_env::VirtualSystem;
    use posh_syntax::ast::{Assignment, Word};
    use posh_syntax::source::Location;

    struct NoBuiltins;
    impl Builtins<VirtualSystem> for NoBuiltins {
        fn find(&self, _name: &str) -> Option<BuiltinInfo> {
            None
        }
        fn run(&mut self, _name: &str, _env: &mut Env<VirtualSystem>, _args: Vec<String>) -> ExecResult {
            std::ops::ControlFlow::Continue(127)
        }
    }

    fn assignment(name: &str, value: &str) -> Assignment {
        Assignment { name: name.to_string(), value: Word::new(value, Location::dummy()), location: Location::dummy() }
    }

    #[test]
    fn allexport_marks_a_plain_assignment_exported() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        env.options.set(posh_env::Option::AllExport, posh_env::State::On);
        let mut builtins = NoBuiltins;
        let mut exec = Executor::new(&mut builtins);
        let cmd = SimpleCommand { assignments: vec![assignment("FOO", "bar")], words: vec![], redirections: vec![] };
        execute_simple_command(&cmd, &mut env, &mut exec);
        let foo = env.variables.get("FOO").unwrap();
        assert_eq!(foo.value.as_deref(), Some("bar"));
        assert!(foo.is_exported);
    }

    #[test]
    fn without_allexport_a_plain_assignment_stays_unexported() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        let mut builtins = NoBuiltins;
        let mut exec = Executor::new(&mut builtins);
        let cmd = SimpleCommand { assignments: vec![assignment("FOO", "bar")], words: vec![], redirections: vec![] };
        execute_simple_command(&cmd, &mut env, &mut exec);
        assert!(!env.variables.get("FOO").unwrap().is_exported);
    }
}
