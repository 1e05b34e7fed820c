// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! Command-tree execution: `execute_list`/`execute_pipeline`/
//! `execute_command` and the compound-command forms they dispatch to
//! (`spec.md` §4.5), grounded on the reference shell's
//! `yash-semantics/src/command.rs` and `command_impl/{for_loop,if_cmd,
//! case,subshell,while_until}.rs`.

use std::rc::Rc;

use posh_env::system::{Fd, ForkResult};
use posh_env::{Env, Function, System};
use posh_syntax::ast::{
    CaseItem, Command, CommandKind, CompleteCommand, ElifThen, List, Pipeline, Sep, Word,
};
use posh_syntax::source::Location;

use crate::redir;
use crate::result::{exit_status_code, unwind_status, ExecResult, Unwind};
use crate::Executor;

/// Runs a whole parsed command (`spec.md` §4.5's entry point), i.e. one
/// `list` plus a trailing newline.
pub fn execute_complete_command<S: System>(
    cc: &CompleteCommand,
    env: &mut Env<S>,
    exec: &mut Executor<'_, S>,
) -> ExecResult {
    execute_list(&cc.list, env, exec, true)
}

/// Runs every pipeline in `list` in order, honoring `&&`/`||` short
/// circuiting (`spec.md` §4.5's `execute_list`).
///
/// `check_errexit` is false while `list` is being evaluated as an
/// `if`/`while`/`until` condition: POSIX exempts a command whose exit
/// status is being tested, directly or as a non-final link of an
/// `&&`/`||` chain, from triggering `errexit`.
pub fn execute_list<S: System>(
    list: &List,
    env: &mut Env<S>,
    exec: &mut Executor<'_, S>,
    check_errexit: bool,
) -> ExecResult {
    let mut status = env.exit_status;
    let mut skip_next = false;
    for (i, pipeline) in list.pipelines.iter().enumerate() {
        let sep = list.separators.get(i).copied().unwrap_or(Sep::Semi);
        if skip_next {
            skip_next = match sep {
                Sep::And => status != 0,
                Sep::Or => status == 0,
                Sep::Semi => false,
            };
            continue;
        }

        status = match execute_pipeline(pipeline, env, exec) {
            std::ops::ControlFlow::Continue(s) => s,
            brk => return brk,
        };
        env.exit_status = status;

        let tested_by_chain = matches!(sep, Sep::And | Sep::Or);
        if check_errexit
            && !tested_by_chain
            && !pipeline.negated
            && status != 0
            && env.options.is_on(posh_env::Option::ErrExit)
        {
            return std::ops::ControlFlow::Break(Unwind::Exit(status));
        }

        skip_next = match sep {
            Sep::And => status != 0,
            Sep::Or => status == 0,
            Sep::Semi => false,
        };
    }
    std::ops::ControlFlow::Continue(status)
}

/// Runs one pipeline (`spec.md` §4.5's `execute_pipeline`): a single
/// command runs inline with no fork; two or more are connected with pipes,
/// one child process per command. The pipeline's status is the last
/// command's, logically negated if the pipeline was prefixed with `!`.
pub fn execute_pipeline<S: System>(pipeline: &Pipeline, env: &mut Env<S>, exec: &mut Executor<'_, S>) -> ExecResult {
    let status = if pipeline.commands.len() == 1 {
        match execute_command(&pipeline.commands[0], env, exec) {
            std::ops::ControlFlow::Continue(s) => s,
            brk => return brk,
        }
    } else {
        run_piped(&pipeline.commands, env, exec)
    };
    let status = if pipeline.negated { i32::from(status == 0) } else { status };
    std::ops::ControlFlow::Continue(status)
}

/// Forks one child per command, wiring each one's stdin/stdout to the
/// previous/next pipe (`spec.md` §4.5/§5: "every command runs in a
/// distinct child process"; "the parent reaps all children before
/// returning"). Returns the last command's exit status.
///
/// `System::fork` being unsupported (`VirtualSystem`, used by this
/// workspace's own tests) means a pipeline of more than one command can't
/// actually run under the in-memory harness; that is an accepted,
/// documented gap (see DESIGN.md) since exercising real multi-process
/// pipelines needs `RealSystem`, which `posh-cli`'s integration tests use.
fn run_piped<S: System>(commands: &[Command], env: &mut Env<S>, exec: &mut Executor<'_, S>) -> i32 {
    let n = commands.len();
    let mut prev_read: Option<Fd> = None;
    let mut children = Vec::with_capacity(n);

    for (i, command) in commands.iter().enumerate() {
        let is_last = i + 1 == n;
        let next_pipe = if is_last {
            None
        } else {
            match env.system.pipe() {
                Ok(pair) => Some(pair),
                Err(_) => {
                    eprintln!("posh: cannot create pipe");
                    break;
                }
            }
        };

        match env.system.fork() {
            Ok(ForkResult::Child) => {
                if let Some(read) = prev_read {
                    let _ = env.system.dup2(read, Fd::STDIN);
                    let _ = env.system.close(read);
                }
                if let Some((read, write)) = next_pipe {
                    let _ = env.system.close(read);
                    let _ = env.system.dup2(write, Fd::STDOUT);
                    let _ = env.system.close(write);
                }
                let status = unwind_status(execute_command(command, env, exec));
                let _: std::convert::Infallible = env.system.exit_process(status);
            }
            Ok(ForkResult::Parent { child }) => {
                children.push(child);
                if let Some(read) = prev_read {
                    let _ = env.system.close(read);
                }
                prev_read = next_pipe.map(|(read, write)| {
                    let _ = env.system.close(write);
                    read
                });
            }
            Err(_) => {
                eprintln!("posh: cannot fork for pipeline");
                if let Some((read, write)) = next_pipe {
                    let _ = env.system.close(read);
                    let _ = env.system.close(write);
                }
                break;
            }
        }
    }
    if let Some(read) = prev_read {
        let _ = env.system.close(read);
    }

    let mut status = 127;
    let last = children.len().saturating_sub(1);
    for (i, child) in children.iter().enumerate() {
        let exit_status = env.system.waitpid(*child).map(exit_status_code).unwrap_or(127);
        if i == last {
            status = exit_status;
        }
    }
    status
}

/// Runs one command node, dispatching to the simple-command path or to a
/// compound form (`spec.md` §4.5's `execute_command`).
pub fn execute_command<S: System>(command: &Command, env: &mut Env<S>, exec: &mut Executor<'_, S>) -> ExecResult {
    match &command.kind {
        CommandKind::Simple(sc) => crate::simple_command::execute_simple_command(sc, env, exec),
        CommandKind::FunctionDef { name, body } => define_function(name, body, &command.location, env),
        kind => execute_compound(kind, &command.redirections, env, exec),
    }
}

fn define_function<S: System>(name: &str, body: &Command, location: &Location, env: &mut Env<S>) -> ExecResult {
    let function = Function::new(name, Rc::new(body.clone()), location.clone());
    match env.functions.define(function) {
        Ok(()) => std::ops::ControlFlow::Continue(0),
        Err(e) => {
            eprintln!("posh: {e}");
            std::ops::ControlFlow::Continue(1)
        }
    }
}

/// Applies a compound command's own redirections (wrapping the whole
/// construct, per `spec.md` §3) with save/restore around its execution,
/// per `spec.md` §4.5: "on any failure, pop all saved fds and return 1."
fn execute_compound<S: System>(
    kind: &CommandKind,
    redirections: &[posh_syntax::ast::Redirection],
    env: &mut Env<S>,
    exec: &mut Executor<'_, S>,
) -> ExecResult {
    let saved = match redir::apply_redirections(redirections, env, exec, true) {
        Ok(saved) => saved,
        Err(e) => {
            eprintln!("posh: {e}");
            return std::ops::ControlFlow::Continue(1);
        }
    };
    let result = match kind {
        CommandKind::Simple(_) | CommandKind::FunctionDef { .. } => unreachable!("handled in execute_command"),
        CommandKind::BraceGroup(list) => execute_list(list, env, exec, true),
        CommandKind::Subshell(list) => execute_subshell(list, env, exec),
        CommandKind::For { name, words, body } => execute_for(name, words.as_deref(), body, env, exec),
        CommandKind::If { arms, else_body } => execute_if(arms, else_body.as_ref(), env, exec),
        CommandKind::While { condition, body } => execute_loop(condition, body, true, env, exec),
        CommandKind::Until { condition, body } => execute_loop(condition, body, false, env, exec),
        CommandKind::Case { word, items } => execute_case(word, items, env, exec),
    };
    redir::pop_redirections(saved, env);
    result
}

/// `(list)`: runs in a child process so that variable/option/cwd changes
/// are invisible to the parent (`spec.md` §3's Subshell definition).
/// Falls back to running in-process, sharing `env`, when `fork` isn't
/// available — see `subst::run_captured`'s module docs for the same
/// tradeoff applied to command substitution.
fn execute_subshell<S: System>(list: &List, env: &mut Env<S>, exec: &mut Executor<'_, S>) -> ExecResult {
    match env.system.fork() {
        Ok(ForkResult::Child) => {
            let saved_loop_depth = env.loop_depth;
            env.loop_depth = 0;
            let status = unwind_status(execute_list(list, env, exec, true));
            env.loop_depth = saved_loop_depth;
            let _: std::convert::Infallible = env.system.exit_process(status);
        }
        Ok(ForkResult::Parent { child }) => {
            let status = env.system.waitpid(child).map(exit_status_code).unwrap_or(127);
            std::ops::ControlFlow::Continue(status)
        }
        Err(_) => {
            let saved_loop_depth = env.loop_depth;
            env.loop_depth = 0;
            let result = execute_list(list, env, exec, true);
            env.loop_depth = saved_loop_depth;
            result
        }
    }
}

/// `for name [in word...]; do body; done` (`spec.md` §4.5). Absent an
/// `in word...` clause, POSIX iterates the positional parameters instead.
fn execute_for<S: System>(
    name: &str,
    words: Option<&[Word]>,
    body: &List,
    env: &mut Env<S>,
    exec: &mut Executor<'_, S>,
) -> ExecResult {
    let items: Vec<String> = match words {
        Some(words) => {
            let mut fields = Vec::new();
            for word in words {
                match posh_expand::expand(word, env, exec, posh_expand::ExpandFlags::PATHNAMES) {
                    Ok(mut fs) => fields.append(&mut fs),
                    Err(e) => {
                        eprintln!("posh: {e}");
                        return std::ops::ControlFlow::Continue(1);
                    }
                }
            }
            fields
        }
        None => env.variables.positional_params().to_vec(),
    };

    env.loop_depth += 1;
    let mut status = env.exit_status;
    let outcome = 'items: {
        for item in items {
            if env
                .variables
                .get_or_new(name.to_string(), posh_env::Scope::Global)
                .assign(item, None)
                .is_err()
            {
                eprintln!("posh: {name}: cannot assign to read-only variable");
                break 'items std::ops::ControlFlow::Continue(1);
            }
            match execute_list(body, env, exec, true) {
                std::ops::ControlFlow::Continue(s) => status = s,
                std::ops::ControlFlow::Break(Unwind::Break(depth)) => {
                    if depth > 1 {
                        break 'items std::ops::ControlFlow::Break(Unwind::Break(depth - 1));
                    }
                    break;
                }
                std::ops::ControlFlow::Break(Unwind::Continue(depth)) => {
                    if depth > 1 {
                        break 'items std::ops::ControlFlow::Break(Unwind::Continue(depth - 1));
                    }
                    status = env.exit_status;
                    continue;
                }
                brk => break 'items brk,
            }
        }
        std::ops::ControlFlow::Continue(status)
    };
    env.loop_depth -= 1;
    outcome
}

/// `if cond; then body; elif cond; then body...; [else body]; fi`.
fn execute_if<S: System>(
    arms: &[ElifThen],
    else_body: Option<&List>,
    env: &mut Env<S>,
    exec: &mut Executor<'_, S>,
) -> ExecResult {
    for arm in arms {
        let cond_status = match execute_list(&arm.condition, env, exec, false) {
            std::ops::ControlFlow::Continue(s) => s,
            brk => return brk,
        };
        if cond_status == 0 {
            return execute_list(&arm.body, env, exec, true);
        }
    }
    match else_body {
        Some(body) => execute_list(body, env, exec, true),
        None => std::ops::ControlFlow::Continue(0),
    }
}

/// `while`/`until cond; do body; done`, sharing one implementation since
/// they differ only in which polarity of the condition's status keeps the
/// loop going (`spec.md` §4.5's `executeWhile/Until`).
fn execute_loop<S: System>(
    condition: &List,
    body: &List,
    is_while: bool,
    env: &mut Env<S>,
    exec: &mut Executor<'_, S>,
) -> ExecResult {
    env.loop_depth += 1;
    let mut status = 0;
    let outcome = 'loop_: loop {
        let cond_status = match execute_list(condition, env, exec, false) {
            std::ops::ControlFlow::Continue(s) => s,
            brk => break 'loop_ brk,
        };
        if (cond_status == 0) != is_while {
            break 'loop_ std::ops::ControlFlow::Continue(status);
        }
        match execute_list(body, env, exec, true) {
            std::ops::ControlFlow::Continue(s) => status = s,
            std::ops::ControlFlow::Break(Unwind::Break(depth)) => {
                if depth > 1 {
                    break 'loop_ std::ops::ControlFlow::Break(Unwind::Break(depth - 1));
                }
                break 'loop_ std::ops::ControlFlow::Continue(status);
            }
            std::ops::ControlFlow::Break(Unwind::Continue(depth)) => {
                if depth > 1 {
                    break 'loop_ std::ops::ControlFlow::Break(Unwind::Continue(depth - 1));
                }
                status = env.exit_status;
                continue;
            }
            brk => break 'loop_ brk,
        }
    };
    env.loop_depth -= 1;
    outcome
}

/// `case word in pattern...) body;; ...esac` (`spec.md` §4.5's
/// `executeCase`): the first item with a matching pattern runs; a
/// `;&`-terminated item falls through unconditionally into the next.
fn execute_case<S: System>(
    word: &Word,
    items: &[CaseItem],
    env: &mut Env<S>,
    exec: &mut Executor<'_, S>,
) -> ExecResult {
    let subject = match posh_expand::expand_word(word, env, exec) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("posh: {e}");
            return std::ops::ControlFlow::Continue(1);
        }
    };

    let mut start = None;
    'find: for (i, item) in items.iter().enumerate() {
        for pattern in &item.patterns {
            let pattern_text = match posh_expand::expand_word(pattern, env, exec) {
                Ok(p) => p,
                Err(_) => continue,
            };
            if posh_fnmatch::matches(&subject, &pattern_text) {
                start = Some(i);
                break 'find;
            }
        }
    }
    let Some(mut i) = start else {
        return std::ops::ControlFlow::Continue(0);
    };

    let mut status = 0;
    loop {
        if let Some(body) = &items[i].body {
            status = match execute_list(body, env, exec, true) {
                std::ops::ControlFlow::Continue(s) => s,
                brk => return brk,
            };
        }
        if items[i].fallthrough && i + 1 < items.len() {
            i += 1;
            continue;
        }
        break;
    }
    std::ops::ControlFlow::Continue(status)
}
