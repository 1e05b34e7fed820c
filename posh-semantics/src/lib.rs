// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The command executor (`spec.md` §4.5): walks a parsed
//! [`posh_syntax::ast::CompleteCommand`] and drives it to an integer exit
//! status, forking subprocesses for pipelines and external utilities,
//! applying redirections with save/restore, and threading non-local
//! control flow ([`result::Unwind`]) back up through the call stack in
//! place of the reference shell's module-level flag variables (`spec.md`
//! §9's first Design Note).

pub mod builtins;
pub mod command;
pub mod redir;
pub mod result;
pub mod search;
pub mod simple_command;
mod subst;

pub use builtins::{BuiltinInfo, Builtins};
pub use command::{execute_command, execute_complete_command, execute_list, execute_pipeline};
pub use result::{exit_status_code, ExecResult, Unwind};
pub use search::{search, search_path, search_standard_path, Target};

use posh_env::System;

/// Everything the executor needs beyond `Env`: the built-in registry
/// (injected from `posh-builtin` through the [`Builtins`] trait to avoid a
/// dependency cycle) and, via [`posh_expand::CommandSubstituter`], the
/// ability to recursively run a command list for `$(...)`/`` `...` ``.
///
/// `Executor` is rebuilt (not stored in `Env`) at every entry point that
/// needs it, because it borrows the built-in registry mutably for the
/// duration of one [`execute_complete_command`] call.
pub struct Executor<'a, S: System> {
    pub builtins: &'a mut dyn Builtins<S>,
}

impl<'a, S: System> Executor<'a, S> {
    pub fn new(builtins: &'a mut dyn Builtins<S>) -> Self {
        Executor { builtins }
    }
}

impl<'a, S: System> posh_expand::CommandSubstituter<S> for Executor<'a, S> {
    fn substitute(&mut self, env: &mut posh_env::Env<S>, command_text: &str) -> String {
        subst::run_captured(self, env, command_text)
    }
}

/// Runs `text` (e.g. a script file's content, or `eval`/`.`'s argument) as
/// a sequence of complete commands, the way `posh-cli`'s top-level loop
/// and the `eval`/`.`/command-substitution built-ins all need to. Returns
/// the exit status of the last command executed, or an `Unwind` if
/// execution hit `exit`, an unhandled `return`, or an unconsumed
/// `break`/`continue` (a return/break/continue at the top level of a
/// script or `eval` is simply discarded by POSIX shells other than
/// reporting the error; callers that care should match on the result).
pub fn run_program<S: System>(
    source: std::rc::Rc<posh_syntax::source::Source>,
    input: &mut dyn posh_syntax::lexer::LineSource,
    env: &mut posh_env::Env<S>,
    exec: &mut Executor<'_, S>,
) -> ExecResult {
    let mut parser = posh_syntax::parser::Parser::new(source, input);
    let mut status = env.exit_status;
    loop {
        match parser.parse_complete_command() {
            posh_syntax::parser::ParseResult::NoCommand => {
                if parser.is_at_end() {
                    break;
                }
            }
            posh_syntax::parser::ParseResult::Syntax(e) => {
                eprintln!("posh: syntax error: {e}");
                return std::ops::ControlFlow::Continue(2);
            }
            posh_syntax::parser::ParseResult::Match(cc) => match execute_complete_command(&cc, env, exec) {
                std::ops::ControlFlow::Continue(code) => status = code,
                brk => return brk,
            },
        }
    }
    std::ops::ControlFlow::Continue(status)
}
