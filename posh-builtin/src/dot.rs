// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The `.` (dot) built-in (`spec.md` §4.6): locates `name` on `$PATH`
//! unless it contains a `/`, then parses and executes its content in the
//! current shell (not a subshell), so variable/function definitions and
//! `exit`/`return` all take effect in the caller. Grounded on the
//! reference shell's `yash-builtin::source` module, but built directly on
//! [`posh_semantics::run_program`] rather than its async read-eval loop.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use posh_env::{Env, System};
use posh_semantics::{Builtins, ExecResult, Unwind};
use posh_syntax::lexer::StrLines;
use posh_syntax::source::Source;

use crate::common::failure;

pub fn run<S: System>(env: &mut Env<S>, args: Vec<String>, builtins: &mut dyn Builtins<S>) -> ExecResult {
    let Some(name) = args.get(1) else {
        return failure(".", "missing file operand");
    };

    let path = if name.contains('/') {
        PathBuf::from(name)
    } else {
        match posh_semantics::search_path(env, name) {
            Some(path) => path,
            None => return failure(".", format!("{name}: not found")),
        }
    };

    let content = match read_whole_file(env, &path) {
        Ok(content) => content,
        Err(e) => return failure(".", format!("{name}: {e}")),
    };

    let source = Rc::new(Source::File { name: Rc::from(path.to_string_lossy().as_ref()) });
    let mut input = StrLines::new(&content);
    let mut exec = posh_semantics::Executor::new(builtins);
    env.call_depth += 1;
    let result = posh_semantics::run_program(source, &mut input, env, &mut exec);
    env.call_depth -= 1;
    match result {
        std::ops::ControlFlow::Break(Unwind::Return(status)) => std::ops::ControlFlow::Continue(status),
        other => other,
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
    use crate::Registry;
    use posh_env::system::OpenMode;
    use posh_env::VirtualSystem;

    #[test]
    fn sources_a_file_found_via_a_slash() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        let fd = env.system.open(Path::new("/script.sh"), OpenMode::WriteTruncate).unwrap();
        env.system.write(fd, b"x=1\n").unwrap();
        env.system.close(fd).unwrap();

        let mut registry = Registry;
        let result = run(&mut env, vec![".".to_string(), "/script.sh".to_string()], &mut registry);
        assert_eq!(result, std::ops::ControlFlow::Continue(0));
        assert_eq!(env.variables.get("x").unwrap().value.as_deref(), Some("1"));
    }

    #[test]
    fn missing_file_is_reported() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        let mut registry = Registry;
        let result = run(&mut env, vec![".".to_string(), "/does-not-exist".to_string()], &mut registry);
        assert_eq!(result, std::ops::ControlFlow::Continue(1));
    }
}
