// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The shell's process entry point (`spec.md` §6): parses the command
//! line, builds the top-level [`Env`], and drives
//! [`posh_semantics::run_program`] over either standard input or a script
//! file until it reports an exit status or an `exit` built-in fires.
//!
//! Grounded on the reference shell's `yash`/`yash-cli` binary crates, but
//! collapsed to a single synchronous loop: this crate's executor has no
//! cooperative scheduler to drive, so there is no `LocalPool`/`select`
//! event loop to set up around it (see DESIGN.md).

mod args;

use std::io::Write as _;
use std::rc::Rc;

use posh_builtin::Registry;
use posh_env::system::{Fd, OpenMode};
use posh_env::{Env, RealSystem, System};
use posh_semantics::{run_program, Executor, Unwind};
use posh_syntax::lexer::LineSource;
use posh_syntax::source::Source;

use args::{Parse, Run, Source as ArgsSource};

const USAGE: &str = "\
usage: posh [options] [script [args...]]
  -i            run interactively
  -s            read commands from standard input
  -m            enable job control reporting
  -o name       enable a shell option by name
  +o name       disable a shell option by name
  -abCefhmnuvx  enable the corresponding short-named shell option
  +abCefhmnuvx  disable the corresponding short-named shell option
  --help        print this message and exit
  --version     print the version number and exit
";

/// Feeds a lexer one line at a time from standard input, printing a prompt
/// first when the shell is interactive (`spec.md` §6).
struct StdinLines {
    interactive: bool,
}

impl LineSource for StdinLines {
    fn next_line(&mut self, new_command: bool) -> Option<String> {
        if self.interactive {
            let prompt = if new_command { "$ " } else { "> " };
            print!("{prompt}");
            let _ = std::io::stdout().flush();
        }
        let mut line = String::new();
        match std::io::stdin().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                }
                Some(line)
            }
            Err(_) => None,
        }
    }
}

fn main() {
    let status = run();
    std::process::exit(status);
}

fn run() -> i32 {
    let run = match args::parse(std::env::args()) {
        Ok(Parse::Help) => {
            print!("{USAGE}");
            return 0;
        }
        Ok(Parse::Version) => {
            println!("posh {}", env!("CARGO_PKG_VERSION"));
            return 0;
        }
        Ok(Parse::Run(run)) => run,
        Err(e) => {
            eprintln!("posh: {e}");
            return 2;
        }
    };

    let mut env = Env::new(RealSystem, run.arg0.clone());
    for (name, value) in std::env::vars() {
        let mut var = env.variables.get_or_new(name, posh_env::Scope::Global);
        let _ = var.assign(value, None);
        var.export(true);
    }
    for (option, state) in &run.options {
        env.options.set(*option, *state);
    }
    env.variables.set_positional_params(run.positional_params.clone());

    if should_be_interactive(&env, &run) {
        env.options.set(posh_env::Option::Interactive, posh_env::State::On);
    }
    let interactive = env.options.is_on(posh_env::Option::Interactive);

    let mut registry = Registry;
    let mut exec = Executor::new(&mut registry);

    let result = match &run.source {
        ArgsSource::Stdin => {
            let source = Rc::new(Source::Stdin);
            let mut input = StdinLines { interactive };
            run_program(source, &mut input, &mut env, &mut exec)
        }
        ArgsSource::File { path } => match read_whole_file(&mut env, path) {
            Ok(content) => {
                let source = Rc::new(Source::File { name: Rc::from(path.as_str()) });
                let mut input = posh_syntax::lexer::StrLines::new(&content);
                run_program(source, &mut input, &mut env, &mut exec)
            }
            Err(e) => {
                eprintln!("{}: {path}: {e}", run.arg0);
                let status = match e.kind() {
                    std::io::ErrorKind::NotFound => 127,
                    _ => 126,
                };
                std::ops::ControlFlow::Continue(status)
            }
        },
    };

    run_exit_trap(&mut env, &mut registry);

    match result {
        std::ops::ControlFlow::Continue(status) => status,
        std::ops::ControlFlow::Break(Unwind::Exit(status)) => status,
        // `exit`/`return`/`break`/`continue` left unconsumed at the top
        // level simply end the shell with the last known status
        // (`spec.md` §6's "shell itself exits with `lastStatus` on EOF").
        std::ops::ControlFlow::Break(_) => env.exit_status,
    }
}

/// `spec.md` §6: "If no script and no `-c` and stdin/stderr are both
/// TTYs, the shell enters interactive mode."
fn should_be_interactive<S: System>(env: &Env<S>, run: &Run) -> bool {
    if run.options.iter().any(|&(o, _)| o == posh_env::Option::Interactive) {
        return false;
    }
    if run.source != ArgsSource::Stdin {
        return false;
    }
    if !run.positional_params.is_empty() {
        return false;
    }
    env.system.isatty(Fd::STDIN) && env.system.isatty(Fd::STDERR)
}

fn read_whole_file<S: System>(env: &mut Env<S>, path: &str) -> std::io::Result<String> {
    let fd = env.system.open(std::path::Path::new(path), OpenMode::ReadOnly)?;
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

/// Runs the `EXIT` trap, if one is set, once the main loop has finished
/// (`spec.md` §5's trap-delivery note extended to cover shell exit).
fn run_exit_trap<S: System>(env: &mut Env<S>, registry: &mut Registry) {
    let Some(posh_env::Action::Command(command)) = env.traps.get(posh_env::trap::EXIT).cloned() else {
        return;
    };
    let mut text = command;
    text.push('\n');
    let source = Rc::new(Source::Eval { parent: Box::new(Source::Unknown) });
    let mut input = posh_syntax::lexer::StrLines::new(&text);
    let mut exec = Executor::new(registry);
    if let std::ops::ControlFlow::Continue(status) = run_program(source, &mut input, env, &mut exec) {
        env.exit_status = status;
    }
}
