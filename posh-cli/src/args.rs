// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! Command-line argument parsing (`spec.md` §6), grounded on the reference
//! shell's `yash::startup::args` module but trimmed to this crate's scope:
//! no login-shell profile/rcfile handling, and `-c` is accepted only to be
//! reported as not yet implemented, matching `spec.md` §6's own note.

use posh_env::option::{Option as ShellOption, OptionSet, State};
use thiserror::Error;

/// Input to the main read-eval loop.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Source {
    /// Read from standard input (default, or explicit `-s`).
    Stdin,
    /// Read from the named script file.
    File { path: String },
}

/// Parsed configuration for starting the shell.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Run {
    pub source: Source,
    pub options: Vec<(ShellOption, State)>,
    /// `$0`.
    pub arg0: String,
    /// `$1..`.
    pub positional_params: Vec<String>,
}

/// Result of parsing the command line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Parse {
    Run(Run),
    Help,
    Version,
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("unknown option `-{0}`")]
    UnknownShortOption(char),
    #[error("option `-o`/`+o` requires an option name")]
    MissingOptionArgument,
    #[error("`{0}`: no such option")]
    NoSuchOption(String),
    #[error("the `-c` option is not yet implemented")]
    CNotImplemented,
}

/// Parses `args` (including `argv[0]`) into a [`Parse`].
pub fn parse<I, S>(args: I) -> Result<Parse, Error>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::into);
    let arg0 = args.next().unwrap_or_else(|| "posh".to_string());

    let mut run = Run { source: Source::Stdin, options: Vec::new(), arg0: arg0.clone(), positional_params: Vec::new() };
    let mut explicit_stdin = false;
    let mut rest: Vec<String> = args.collect();
    let mut i = 0;

    while i < rest.len() {
        let arg = rest[i].clone();
        match arg.as_str() {
            "--" => {
                rest.remove(i);
                break;
            }
            "--help" => return Ok(Parse::Help),
            "--version" => return Ok(Parse::Version),
            "-s" => {
                explicit_stdin = true;
                rest.remove(i);
            }
            "-i" => {
                run.options.push((ShellOption::Interactive, State::On));
                rest.remove(i);
            }
            "-m" => {
                run.options.push((ShellOption::Monitor, State::On));
                rest.remove(i);
            }
            "-c" => return Err(Error::CNotImplemented),
            "-o" | "+o" => {
                let state = if arg == "-o" { State::On } else { State::Off };
                rest.remove(i);
                if i >= rest.len() {
                    return Err(Error::MissingOptionArgument);
                }
                let name = rest.remove(i);
                let option = OptionSet::from_long_name(&name).ok_or(Error::NoSuchOption(name))?;
                run.options.push((option, state));
            }
            _ if arg.len() > 1 && (arg.starts_with('-') || arg.starts_with('+')) => {
                let state = if arg.starts_with('-') { State::On } else { State::Off };
                for c in arg[1..].chars() {
                    let option = OptionSet::from_short_name(c).ok_or(Error::UnknownShortOption(c))?;
                    run.options.push((option, state));
                }
                rest.remove(i);
            }
            _ => break,
        }
    }

    if !explicit_stdin && !rest.is_empty() {
        let path = rest.remove(0);
        run.arg0 = path.clone();
        run.source = Source::File { path };
    }
    run.positional_params = rest;

    Ok(Parse::Run(run))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_operands_reads_stdin() {
        let result = parse(["posh"]).unwrap();
        assert_eq!(result, Parse::Run(Run { source: Source::Stdin, options: vec![], arg0: "posh".into(), positional_params: vec![] }));
    }

    #[test]
    fn a_bare_operand_is_a_script_path() {
        let result = parse(["posh", "script.sh", "a", "b"]).unwrap();
        match result {
            Parse::Run(run) => {
                assert_eq!(run.source, Source::File { path: "script.sh".into() });
                assert_eq!(run.arg0, "script.sh");
                assert_eq!(run.positional_params, vec!["a".to_string(), "b".to_string()]);
            }
            _ => panic!("expected Run"),
        }
    }

    #[test]
    fn dash_s_forces_stdin_even_with_operands() {
        let result = parse(["posh", "-s", "a", "b"]).unwrap();
        match result {
            Parse::Run(run) => {
                assert_eq!(run.source, Source::Stdin);
                assert_eq!(run.positional_params, vec!["a".to_string(), "b".to_string()]);
            }
            _ => panic!("expected Run"),
        }
    }

    #[test]
    fn dash_c_is_reported_as_unimplemented() {
        let result = parse(["posh", "-c", "echo hi"]);
        assert_eq!(result, Err(Error::CNotImplemented));
    }

    #[test]
    fn combined_short_flags_toggle_options() {
        let result = parse(["posh", "-ex"]).unwrap();
        match result {
            Parse::Run(run) => {
                assert_eq!(run.options, vec![(ShellOption::ErrExit, State::On), (ShellOption::XTrace, State::On)]);
            }
            _ => panic!("expected Run"),
        }
    }

    #[test]
    fn plus_inverts_a_combined_flag() {
        let result = parse(["posh", "+e"]).unwrap();
        match result {
            Parse::Run(run) => assert_eq!(run.options, vec![(ShellOption::ErrExit, State::Off)]),
            _ => panic!("expected Run"),
        }
    }

    #[test]
    fn double_dash_stops_option_parsing() {
        let result = parse(["posh", "--", "-x"]).unwrap();
        match result {
            Parse::Run(run) => {
                assert_eq!(run.source, Source::File { path: "-x".into() });
            }
            _ => panic!("expected Run"),
        }
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(parse(["posh", "--help"]).unwrap(), Parse::Help);
        assert_eq!(parse(["posh", "--version"]).unwrap(), Parse::Version);
    }
}
