// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! Parameter lookup and the four colon-modifier forms named in `spec.md`
//! §4.4: `${name:-word}`, `${name:=word}`, `${name:?word}`, `${name:+word}`.

use posh_env::{Env, System};

/// Looks up a shell/special parameter's current value. `None` means
/// unset; `Some(String::new())` means set but null, which is the
/// distinction the colon-modifiers above all key off of.
pub fn lookup<S: System>(name: &str, env: &Env<S>) -> std::option::Option<String> {
    match name {
        "?" => Some(env.exit_status.to_string()),
        "#" => Some(env.variables.positional_params().len().to_string()),
        "$" => Some(env.system.getpid().to_string()),
        "!" => None,
        "-" => Some(active_flags_string(env)),
        "@" | "*" => Some(env.variables.positional_params().join(" ")),
        "0" => Some(env.shell_name.clone()),
        _ if !name.is_empty() && name.chars().all(|c| c.is_ascii_digit()) => {
            let index: usize = name.parse().ok()?;
            if index == 0 {
                return Some(env.shell_name.clone());
            }
            env.variables.positional_params().get(index - 1).cloned()
        }
        _ => env.variables.get(name).and_then(|v| v.value.clone()),
    }
}

/// `$@`, expanded as its own field list (the common "pass all arguments
/// through" whole-word case `crate::scan` special-cases before falling
/// back to `lookup`'s space-joined rendering for any other occurrence).
pub fn positional_fields<S: System>(env: &Env<S>) -> Vec<String> {
    env.variables.positional_params().to_vec()
}

fn active_flags_string<S: System>(env: &Env<S>) -> String {
    use posh_env::Option as ShellOption;
    let mut s = String::new();
    for (opt, flag) in [
        (ShellOption::AllExport, 'a'),
        (ShellOption::NoClobber, 'C'),
        (ShellOption::ErrExit, 'e'),
        (ShellOption::HashAll, 'h'),
        (ShellOption::Monitor, 'm'),
        (ShellOption::NoExec, 'n'),
        (ShellOption::NoUnset, 'u'),
        (ShellOption::Verbose, 'v'),
        (ShellOption::XTrace, 'x'),
    ] {
        if env.options.is_on(opt) {
            s.push(flag);
        }
    }
    s
}

/// One of the four colon-conditioned modifiers `${name:X word}` supports.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Modifier {
    /// `${name:-word}`: substitute `word` if `name` is unset or null.
    UseDefault,
    /// `${name:=word}`: as above, and also assign `word` to `name`.
    AssignDefault,
    /// `${name:?word}`: error with `word` (or a default message) if
    /// `name` is unset or null.
    Error,
    /// `${name:+word}`: substitute `word` if `name` is set and non-null,
    /// else the empty string.
    UseAlternate,
}

impl Modifier {
    pub fn from_char(c: char) -> std::option::Option<Modifier> {
        Some(match c {
            '-' => Modifier::UseDefault,
            '=' => Modifier::AssignDefault,
            '?' => Modifier::Error,
            '+' => Modifier::UseAlternate,
            _ => return None,
        })
    }
}
