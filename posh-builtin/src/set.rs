// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The `set` built-in (`spec.md` §4.6): `-o name`/`+o name` and short
//! flags toggle [`posh_env::Option`]s; a bare operand list (introduced by
//! `--` or simply the first non-option argument) replaces the positional
//! parameters; with no operands at all, lists every variable.

use posh_env::{Env, State, System};
use posh_semantics::ExecResult;

use crate::common::usage_error;

pub fn run<S: System>(env: &mut Env<S>, args: Vec<String>) -> ExecResult {
    let mut i = 1;
    let mut replace_positional = false;

    while i < args.len() {
        let arg = &args[i];
        if arg == "--" {
            i += 1;
            replace_positional = true;
            break;
        }
        if arg == "-o" || arg == "+o" {
            let state = if arg.starts_with('-') { State::On } else { State::Off };
            let Some(name) = args.get(i + 1) else {
                return usage_error("set", "-o/+o requires an option name");
            };
            match posh_env::OptionSet::from_long_name(name) {
                Some(opt) if opt.is_modifiable() => env.options.set(opt, state),
                Some(_) => return usage_error("set", format!("{name}: not modifiable")),
                None => return usage_error("set", format!("{name}: no such option")),
            }
            i += 2;
            continue;
        }
        if arg.len() > 1 && (arg.starts_with('-') || arg.starts_with('+')) {
            let state = if arg.starts_with('-') { State::On } else { State::Off };
            for c in arg[1..].chars() {
                match posh_env::OptionSet::from_short_name(c) {
                    Some(opt) if opt.is_modifiable() => env.options.set(opt, state),
                    Some(_) => return usage_error("set", format!("-{c}: not modifiable")),
                    None => return usage_error("set", format!("-{c}: unknown option")),
                }
            }
            i += 1;
            continue;
        }
        replace_positional = true;
        break;
    }

    if replace_positional {
        env.variables.set_positional_params(args[i..].to_vec());
    } else if args.len() == 1 {
        let mut names: Vec<(String, Option<String>)> =
            env.variables.iter().map(|(name, v)| (name.to_string(), v.value.clone())).collect();
        names.sort();
        for (name, value) in names {
            println!("{name}={}", value.unwrap_or_default());
        }
    }
    std::ops::ControlFlow::Continue(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use posh_env::VirtualSystem;

    #[test]
    fn dash_e_turns_on_errexit() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        run(&mut env, vec!["set".to_string(), "-e".to_string()]);
        assert_eq!(env.options.get(posh_env::Option::ErrExit), State::On);
    }

    #[test]
    fn double_dash_replaces_positional_parameters() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        run(&mut env, vec!["set".to_string(), "--".to_string(), "one".to_string(), "two".to_string()]);
        assert_eq!(env.variables.positional_params(), ["one", "two"]);
    }

    #[test]
    fn bare_operands_also_replace_positional_parameters() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        run(&mut env, vec!["set".to_string(), "a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(env.variables.positional_params(), ["a", "b", "c"]);
    }

    #[test]
    fn plus_o_turns_off_a_long_named_option() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        env.options.set(posh_env::Option::NoUnset, State::On);
        run(&mut env, vec!["set".to_string(), "+o".to_string(), "nounset".to_string()]);
        assert_eq!(env.options.get(posh_env::Option::NoUnset), State::Off);
    }
}
