// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The `umask [mask]` built-in: sets or prints the file-creation mask,
//! in octal (`spec.md` §4.6). [`System`] only exposes `umask` as a
//! set-and-return-previous operation, so printing the current mask reads
//! it by setting a throwaway value and immediately restoring it.

use posh_env::{Env, System};
use posh_semantics::ExecResult;

use crate::common::usage_error;

pub fn run<S: System>(env: &mut Env<S>, args: Vec<String>) -> ExecResult {
    if args.len() > 2 {
        return usage_error("umask", "too many operands");
    }
    match args.get(1) {
        None => {
            let current = env.system.umask(0o777);
            env.system.umask(current);
            println!("{current:04o}");
            std::ops::ControlFlow::Continue(0)
        }
        Some(arg) => match u32::from_str_radix(arg, 8) {
            Ok(mask) if mask <= 0o777 => {
                env.system.umask(mask);
                std::ops::ControlFlow::Continue(0)
            }
            _ => usage_error("umask", format!("{arg}: not an octal mask")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posh_env::VirtualSystem;

    #[test]
    fn sets_the_mask() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        let result = run(&mut env, vec!["umask".to_string(), "022".to_string()]);
        assert_eq!(result, std::ops::ControlFlow::Continue(0));
        assert_eq!(env.system.umask(0o777), 0o022);
    }

    #[test]
    fn rejects_a_bad_mask() {
        let mut env = Env::new(VirtualSystem::default(), "posh");
        let result = run(&mut env, vec!["umask".to_string(), "999".to_string()]);
        assert_eq!(result, std::ops::ControlFlow::Continue(1));
    }
}
