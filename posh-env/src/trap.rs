// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The `trap` built-in's state: which action is registered for which
//! signal name (or the pseudo-signal `EXIT`).
//!
//! `spec.md` §4.6 lists `trap` among the required built-ins but scopes
//! signal-name tables and job control out of the core (§1's Non-goals);
//! this crate has no `System::signal`/`sigaction` primitive (see
//! `system::System`'s doc comment), so actual asynchronous delivery of a
//! caught signal mid-command is out of scope here. What this module
//! (and `posh-builtin`'s `trap`) does provide is the part that is
//! observable without real signal delivery: handlers are recorded,
//! `trap` with no arguments lists them back in the `trap -- 'command'
//! name` format POSIX specifies, and the `EXIT` pseudo-signal's handler
//! is run by `posh-cli`'s top-level loop when the shell actually exits,
//! which needs no asynchronous delivery at all. See DESIGN.md.

use std::collections::BTreeMap;

/// What happens when a trapped condition fires.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Action {
    /// `trap - NAME`: restore the default disposition.
    Default,
    /// `trap '' NAME`: ignore the condition entirely.
    Ignore,
    /// `trap 'command' NAME`: run `command` (parsed and executed the way
    /// `eval`'s argument is) when the condition fires.
    Command(String),
}

/// The pseudo-signal name for "the shell is exiting", alongside real
/// signal names like `INT`/`TERM`.
pub const EXIT: &str = "EXIT";

/// Handlers currently installed, keyed by signal name (without the `SIG`
/// prefix) or [`EXIT`].
#[derive(Clone, Debug, Default)]
pub struct TrapSet {
    handlers: BTreeMap<String, Action>,
}

impl TrapSet {
    pub fn new() -> Self {
        Default::default()
    }

    /// Installs (or removes, for [`Action::Default`]) a handler.
    pub fn set(&mut self, name: impl Into<String>, action: Action) {
        let name = name.into();
        if action == Action::Default {
            self.handlers.remove(&name);
        } else {
            self.handlers.insert(name, action);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Action> {
        self.handlers.get(name)
    }

    /// Every handler currently installed, in name order, for `trap`'s
    /// bare listing form.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Action)> {
        self.handlers.iter().map(|(name, action)| (name.as_str(), action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_default_removes_handler() {
        let mut traps = TrapSet::new();
        traps.set("INT", Action::Command("echo hi".to_string()));
        assert!(traps.get("INT").is_some());
        traps.set("INT", Action::Default);
        assert!(traps.get("INT").is_none());
    }

    #[test]
    fn iter_lists_every_installed_handler() {
        let mut traps = TrapSet::new();
        traps.set(EXIT, Action::Command("echo bye".to_string()));
        traps.set("TERM", Action::Ignore);
        let mut names: Vec<&str> = traps.iter().map(|(n, _)| n).collect();
        names.sort();
        assert_eq!(names, vec!["EXIT", "TERM"]);
    }
}
