// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! Shell options (`spec.md` §3's `ShellOptions`).
//!
//! This module only tracks whether each option is on or off; changing shell
//! behavior accordingly is every other crate's responsibility.

use enumset::{EnumSet, EnumSetType};
use std::fmt;

/// State of a single option.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum State {
    On,
    Off,
}

pub use State::{Off, On};

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            On => "on",
            Off => "off",
        })
    }
}

/// The sixteen flags named by `spec.md` §3, all false by default.
#[derive(Clone, Copy, Debug, EnumSetType)]
#[enumset(no_super_impls)]
pub enum Option {
    AllExport,
    ErrExit,
    HashAll,
    IgnoreEof,
    Interactive,
    Monitor,
    NoClobber,
    NoExec,
    NoGlob,
    NoLog,
    Notify,
    NoUnset,
    StdInput,
    Verbose,
    Vi,
    XTrace,
}

pub use Option::*;

impl Option {
    /// The name used by `set -o name`/`+o name`, all lower case.
    pub fn long_name(self) -> &'static str {
        match self {
            AllExport => "allexport",
            ErrExit => "errexit",
            HashAll => "hashall",
            IgnoreEof => "ignoreeof",
            Interactive => "interactive",
            Monitor => "monitor",
            NoClobber => "noclobber",
            NoExec => "noexec",
            NoGlob => "noglob",
            NoLog => "nolog",
            Notify => "notify",
            NoUnset => "nounset",
            StdInput => "stdin",
            Verbose => "verbose",
            Vi => "vi",
            XTrace => "xtrace",
        }
    }

    /// The single-letter `set -X`/`+X` flag, where one exists.
    pub fn short_name(self) -> std::option::Option<char> {
        match self {
            AllExport => Some('a'),
            ErrExit => Some('e'),
            HashAll => Some('h'),
            NoClobber => Some('C'),
            NoExec => Some('n'),
            NoGlob => Some('f'),
            Notify => Some('b'),
            NoUnset => Some('u'),
            Verbose => Some('v'),
            XTrace => Some('x'),
            IgnoreEof | Interactive | Monitor | NoLog | StdInput | Vi => None,
        }
    }

    /// `Monitor` and `Interactive` are set once at shell startup (from `-m`
    /// and `-i`/stdin-is-a-tty detection) and are not otherwise modifiable
    /// by `set`, matching the reference shell's treatment of its
    /// unmodifiable options.
    pub fn is_modifiable(self) -> bool {
        !matches!(self, Interactive | StdInput)
    }

    pub fn all() -> EnumSet<Option> {
        EnumSet::all()
    }
}

/// Whether each [`Option`] is currently on or off. All options default to
/// off, matching `spec.md` §3.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OptionSet {
    on: EnumSet<Option>,
}

impl OptionSet {
    pub fn get(&self, option: Option) -> State {
        if self.on.contains(option) {
            On
        } else {
            Off
        }
    }

    pub fn set(&mut self, option: Option, state: State) {
        match state {
            On => self.on.insert(option),
            Off => self.on.remove(option),
        };
    }

    pub fn is_on(&self, option: Option) -> bool {
        self.on.contains(option)
    }

    pub fn from_short_name(c: char) -> std::option::Option<Option> {
        Option::all().iter().find(|o| o.short_name() == Some(c))
    }

    pub fn from_long_name(name: &str) -> std::option::Option<Option> {
        Option::all().iter().find(|o| o.long_name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_off() {
        let options = OptionSet::default();
        for o in Option::all() {
            assert_eq!(options.get(o), Off);
        }
    }

    #[test]
    fn setting_and_clearing() {
        let mut options = OptionSet::default();
        options.set(ErrExit, On);
        assert_eq!(options.get(ErrExit), On);
        assert!(options.is_on(ErrExit));
        options.set(ErrExit, Off);
        assert_eq!(options.get(ErrExit), Off);
    }

    #[test]
    fn short_name_lookup() {
        assert_eq!(OptionSet::from_short_name('e'), Some(ErrExit));
        assert_eq!(OptionSet::from_short_name('u'), Some(NoUnset));
        assert_eq!(OptionSet::from_short_name('z'), None);
    }

    #[test]
    fn long_name_lookup() {
        assert_eq!(OptionSet::from_long_name("noclobber"), Some(NoClobber));
        assert_eq!(OptionSet::from_long_name("bogus"), None);
    }
}
