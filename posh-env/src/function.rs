// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! The function table.
//!
//! A [`Function`] wraps the `Rc<Command>` body published by a
//! function-definition command so defining a function never clones the
//! whole syntax tree (`spec.md` §3's "retained... until `unset -f` or
//! shell exit" lifecycle note), plus a refcount so a function that
//! `unset -f`s itself mid-invocation is freed only after it returns.

use posh_syntax::ast::Command;
use posh_syntax::source::Location;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;

/// A registered shell function.
#[derive(Clone, Debug)]
pub struct Function {
    pub name: String,
    pub body: Rc<Command>,
    pub origin: Location,
    pub read_only_location: Option<Location>,
    /// Number of invocations of this function currently on the call
    /// stack. While positive, `unset -f` removes the name from the table
    /// but this `Rc` (and any clone already handed to an executing
    /// invocation) keeps the body alive.
    call_depth: Rc<Cell<u32>>,
}

impl Function {
    pub fn new(name: impl Into<String>, body: Rc<Command>, origin: Location) -> Self {
        Function { name: name.into(), body, origin, read_only_location: None, call_depth: Rc::new(Cell::new(0)) }
    }

    pub fn make_read_only(mut self, location: Location) -> Self {
        self.read_only_location.get_or_insert(location);
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only_location.is_some()
    }

    /// Marks one more invocation of this function as in progress, returning
    /// a guard that decrements the count again on drop.
    pub fn enter(&self) -> CallGuard {
        self.call_depth.set(self.call_depth.get() + 1);
        CallGuard { call_depth: Rc::clone(&self.call_depth) }
    }
}

/// Dropped when a function invocation returns, whatever the exit path.
pub struct CallGuard {
    call_depth: Rc<Cell<u32>>,
}

impl Drop for CallGuard {
    fn drop(&mut self) {
        self.call_depth.set(self.call_depth.get() - 1);
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("cannot redefine read-only function `{name}`")]
pub struct RedefineError {
    pub name: String,
    pub read_only_location: Location,
}

/// The function table: a simple name-to-definition map, since `spec.md`
/// gives functions no scoping beyond the single global table.
#[derive(Debug, Default)]
pub struct FunctionSet {
    functions: HashMap<String, Function>,
}

impl FunctionSet {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get(&self, name: &str) -> std::option::Option<&Function> {
        self.functions.get(name)
    }

    /// Defines or redefines a function. Fails without modifying the table
    /// if a read-only function of the same name already exists.
    pub fn define(&mut self, function: Function) -> Result<(), RedefineError> {
        if let Some(existing) = self.functions.get(&function.name) {
            if let Some(read_only_location) = existing.read_only_location.clone() {
                return Err(RedefineError { name: function.name, read_only_location });
            }
        }
        self.functions.insert(function.name.clone(), function);
        Ok(())
    }

    /// Removes a function from the table. The body stays alive via `Rc`
    /// for as long as an invocation of it is still executing.
    pub fn unset(&mut self, name: &str) -> Result<bool, RedefineError> {
        if let Some(existing) = self.functions.get(name) {
            if let Some(read_only_location) = existing.read_only_location.clone() {
                return Err(RedefineError { name: name.to_string(), read_only_location });
            }
        }
        Ok(self.functions.remove(name).is_some())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Function> {
        self.functions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posh_syntax::ast::{Command, CommandKind, List};

    fn dummy_body() -> Rc<Command> {
        Rc::new(Command {
            kind: CommandKind::BraceGroup(List::default()),
            redirections: Vec::new(),
            location: Location::dummy(),
        })
    }

    #[test]
    fn define_then_look_up() {
        let mut set = FunctionSet::new();
        set.define(Function::new("greet", dummy_body(), Location::dummy())).unwrap();
        assert!(set.get("greet").is_some());
        assert!(set.get("missing").is_none());
    }

    #[test]
    fn read_only_function_cannot_be_redefined() {
        let mut set = FunctionSet::new();
        let f = Function::new("greet", dummy_body(), Location::dummy()).make_read_only(Location::dummy());
        set.define(f).unwrap();
        let err = set.define(Function::new("greet", dummy_body(), Location::dummy())).unwrap_err();
        assert_eq!(err.name, "greet");
    }

    #[test]
    fn call_guard_tracks_depth() {
        let f = Function::new("f", dummy_body(), Location::dummy());
        let guard = f.enter();
        assert_eq!(f.call_depth.get(), 1);
        drop(guard);
        assert_eq!(f.call_depth.get(), 0);
    }
}
