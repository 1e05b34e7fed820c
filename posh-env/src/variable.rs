// This file is part of posh, an extended POSIX shell.
// Copyright (C) 2026 The posh authors

//! Shell variables and their scoped overlays.
//!
//! A [`Variable`] is a named scalar with an exported flag and an optional
//! read-only marker. A [`VariableSet`] holds a persistent base (global)
//! scope plus a stack of temporary overlays pushed for the duration of a
//! single built-in or function invocation, per `spec.md` §3/§4.3: "a
//! persistent global scope plus a stack of temporary overlays pushed for
//! single-command assignments to non-special built-ins and functions."
//!
//! ```
//! use posh_env::{Scope, VariableSet};
//!
//! let mut vars = VariableSet::new();
//! vars.get_or_new("foo", Scope::Global).assign("bar", None).unwrap();
//! assert_eq!(vars.get("foo").unwrap().value.as_deref(), Some("bar"));
//!
//! {
//!     let mut guard = vars.push_context();
//!     guard.get_or_new("foo", Scope::Local).assign("baz", None).unwrap();
//!     assert_eq!(guard.get("foo").unwrap().value.as_deref(), Some("baz"));
//! }
//! assert_eq!(vars.get("foo").unwrap().value.as_deref(), Some("bar"));
//! ```

use posh_syntax::source::Location;
use std::borrow::Borrow;
use std::collections::hash_map::Entry::{Occupied, Vacant};
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::{Deref, DerefMut};
use thiserror::Error;

/// Definition of a variable: value, provenance, and attributes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Variable {
    /// `None` if the variable was declared (e.g. by `export name`) but
    /// never assigned a value.
    pub value: Option<String>,
    pub last_assigned_location: Option<Location>,
    pub is_exported: bool,
    pub read_only_location: Option<Location>,
}

impl Variable {
    pub fn new(value: impl Into<String>) -> Self {
        Variable { value: Some(value.into()), ..Default::default() }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only_location.is_some()
    }
}

/// Error produced by [`VariableRefMut::assign`] when the target is
/// read-only.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("cannot assign to read-only variable")]
pub struct AssignError {
    pub new_value: String,
    pub assigned_location: Option<Location>,
    pub read_only_location: Location,
}

/// Error produced when attempting to unset a read-only variable.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("cannot unset read-only variable `{name}`")]
pub struct UnsetError {
    pub name: String,
    pub read_only_location: Location,
}

/// Managed handle to a variable being created or modified in place.
pub struct VariableRefMut<'a>(&'a mut Variable);

impl Deref for VariableRefMut<'_> {
    type Target = Variable;
    fn deref(&self) -> &Variable {
        self.0
    }
}

impl<'a> VariableRefMut<'a> {
    /// Assigns a new value, returning the value and location it replaces.
    /// Fails without modifying the variable if it is read-only.
    pub fn assign(
        &mut self,
        value: impl Into<String>,
        location: impl Into<Option<Location>>,
    ) -> Result<(Option<String>, Option<Location>), AssignError> {
        let value = value.into();
        let location = location.into();
        if let Some(read_only_location) = self.0.read_only_location.clone() {
            return Err(AssignError { new_value: value, assigned_location: location, read_only_location });
        }
        let old_value = std::mem::replace(&mut self.0.value, Some(value));
        let old_location = std::mem::replace(&mut self.0.last_assigned_location, location);
        Ok((old_value, old_location))
    }

    pub fn export(&mut self, is_exported: bool) {
        self.0.is_exported = is_exported;
    }

    pub fn make_read_only(&mut self, location: Location) {
        self.0.read_only_location.get_or_insert(location);
    }
}

/// Which scope an operation on a [`VariableSet`] should target.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Scope {
    /// The persistent base scope, shared by the whole shell session.
    Global,
    /// The topmost overlay, i.e. whichever scope is currently active.
    Local,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Slot {
    variable: Variable,
    context_index: usize,
}

/// Positional parameters (`$1`, `$2`, ...), one set per variable context so
/// that a function invocation gets its own `$@`/`$#` without disturbing the
/// caller's.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PositionalParams {
    pub values: Vec<String>,
}

/// One overlay in the [`VariableSet`] stack: the base context holds
/// positional parameters for the top-level script; every pushed context
/// gets its own, matching `spec.md`'s "push a new positional-parameter
/// frame" description of function invocation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Context {
    positional_params: PositionalParams,
}

/// Stack of scopes over shell variables.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VariableSet {
    all_variables: HashMap<String, Vec<Slot>>,
    contexts: Vec<Context>,
}

impl Default for VariableSet {
    fn default() -> Self {
        VariableSet { all_variables: HashMap::new(), contexts: vec![Context::default()] }
    }
}

impl VariableSet {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn get<N>(&self, name: &N) -> Option<&Variable>
    where
        String: Borrow<N>,
        N: Hash + Eq + ?Sized,
    {
        Some(&self.all_variables.get(name)?.last()?.variable)
    }

    /// Finds or creates a variable and returns a handle to modify it.
    ///
    /// `Scope::Global` searches/creates in the base context regardless of
    /// what is currently on top; `Scope::Local` searches/creates in
    /// whichever context is currently topmost.
    pub fn get_or_new(&mut self, name: impl Into<String>, scope: Scope) -> VariableRefMut<'_> {
        let name = name.into();
        let target_index = match scope {
            Scope::Global => 0,
            Scope::Local => self.contexts.len() - 1,
        };
        let stack = match self.all_variables.entry(name) {
            Vacant(v) => v.insert(Vec::new()),
            Occupied(o) => o.into_mut(),
        };
        if let Some(top) = stack.last() {
            if top.context_index == target_index {
                return VariableRefMut(&mut stack.last_mut().unwrap().variable);
            }
        }
        stack.push(Slot { variable: Variable::default(), context_index: target_index });
        VariableRefMut(&mut stack.last_mut().unwrap().variable)
    }

    /// Removes a variable from whichever context currently shows it.
    /// Returns an error (without removing anything) if it is read-only.
    pub fn unset<N>(&mut self, name: &N) -> Result<bool, UnsetError>
    where
        String: Borrow<N>,
        N: Hash + Eq + ToString + ?Sized,
    {
        let Some(stack) = self.all_variables.get_mut(name) else { return Ok(false) };
        let Some(top) = stack.last() else { return Ok(false) };
        if let Some(read_only_location) = top.variable.read_only_location.clone() {
            return Err(UnsetError { name: name.to_string(), read_only_location });
        }
        stack.pop();
        Ok(true)
    }

    /// Iterates over every variable currently visible (one entry per
    /// name, the topmost-context value winning), for `export -p`/`set`-style
    /// listing built-ins.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.all_variables.iter().filter_map(|(name, stack)| {
            stack.last().map(|slot| (name.as_str(), &slot.variable))
        })
    }

    /// Exported variables, in the format `NAME=value` needed for `execve`'s
    /// envp array.
    pub fn exported_strings(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, var)| var.is_exported)
            .filter_map(|(name, var)| var.value.as_ref().map(|v| format!("{name}={v}")))
            .collect()
    }

    pub fn positional_params(&self) -> &[String] {
        &self.contexts.last().expect("base context has gone").positional_params.values
    }

    pub fn set_positional_params(&mut self, values: Vec<String>) {
        self.contexts.last_mut().expect("base context has gone").positional_params.values = values;
    }

    /// Pushes a new overlay context and returns a guard that pops it on
    /// drop, per `spec.md`'s invariant that "temporary variable overlays
    /// pushed before invoking a non-special built-in or function are
    /// popped on every exit path from that command."
    pub fn push_context(&mut self) -> ContextGuard<'_> {
        self.contexts.push(Context::default());
        ContextGuard { set: self }
    }

    /// Pushes a new overlay context without returning a guard, for callers
    /// that need the overlay to outlive a single lexical scope (e.g.
    /// spanning several calls that each need `&mut Env`, not just
    /// `&mut VariableSet`). Paired with an explicit [`VariableSet::pop_context`]
    /// call on every exit path; prefer [`VariableSet::push_context`] when a
    /// guard can be held for the overlay's whole lifetime instead.
    pub fn push_bare_context(&mut self) {
        self.contexts.push(Context::default());
    }

    /// Pops the topmost overlay. Public so callers using
    /// [`VariableSet::push_bare_context`] can restore the previous scope
    /// explicitly; [`ContextGuard`] calls this from its `Drop` impl.
    pub fn pop_context(&mut self) {
        let index = self.contexts.len() - 1;
        for stack in self.all_variables.values_mut() {
            if matches!(stack.last(), Some(slot) if slot.context_index == index) {
                stack.pop();
            }
        }
        self.contexts.pop();
    }
}

/// RAII guard returned by [`VariableSet::push_context`]: the pushed
/// context is popped when the guard is dropped, however control leaves
/// the scope that created it (normal return, `?`, or panic unwinding).
#[must_use = "the overlay is popped as soon as this guard is dropped"]
pub struct ContextGuard<'a> {
    set: &'a mut VariableSet,
}

impl Deref for ContextGuard<'_> {
    type Target = VariableSet;
    fn deref(&self) -> &VariableSet {
        self.set
    }
}

impl DerefMut for ContextGuard<'_> {
    fn deref_mut(&mut self) -> &mut VariableSet {
        self.set
    }
}

impl Drop for ContextGuard<'_> {
    fn drop(&mut self) {
        self.set.pop_context();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_assignment_visible_after_overlay_pops() {
        let mut vars = VariableSet::new();
        vars.get_or_new("foo", Scope::Global).assign("bar", None).unwrap();
        {
            let mut guard = vars.push_context();
            guard.get_or_new("foo", Scope::Local).assign("baz", None).unwrap();
            assert_eq!(guard.get("foo").unwrap().value.as_deref(), Some("baz"));
        }
        assert_eq!(vars.get("foo").unwrap().value.as_deref(), Some("bar"));
    }

    #[test]
    fn assigning_to_read_only_variable_fails() {
        let mut vars = VariableSet::new();
        let loc = Location::dummy();
        vars.get_or_new("ro", Scope::Global).make_read_only(loc.clone());
        let err = vars.get_or_new("ro", Scope::Global).assign("x", None).unwrap_err();
        assert_eq!(err.read_only_location, loc);
    }

    #[test]
    fn unsetting_read_only_variable_fails() {
        let mut vars = VariableSet::new();
        vars.get_or_new("ro", Scope::Global).assign("x", None).unwrap();
        vars.get_or_new("ro", Scope::Global).make_read_only(Location::dummy());
        assert!(vars.unset("ro").is_err());
    }

    #[test]
    fn exported_strings_only_include_exported_assigned_variables() {
        let mut vars = VariableSet::new();
        vars.get_or_new("A", Scope::Global).assign("1", None).unwrap();
        vars.get_or_new("A", Scope::Global).export(true);
        vars.get_or_new("B", Scope::Global).assign("2", None).unwrap();
        let mut exported = vars.exported_strings();
        exported.sort();
        assert_eq!(exported, vec!["A=1".to_string()]);
    }
}
