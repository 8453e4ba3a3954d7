// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Name -> constructor tables the Step Factory consults to turn a
//! `uses:` name into a runnable step.
//!
//! Population is an explicit registration API called once at startup
//! (`register_action`/`register_function`), not a scan of a plugin
//! directory: the set of available step kinds is determined by what
//! `main` links in and registers, matching the rest of this codebase's
//! preference for compile-time wiring over dynamic discovery.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use fm_core::{ActionConstructor, StepFunction};

/// Name -> constructor tables for actions (class-like steps) and
/// functions (in-process callables). Cloning a `Registry` is cheap and
/// shares the underlying tables.
#[derive(Clone, Default)]
pub struct Registry {
    actions: Arc<RwLock<HashMap<String, Arc<dyn ActionConstructor>>>>,
    functions: Arc<RwLock<HashMap<String, Arc<dyn StepFunction>>>>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown action: {0}")]
    UnknownAction(String),
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an action constructor under `name`. A second call with
    /// the same name replaces the first (last write wins).
    pub fn register_action(&self, name: impl Into<String>, constructor: Arc<dyn ActionConstructor>) {
        self.actions.write().insert(name.into(), constructor);
    }

    /// Registers a function step under `name`. Last write wins, same
    /// as `register_action`.
    pub fn register_function(&self, name: impl Into<String>, function: Arc<dyn StepFunction>) {
        self.functions.write().insert(name.into(), function);
    }

    pub fn get_action(&self, name: &str) -> Option<Arc<dyn ActionConstructor>> {
        self.actions.read().get(name).cloned()
    }

    pub fn get_function(&self, name: &str) -> Option<Arc<dyn StepFunction>> {
        self.functions.read().get(name).cloned()
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.actions.read().contains_key(name)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.read().contains_key(name)
    }

    /// Every registered action name, sorted. Used by `fm-cli doctor` to
    /// print what's wired in.
    pub fn action_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.actions.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Every registered function name, sorted.
    pub fn function_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.read().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
