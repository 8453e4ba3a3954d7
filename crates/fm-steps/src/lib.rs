// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step Factory and Step Executor variants.
//!
//! `factory::build_step` turns a parsed [`fm_core::StepSpec`] into a
//! concrete `Box<dyn fm_core::Step>`, consulting an [`fm_registry::Registry`]
//! for `uses:` names that aren't a plain shell script. `register_builtins`
//! wires the built-in action constructors (MPI, the file-diff checks, the
//! regex check) into a fresh registry.

pub mod diff;
pub mod factory;
pub mod function;
pub mod interpolate;
pub mod mpi;
pub mod regex_check;
pub mod shell;

pub use factory::{build_step, FactoryError};
pub use function::FunctionStep;
pub use mpi::{MpiConstructor, MpiStep};
pub use regex_check::{RegexCheckConstructor, RegexCheckStep, NO_MATCH};
pub use shell::ShellStep;

use std::sync::Arc;

use fm_registry::Registry;

/// Registers every built-in action constructor under its conventional
/// `uses:` name. Called once from `main` before any runbook is parsed
/// (see `fm-registry`'s module docs for why this replaces a plugin-directory
/// scan).
pub fn register_builtins(registry: &Registry, default_mpi_launcher: &str) {
    registry.register_action(
        "mpi",
        Arc::new(MpiConstructor {
            default_launcher: default_mpi_launcher.to_string(),
        }),
    );
    registry.register_action("checks/regex", Arc::new(RegexCheckConstructor));
    registry.register_action("checks/exodiff", Arc::new(diff::ExodiffConstructor));
    registry.register_action("checks/csvdiff", Arc::new(diff::CsvdiffConstructor));
    registry.register_action("checks/h5diff", Arc::new(diff::H5diffConstructor));
    registry.register_action(
        "checks/convergence-rate",
        Arc::new(diff::ConvergenceRateConstructor),
    );
}
