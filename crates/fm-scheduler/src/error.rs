// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration errors raised while building or validating the DAG.
//! All of these are fatal and abort before any job runs.

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("job `{job}` needs unknown job `{dep}`")]
    UnknownDependency { job: String, dep: String },

    /// Job names, in cycle traversal order, closed back on the starting
    /// name (spec §8 invariant #1: the message must name every node in
    /// one cycle, not their opaque ids).
    #[error("cyclic dependency: {}", .0.join(" -> "))]
    Cycle(Vec<String>),

    #[error("{0}")]
    InvalidMatrix(#[from] crate::matrix::MatrixError),

    #[error("job `{job}`, step `{step}`: {source}")]
    UnknownAction {
        job: String,
        step: String,
        #[source]
        source: fm_steps::FactoryError,
    },
}
