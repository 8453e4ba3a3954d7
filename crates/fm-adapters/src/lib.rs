// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-level primitives shared by step executors. No scheduling
//! logic lives here; this crate only knows how to spawn, time out, and
//! kill a single command.

pub mod subprocess;

pub use subprocess::{compose_env, run_with_timeout, ProcessOutcome, SPAWN_FAILED, TIMED_OUT};
