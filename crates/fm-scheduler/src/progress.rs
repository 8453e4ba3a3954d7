// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Progress events sent from the Scheduler to whatever is rendering a
//! run (`fm-cli`'s `status --watch`, the `run` progress line). Keeps
//! the Scheduler free of any terminal-rendering dependency.

use fm_core::JobId;

#[derive(Debug, Clone)]
pub enum ProgressEvent {
    JobStart { id: JobId, name: String },
    StepStart { id: JobId, step: String },
    StepFinish { id: JobId, step: String, return_code: i32 },
    JobFinish { id: JobId, name: String, return_code: i32 },
}

/// Per-job log line sink. `fm-reporter` implements this to append to
/// `job-<N>.log`; the Scheduler never opens a file itself.
pub trait JobLogSink: Send + Sync {
    fn record(&self, id: &JobId, job_name: &str, line: &str);
}
