// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The admission loop (spec §4.7/§5): a single mutex guards job
//! status, the active set, the completion set, and the core budget.
//! Workers hold it only transiently, at admission and at completion;
//! step execution itself runs outside the lock so independent jobs
//! make progress concurrently.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use fm_core::{Clock, Dag, Job, JobId, JobStatus, Step};
use parking_lot::Mutex;
use tokio::sync::{mpsc, Notify};

use crate::build::RunningJob;
use crate::progress::{JobLogSink, ProgressEvent};
use crate::resources::Resources;

struct SharedState {
    /// Waiting and terminal (Finished/Skipped) jobs. A job is removed
    /// from here while Running and reinserted on completion.
    jobs: HashMap<JobId, Job>,
    pending_steps: HashMap<JobId, Vec<Box<dyn Step>>>,
    active: HashSet<JobId>,
    done: HashSet<JobId>,
    resources: Resources,
}

pub struct Scheduler {
    dag: Dag,
    state: Mutex<SharedState>,
    notify: Notify,
    clock: Arc<dyn Clock>,
}

impl Scheduler {
    pub fn new(dag: Dag, jobs: HashMap<JobId, RunningJob>, total_cores: u32, clock: Arc<dyn Clock>) -> Self {
        let mut job_states = HashMap::with_capacity(jobs.len());
        let mut pending_steps = HashMap::with_capacity(jobs.len());
        let mut done = HashSet::new();

        for (id, running) in jobs {
            if running.job.is_terminal() {
                done.insert(id.clone());
            } else {
                pending_steps.insert(id.clone(), running.steps);
            }
            job_states.insert(id, running.job);
        }

        Self {
            dag,
            state: Mutex::new(SharedState {
                jobs: job_states,
                pending_steps,
                active: HashSet::new(),
                done,
                resources: Resources::new(total_cores),
            }),
            notify: Notify::new(),
            clock,
        }
    }

    /// Runs every job to completion and returns the final per-job
    /// state, keyed by `JobId`. Consumes nothing external; progress
    /// and log sinks are optional observers.
    pub async fn run_all_jobs(
        self: Arc<Self>,
        progress: Option<mpsc::UnboundedSender<ProgressEvent>>,
        log_sink: Option<Arc<dyn JobLogSink>>,
    ) -> HashMap<JobId, Job> {
        let total_nodes = self.dag.nodes().len();
        loop {
            {
                let state = self.state.lock();
                if state.done.len() == total_nodes {
                    break;
                }
            }

            let to_spawn = self.admit();
            if to_spawn.is_empty() {
                self.notify.notified().await;
                continue;
            }

            for (id, job, steps) in to_spawn {
                let scheduler = Arc::clone(&self);
                let progress = progress.clone();
                let log_sink = log_sink.clone();
                tokio::spawn(async move {
                    scheduler.run_job(id, job, steps, progress, log_sink).await;
                });
            }
        }

        std::mem::take(&mut self.state.lock().jobs)
    }

    /// Admits every ready job the core budget currently has room for,
    /// in DAG discovery order, and hands ownership of each to its
    /// caller for spawning outside the lock.
    fn admit(&self) -> Vec<(JobId, Job, Vec<Box<dyn Step>>)> {
        let mut state = self.state.lock();
        let ready: Vec<JobId> = self
            .dag
            .nodes()
            .iter()
            .filter(|id| matches!(state.jobs.get(*id).map(|j| &j.status), Some(JobStatus::Waiting)))
            .filter(|id| self.dag.ready(id, &state.done))
            .cloned()
            .collect();

        let mut to_spawn = Vec::new();
        for id in ready {
            let Some(cores) = state.jobs.get(&id).map(|j| j.required_cores) else {
                continue;
            };
            if state.resources.try_allocate(cores) {
                let Some(mut job) = state.jobs.remove(&id) else {
                    state.resources.free(cores);
                    continue;
                };
                job.mark_running();
                state.active.insert(id.clone());
                let steps = state.pending_steps.remove(&id).unwrap_or_default();
                to_spawn.push((id, job, steps));
            }
        }
        to_spawn
    }

    async fn run_job(
        self: Arc<Self>,
        id: JobId,
        mut job: Job,
        mut steps: Vec<Box<dyn Step>>,
        progress: Option<mpsc::UnboundedSender<ProgressEvent>>,
        log_sink: Option<Arc<dyn JobLogSink>>,
    ) {
        let start = self.clock.now();
        tracing::debug!(job = %job.name, cores = job.required_cores, "job admitted");
        send(&progress, ProgressEvent::JobStart { id: id.clone(), name: job.name.clone() });
        log(&log_sink, &id, &job.name, "JOB_START");

        for step in &mut steps {
            let step_name = step.name().to_string();
            send(&progress, ProgressEvent::StepStart { id: id.clone(), step: step_name.clone() });
            log(&log_sink, &id, &job.name, &format!("TASK_START {step_name}"));
            if let Ok(Some(command)) = step.command(&job.context) {
                log(&log_sink, &id, &job.name, &format!("SCRIPT {command}"));
            }

            let outcome = step.run(&mut job.context).await;
            let rc = outcome.return_code;
            job.accumulate(rc);

            // spec §4.5: append the step's captured stdout line by line
            // under an OUTPUT tag, after the script line and before the
            // task's closing record.
            for line in String::from_utf8_lossy(&outcome.stdout).lines() {
                log(&log_sink, &id, &job.name, &format!("OUTPUT {line}"));
            }

            log(&log_sink, &id, &job.name, &format!("TASK_END {step_name} rc={rc}"));
            send(
                &progress,
                ProgressEvent::StepFinish { id: id.clone(), step: step_name, return_code: rc },
            );
        }

        job.duration_secs = self.clock.now().duration_since(start).as_secs_f64();
        job.mark_finished();
        tracing::debug!(job = %job.name, rc = job.return_code, duration = job.duration_secs, "job finished");
        log(&log_sink, &id, &job.name, "JOB_END");
        send(
            &progress,
            ProgressEvent::JobFinish { id: id.clone(), name: job.name.clone(), return_code: job.return_code },
        );

        let required_cores = job.required_cores;
        {
            let mut state = self.state.lock();
            state.resources.free(required_cores);
            state.active.remove(&id);
            state.done.insert(id.clone());
            state.jobs.insert(id, job);
        }
        self.notify.notify_one();
    }
}

fn send(progress: &Option<mpsc::UnboundedSender<ProgressEvent>>, event: ProgressEvent) {
    if let Some(sender) = progress {
        // A dropped receiver (e.g. no one is watching) is not a
        // scheduling error; the run continues regardless.
        let _ = sender.send(event);
    }
}

fn log(sink: &Option<Arc<dyn JobLogSink>>, id: &JobId, job_name: &str, line: &str) {
    if let Some(sink) = sink {
        sink.record(id, job_name, line);
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
