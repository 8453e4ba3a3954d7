// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turns parsed `JobSpec`s into a validated DAG of runnable jobs.
//!
//! Construction (spec §4.7): expand every spec via the Matrix Expander,
//! insert one DAG node per concrete job, then wire `needs` edges. A
//! `needs` name may refer to a spec that itself expanded into several
//! concrete jobs (a matrix); every concrete job sharing that spec name
//! becomes a predecessor, and if the dependent is itself a matrix, each
//! of its variants gets the full fan-in. This is the natural extension
//! of the single-job case and is not spelled out further by the spec.

use std::collections::HashMap;

use fm_core::{Context, Dag, Job, JobId, JobSpec, Step};
use fm_registry::Registry;
use uuid::Uuid;

use crate::error::SchedulerError;
use crate::matrix::expand;

/// A DAG node: the runtime `Job` plus the steps its worker will run.
pub struct RunningJob {
    pub job: Job,
    pub steps: Vec<Box<dyn Step>>,
}

pub struct BuildOutput {
    pub dag: Dag,
    pub jobs: HashMap<JobId, RunningJob>,
}

pub fn build(specs: &[JobSpec], registry: &Registry) -> Result<BuildOutput, SchedulerError> {
    let mut dag = Dag::new();
    let mut jobs: HashMap<JobId, RunningJob> = HashMap::new();
    let mut by_spec_name: HashMap<&str, Vec<JobId>> = HashMap::new();

    for spec in specs {
        let concrete = expand(spec)?;
        for concrete_job in concrete {
            let id = JobId::new(Uuid::new_v4().to_string());
            let ctx = Context::new(concrete_job.binding);

            let mut steps = Vec::with_capacity(spec.steps.len());
            for step_spec in &spec.steps {
                let step = fm_steps::build_step(step_spec, registry).map_err(|source| {
                    SchedulerError::UnknownAction {
                        job: concrete_job.name.clone(),
                        step: step_spec
                            .name
                            .clone()
                            .or_else(|| step_spec.uses.clone())
                            .unwrap_or_else(|| "step".to_string()),
                        source,
                    }
                })?;
                steps.push(step);
            }

            let required_cores = steps.iter().map(|s| s.num_cores()).max().unwrap_or(1);
            let mut job = Job::new(id.clone(), concrete_job.name, required_cores, ctx);
            if let Some(reason) = &spec.skip {
                job.mark_skipped(reason.clone());
            }

            dag.add_node(id.clone());
            by_spec_name.entry(spec.name.as_str()).or_default().push(id.clone());
            jobs.insert(id, RunningJob { job, steps });
        }
    }

    for spec in specs {
        let dependents = by_spec_name
            .get(spec.name.as_str())
            .cloned()
            .unwrap_or_default();
        for dep_name in &spec.needs {
            let Some(dep_ids) = by_spec_name.get(dep_name.as_str()) else {
                return Err(SchedulerError::UnknownDependency {
                    job: spec.name.clone(),
                    dep: dep_name.clone(),
                });
            };
            for dependent in &dependents {
                for dep_id in dep_ids {
                    // dep_id was inserted as a node in the loop above, so this
                    // can never hit the `UnknownDependency` branch.
                    let _ = dag.add_edge(dependent, dep_id.clone());
                }
            }
        }
    }

    Ok(BuildOutput { dag, jobs })
}

/// Runs the three startup validation passes (spec §4.7): acyclicity,
/// oversize, and transitive skip-propagation. Must be called once,
/// before `run_all_jobs`.
pub fn validate(
    dag: &Dag,
    jobs: &mut HashMap<JobId, RunningJob>,
    total_cores: u32,
) -> Result<(), SchedulerError> {
    if let Some(cycle) = dag.find_cycle() {
        let names = cycle
            .iter()
            .map(|id| {
                jobs.get(id)
                    .map(|running| running.job.name.clone())
                    .unwrap_or_else(|| id.as_str().to_string())
            })
            .collect();
        return Err(SchedulerError::Cycle(names));
    }

    for node in dag.nodes() {
        let Some(running) = jobs.get_mut(node) else {
            continue;
        };
        if running.job.is_terminal() {
            continue;
        }
        if running.job.required_cores > total_cores {
            let reason = format!("Job too big (requires {} cores)", running.job.required_cores);
            tracing::warn!(job = %running.job.name, cores = running.job.required_cores, total_cores, "{reason}");
            running.job.mark_skipped(reason);
        }
    }

    // Topological order from sources so skip propagation sees a
    // predecessor's final status before visiting its dependents.
    for node in topological_order(dag) {
        let Some(is_terminal) = jobs.get(&node).map(|r| r.job.is_terminal()) else {
            continue;
        };
        if is_terminal {
            continue;
        }
        let blocked = dag.predecessors(&node).iter().any(|dep| {
            matches!(
                jobs.get(dep).map(|r| &r.job.status),
                Some(fm_core::JobStatus::Skipped(_))
            )
        });
        if blocked {
            if let Some(running) = jobs.get_mut(&node) {
                running.job.mark_skipped("Skipped dependency");
            }
        }
    }

    Ok(())
}

/// A cycle-free DAG's nodes in dependency order (predecessors first).
/// Only called after `find_cycle` has returned `None`.
fn topological_order(dag: &Dag) -> Vec<JobId> {
    let mut order = Vec::with_capacity(dag.nodes().len());
    let mut done: std::collections::HashSet<JobId> = std::collections::HashSet::new();

    fn visit(
        dag: &Dag,
        node: &JobId,
        done: &mut std::collections::HashSet<JobId>,
        order: &mut Vec<JobId>,
    ) {
        if done.contains(node) {
            return;
        }
        for dep in dag.predecessors(node) {
            visit(dag, dep, done, order);
        }
        done.insert(node.clone());
        order.push(node.clone());
    }

    for node in dag.nodes() {
        visit(dag, node, &mut done, &mut order);
    }
    order
}

#[cfg(test)]
#[path = "build_tests.rs"]
mod tests;
