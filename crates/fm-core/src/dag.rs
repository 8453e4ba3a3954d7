// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency graph over jobs. Hand-rolled adjacency lists rather than
//! a graph-theory crate: the graph is small and the only operations
//! needed are "add edge", "cycle search", and "predecessors of".

use std::collections::{HashMap, HashSet};

use crate::id::JobId;

/// Directed edges between job ids: `needs[dependent]` lists the jobs
/// that must finish before `dependent` may start.
#[derive(Debug, Default)]
pub struct Dag {
    nodes: Vec<JobId>,
    needs: HashMap<JobId, Vec<JobId>>,
}

#[derive(Debug, thiserror::Error)]
pub enum DagError {
    #[error("unknown dependency `{dep}` required by job `{job}`")]
    UnknownDependency { job: JobId, dep: JobId },
}

impl Dag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, id: JobId) {
        self.needs.entry(id.clone()).or_default();
        self.nodes.push(id);
    }

    /// Records that `dependent` needs `dep`. Both must already be
    /// nodes; an unknown `dep` is a configuration error.
    pub fn add_edge(&mut self, dependent: &JobId, dep: JobId) -> Result<(), DagError> {
        if !self.needs.contains_key(&dep) {
            return Err(DagError::UnknownDependency {
                job: dependent.clone(),
                dep,
            });
        }
        if let Some(list) = self.needs.get_mut(dependent) {
            list.push(dep);
        }
        Ok(())
    }

    pub fn predecessors(&self, id: &JobId) -> &[JobId] {
        self.needs.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn nodes(&self) -> &[JobId] {
        &self.nodes
    }

    /// Depth-first cycle search. Returns the first cycle found, in
    /// traversal order, closed back on its starting node.
    pub fn find_cycle(&self) -> Option<Vec<JobId>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        let mut marks: HashMap<&JobId, Mark> = HashMap::new();
        let mut stack: Vec<JobId> = Vec::new();

        fn visit<'a>(
            dag: &'a Dag,
            node: &'a JobId,
            marks: &mut HashMap<&'a JobId, Mark>,
            stack: &mut Vec<JobId>,
        ) -> Option<Vec<JobId>> {
            match marks.get(node) {
                Some(Mark::Done) => return None,
                Some(Mark::Visiting) => {
                    let start = stack.iter().position(|n| n == node).unwrap_or(0);
                    let mut cycle: Vec<JobId> = stack[start..].to_vec();
                    cycle.push(node.clone());
                    return Some(cycle);
                }
                None => {}
            }
            marks.insert(node, Mark::Visiting);
            stack.push(node.clone());
            for dep in dag.predecessors(node) {
                if let Some(cycle) = visit(dag, dep, marks, stack) {
                    return Some(cycle);
                }
            }
            stack.pop();
            marks.insert(node, Mark::Done);
            None
        }

        for node in &self.nodes {
            if let Some(cycle) = visit(self, node, &mut marks, &mut stack) {
                return Some(cycle);
            }
        }
        None
    }

    /// True once every predecessor of `id` is in `done`.
    pub fn ready(&self, id: &JobId, done: &HashSet<JobId>) -> bool {
        self.predecessors(id).iter().all(|dep| done.contains(dep))
    }
}

#[cfg(test)]
#[path = "dag_tests.rs"]
mod tests;
