// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `report.yaml` / `report.csv` serialization (spec §4.9).
//!
//! Writes are atomic: serialize to a `.tmp` sibling, then rename over
//! the final path, the same durability shape the teacher uses for its
//! own snapshot writer.

use std::collections::HashMap;
use std::path::Path;

use fm_core::{Job, JobId, JobStatus};
use serde::{Deserialize, Serialize};

use crate::error::{io, ReporterError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    pub id: u32,
    pub job_name: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// `report.yaml`'s shape (spec §4.9). Deserialize lets `fm-cli status`
/// read a prior run's report back without re-parsing YAML by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub results: Vec<ReportEntry>,
    pub total_runtime: f64,
}

/// Builds report entries from the Scheduler's final job states.
/// `job_numbers` is the run's sequential, monotonically assigned
/// integer id per job (spec §3 "Job (runtime)"), the same numbering
/// `fm-reporter::RunDir` uses for `job-<N>.log`; entries are ordered by
/// that number (spec §8.8: "results ... in id order"), not by the
/// opaque internal `JobId` uuid.
pub fn build_results(jobs: &HashMap<JobId, Job>, job_numbers: &HashMap<JobId, u32>) -> Vec<ReportEntry> {
    let mut numbered: Vec<(u32, &JobId)> = jobs
        .keys()
        .filter_map(|id| job_numbers.get(id).map(|number| (*number, id)))
        .collect();
    numbered.sort_by_key(|(number, _)| *number);

    numbered
        .into_iter()
        .map(|(number, id)| {
            let job = &jobs[id];
            match &job.status {
                JobStatus::Skipped(reason) => ReportEntry {
                    id: number,
                    job_name: job.name.clone(),
                    status: "skipped".to_string(),
                    reason: Some(reason.clone()),
                    return_code: None,
                    duration: None,
                },
                _ => ReportEntry {
                    id: number,
                    job_name: job.name.clone(),
                    status: if job.return_code == 0 { "success" } else { "failed" }.to_string(),
                    reason: None,
                    return_code: Some(job.return_code),
                    duration: Some(round3(job.duration_secs)),
                },
            }
        })
        .collect()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

pub fn write_report_yaml(path: &Path, report: &Report) -> Result<(), ReporterError> {
    let body = serde_yaml::to_string(report)?;
    atomic_write(path, body.as_bytes())
}

pub fn write_report_csv(path: &Path, results: &[ReportEntry]) -> Result<(), ReporterError> {
    let mut writer = csv::Writer::from_path(path).map_err(ReporterError::Csv)?;
    writer.write_record(["id", "name", "status", "duration", "return code"])?;
    for entry in results {
        writer.write_record([
            entry.id.to_string().as_str(),
            entry.job_name.as_str(),
            entry.status.as_str(),
            &entry.duration.map(|d| d.to_string()).unwrap_or_default(),
            &entry.return_code.map(|rc| rc.to_string()).unwrap_or_default(),
        ])?;
    }
    writer.flush().map_err(io(path))?;
    Ok(())
}

fn atomic_write(path: &Path, data: &[u8]) -> Result<(), ReporterError> {
    let tmp = path.with_extension("tmp");
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io(parent))?;
    }
    std::fs::write(&tmp, data).map_err(io(&tmp))?;
    std::fs::rename(&tmp, path).map_err(io(path))?;
    Ok(())
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
