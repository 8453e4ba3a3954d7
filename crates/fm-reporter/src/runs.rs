// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Run-directory lifecycle (spec §3 "Run directory", §4.9, §6).
//!
//! Layout:
//! ```text
//! <logroot>/
//!   runs/<runid>/job-<N>.log
//!   runs/<runid>/report.yaml
//!   runs/latest -> <runid>
//!   tags/<tagname> -> ../runs/<runid>
//! ```
//! `runid` matches `YYYYMMDD-HHMMSS-mmmmmm`. Retention keeps the N
//! most recent runs by mtime, excluding any run a tag symlink points
//! at.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fm_core::JobId;
use fm_scheduler::JobLogSink;
use parking_lot::Mutex;

use crate::error::{io, ReporterError};

/// Builds a fresh run id from a timestamp, `YYYYMMDD-HHMMSS-mmmmmm`.
/// Takes an explicit `DateTime` (rather than calling `Utc::now()`
/// itself) so callers can produce deterministic ids in tests.
pub fn run_id_at(now: DateTime<Utc>) -> fm_core::RunId {
    fm_core::RunId::from_parts(
        now.format("%Y").to_string().parse().unwrap_or(0),
        now.format("%m").to_string().parse().unwrap_or(1),
        now.format("%d").to_string().parse().unwrap_or(1),
        now.format("%H").to_string().parse().unwrap_or(0),
        now.format("%M").to_string().parse().unwrap_or(0),
        now.format("%S").to_string().parse().unwrap_or(0),
        now.timestamp_subsec_micros(),
    )
}

/// One run's output directory. Owns `job-<N>.log` writing (job numbers
/// are assigned by discovery order, the order jobs were added to the
/// DAG, since `JobId` itself is an opaque uuid rather than a small
/// integer), the `report.yaml`/`report.csv` paths, and the `latest`
/// symlink.
pub struct RunDir {
    runs_dir: PathBuf,
    run_id: fm_core::RunId,
    job_numbers: HashMap<JobId, u32>,
    open_logs: Mutex<HashMap<JobId, std::fs::File>>,
}

/// One entry in a run's `jobs.yaml` index: the log file number a
/// `fm-cli log`/`show` invocation (running as a fresh process, with no
/// in-memory `JobId`s left) needs to resolve a job name back to its
/// log file and internal id.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct JobIndexEntry {
    pub number: u32,
    pub id: String,
    pub name: String,
}

impl RunDir {
    /// Creates `<logroot>/runs/<runid>/`, assigning each of `job_ids`
    /// (in the order given — the Scheduler's DAG discovery order) a
    /// sequential log file number starting at 1.
    pub fn create(log_root: &Path, run_id: fm_core::RunId, job_ids: &[JobId]) -> Result<Self, ReporterError> {
        let runs_dir = log_root.join("runs");
        let run_dir = runs_dir.join(run_id.as_str());
        std::fs::create_dir_all(&run_dir).map_err(io(&run_dir))?;

        let job_numbers = job_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i as u32 + 1))
            .collect();

        Ok(Self {
            runs_dir,
            run_id,
            job_numbers,
            open_logs: Mutex::new(HashMap::new()),
        })
    }

    pub fn run_id(&self) -> &fm_core::RunId {
        &self.run_id
    }

    pub fn path(&self) -> PathBuf {
        self.runs_dir.join(self.run_id.as_str())
    }

    pub fn report_yaml_path(&self) -> PathBuf {
        self.path().join("report.yaml")
    }

    pub fn job_log_path(&self, id: &JobId) -> Option<PathBuf> {
        let n = self.job_numbers.get(id)?;
        Some(self.path().join(format!("job-{n}.log")))
    }

    pub fn job_index_path(&self) -> PathBuf {
        self.path().join("jobs.yaml")
    }

    /// Writes `jobs.yaml`, the only durable record of job number/id/name
    /// once this process exits. `names` must be in the same discovery
    /// order `create` was given.
    pub fn write_job_index(&self, names: &[(JobId, String)]) -> Result<(), ReporterError> {
        let entries: Vec<JobIndexEntry> = names
            .iter()
            .filter_map(|(id, name)| {
                let number = *self.job_numbers.get(id)?;
                Some(JobIndexEntry {
                    number,
                    id: id.as_str().to_string(),
                    name: name.clone(),
                })
            })
            .collect();
        let yaml = serde_yaml::to_string(&entries)?;
        std::fs::write(self.job_index_path(), yaml).map_err(io(&self.job_index_path()))
    }

    /// Repoints `runs/latest` at this run, matching the original
    /// tool's behaviour of a relative symlink so the run directory
    /// stays movable/renamable as a whole.
    pub fn update_latest(&self) -> Result<(), ReporterError> {
        let latest = self.runs_dir.join("latest");
        if latest.symlink_metadata().is_ok() {
            std::fs::remove_file(&latest).map_err(io(&latest))?;
        }
        std::os::unix::fs::symlink(self.run_id.as_str(), &latest).map_err(io(&latest))?;
        Ok(())
    }
}

impl JobLogSink for RunDir {
    fn record(&self, id: &JobId, job_name: &str, line: &str) {
        let Some(path) = self.job_log_path(id) else {
            tracing::warn!(job = %job_name, "no log file assigned for job, dropping log line");
            return;
        };
        let mut open_logs = self.open_logs.lock();
        let file = match open_logs.entry(id.clone()) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                let opened = OpenOptions::new().create(true).append(true).open(&path);
                match opened {
                    Ok(file) => entry.insert(file),
                    Err(err) => {
                        tracing::warn!(job = %job_name, path = %path.display(), error = %err, "failed to open job log, dropping log line");
                        return;
                    }
                }
            }
        };
        if let Err(err) = writeln!(file, "{line}") {
            tracing::warn!(job = %job_name, error = %err, "failed to append job log line");
        }
    }
}

/// Run directory names match `YYYYMMDD-HHMMSS-mmmmmm`: all digits plus
/// two dashes at fixed positions.
fn looks_like_run_id(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() == 22
        && bytes[8] == b'-'
        && bytes[15] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 8 || i == 15 || b.is_ascii_digit())
}

/// Every run id currently referenced by a tag symlink under
/// `<logroot>/tags/`; these are protected from pruning.
fn tagged_run_ids(log_root: &Path) -> Result<std::collections::HashSet<String>, ReporterError> {
    let tags_dir = log_root.join("tags");
    let mut tagged = std::collections::HashSet::new();
    let Ok(entries) = std::fs::read_dir(&tags_dir) else {
        return Ok(tagged);
    };
    for entry in entries {
        let entry = entry.map_err(io(&tags_dir))?;
        if let Ok(target) = std::fs::read_link(entry.path()) {
            if let Some(run_id) = target.file_name().and_then(|n| n.to_str()) {
                tagged.insert(run_id.to_string());
            }
        }
    }
    Ok(tagged)
}

/// Keeps the `keep_last_n` most recent runs by mtime, excluding any
/// run referenced by a tag symlink, and removes the rest.
pub fn prune_old_runs(log_root: &Path, keep_last_n: usize) -> Result<(), ReporterError> {
    let runs_dir = log_root.join("runs");
    let Ok(entries) = std::fs::read_dir(&runs_dir) else {
        return Ok(());
    };

    let tagged = tagged_run_ids(log_root)?;
    let mut runs: Vec<(PathBuf, std::time::SystemTime)> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(io(&runs_dir))?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !path.is_dir() || !looks_like_run_id(name) {
            continue;
        }
        let meta = entry.metadata().map_err(io(&path))?;
        let mtime = meta.modified().map_err(io(&path))?;
        runs.push((path, mtime));
    }
    runs.sort_by(|a, b| b.1.cmp(&a.1));

    for (path, _) in runs.into_iter().skip(keep_last_n) {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if tagged.contains(name) {
            continue;
        }
        std::fs::remove_dir_all(&path).map_err(io(&path))?;
    }
    Ok(())
}

/// A job's per-run log path, already written by a `RunDir`'s
/// `JobLogSink` implementation, exposed for `fm-cli log <job-id>`.
#[derive(Debug, Clone)]
pub struct JobLog {
    pub path: PathBuf,
}

impl JobLog {
    pub fn read(&self) -> Result<String, ReporterError> {
        std::fs::read_to_string(&self.path).map_err(io(&self.path))
    }
}

/// Creates `<logroot>/tags/<name>` as a relative symlink to
/// `../runs/<run_id>`. A second call with the same name replaces it.
pub fn create_tag(log_root: &Path, name: &str, run_id: &str) -> Result<(), ReporterError> {
    let tags_dir = log_root.join("tags");
    std::fs::create_dir_all(&tags_dir).map_err(io(&tags_dir))?;
    let tag_path = tags_dir.join(name);
    if tag_path.symlink_metadata().is_ok() {
        std::fs::remove_file(&tag_path).map_err(io(&tag_path))?;
    }
    let target = Path::new("..").join("runs").join(run_id);
    std::os::unix::fs::symlink(&target, &tag_path).map_err(io(&tag_path))?;
    Ok(())
}

pub fn delete_tag(log_root: &Path, name: &str) -> Result<(), ReporterError> {
    let tag_path = log_root.join("tags").join(name);
    if tag_path.symlink_metadata().is_err() {
        return Err(ReporterError::UnknownTag(name.to_string()));
    }
    std::fs::remove_file(&tag_path).map_err(io(&tag_path))
}

/// Lists every tag as `(name, run_id)`, sorted by tag name.
pub fn list_tags(log_root: &Path) -> Result<Vec<(String, String)>, ReporterError> {
    let tags_dir = log_root.join("tags");
    let Ok(entries) = std::fs::read_dir(&tags_dir) else {
        return Ok(Vec::new());
    };
    let mut tags = Vec::new();
    for entry in entries {
        let entry = entry.map_err(io(&tags_dir))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Ok(target) = std::fs::read_link(entry.path()) {
            if let Some(run_id) = target.file_name().and_then(|n| n.to_str()) {
                tags.push((name, run_id.to_string()));
            }
        }
    }
    tags.sort();
    Ok(tags)
}

/// Reads back a run directory's `jobs.yaml`, written by
/// `RunDir::write_job_index`.
pub fn read_job_index(run_dir: &Path) -> Result<Vec<JobIndexEntry>, ReporterError> {
    let path = run_dir.join("jobs.yaml");
    let content = std::fs::read_to_string(&path).map_err(io(&path))?;
    Ok(serde_yaml::from_str(&content)?)
}

/// Resolves `runs/latest` to the run id it currently points at.
pub fn latest_run_id(log_root: &Path) -> Result<Option<String>, ReporterError> {
    let latest = log_root.join("runs").join("latest");
    if latest.symlink_metadata().is_err() {
        return Ok(None);
    }
    let target = std::fs::read_link(&latest).map_err(io(&latest))?;
    Ok(target.file_name().and_then(|n| n.to_str()).map(str::to_string))
}

#[cfg(test)]
#[path = "runs_tests.rs"]
mod tests;
