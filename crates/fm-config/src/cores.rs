// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Default core-budget detection.
//!
//! On Apple Silicon, `num_cpus::get()` counts efficiency cores too,
//! which overstates usable parallelism for CPU-bound steps. We prefer
//! the performance-core count there, same special case the Python
//! original carved out for `hw.perflevel0.physicalcpu`.

/// Detects a sensible default total-cores budget for this host.
pub fn detect_default_core_limit() -> usize {
    #[cfg(target_os = "macos")]
    {
        if let Some(perf_cores) = macos_performance_core_count() {
            return perf_cores.max(1);
        }
    }
    num_cpus::get().max(1)
}

#[cfg(target_os = "macos")]
fn macos_performance_core_count() -> Option<usize> {
    let output = std::process::Command::new("sysctl")
        .args(["-n", "hw.perflevel0.physicalcpu"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    std::str::from_utf8(&output.stdout)
        .ok()?
        .trim()
        .parse::<usize>()
        .ok()
}

#[cfg(test)]
#[path = "cores_tests.rs"]
mod tests;
