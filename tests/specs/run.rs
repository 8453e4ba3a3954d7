//! `fm run` over linear chains, cycles, oversize jobs, timeouts, and
//! matrix expansion — the scenarios named in spec §8.

use crate::prelude::*;

#[test]
fn linear_chain_runs_and_reports_success() {
    let project = Project::empty();
    project.workflow(LINEAR_WORKFLOW);

    project.fm().args(&["run"]).passes().stdout_has("complete");

    let report = project.latest_report();
    assert!(report.contains("fetch"));
    assert!(report.contains("build"));
    assert!(report.contains("test"));
    assert!(!report.contains("status: failed"));
}

#[test]
fn cyclic_dag_is_rejected_before_any_job_runs() {
    let project = Project::empty();
    project.workflow(
        r#"
jobs:
  a:
    needs: b
    steps:
      - run: echo a
  b:
    needs: a
    steps:
      - run: echo b
"#,
    );

    project.fm().args(&["run"]).fails().stderr_has("cyclic dependency");

    let runs_dir = project.log_root().join("runs");
    let ran_no_jobs = !runs_dir.exists()
        || std::fs::read_dir(&runs_dir)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(true);
    assert!(ran_no_jobs, "a cyclic DAG must abort before any run directory is created");
}

#[test]
fn oversize_job_is_skipped_not_aborted() {
    let project = Project::empty();
    project.workflow(
        r#"
jobs:
  tiny:
    steps:
      - run: echo ok
  huge:
    steps:
      - uses: mpi
        with:
          n_procs: 99999
          run: echo huge
"#,
    );

    project.fm().args(&["run", "--jobs", "1"]).run();

    let report = project.latest_report();
    assert!(report.contains("Job too big"));
    assert!(report.contains("tiny"));
}

#[test]
fn step_timeout_is_classified_as_failure_with_code_124() {
    let project = Project::empty();
    project.workflow(
        r#"
jobs:
  slow:
    timeout-minutes: 0.001
    steps:
      - run: sleep 5
"#,
    );

    project.fm().args(&["run"]).fails();

    let report = project.latest_report();
    assert!(report.contains("failed"));
    assert!(report.contains("124"));
}

#[test]
fn matrix_expansion_produces_one_job_per_binding() {
    let project = Project::empty();
    project.workflow(
        r#"
jobs:
  sweep:
    strategy:
      matrix:
        op: [add, sub]
    steps:
      - run: echo ${{ matrix.op }}
"#,
    );

    project.fm().args(&["run"]).passes();

    let report = project.latest_report();
    assert!(report.contains("sweep[op=add]"));
    assert!(report.contains("sweep[op=sub]"));
}

#[test]
fn no_workflow_files_found_is_a_configuration_error() {
    let project = Project::empty();
    project.fm().args(&["run"]).fails().stderr_has("no job specs found");
}
