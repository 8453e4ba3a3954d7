//! `fm status` reads a finished run's report back off disk.

use crate::prelude::*;

#[test]
fn status_after_run_reflects_the_report() {
    let project = Project::empty();
    project.workflow(LINEAR_WORKFLOW);

    project.fm().args(&["run"]).passes();
    project
        .fm()
        .args(&["status"])
        .passes()
        .stdout_has("fetch")
        .stdout_has("build")
        .stdout_has("test");
}

#[test]
fn status_with_no_runs_fails() {
    let project = Project::empty();
    project.fm().args(&["status"]).fails();
}
