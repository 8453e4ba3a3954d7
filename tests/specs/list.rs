//! `fm list` discovers workflow files without running anything.

use crate::prelude::*;

#[test]
fn lists_discovered_job_names() {
    let project = Project::empty();
    project.workflow(LINEAR_WORKFLOW);

    project
        .fm()
        .args(&["list"])
        .passes()
        .stdout_has("fetch")
        .stdout_has("build")
        .stdout_has("test");
}

#[test]
fn list_does_not_create_a_run_directory() {
    let project = Project::empty();
    project.workflow(LINEAR_WORKFLOW);

    project.fm().args(&["list"]).passes();
    assert!(!project.log_root().join("runs").exists());
}

#[test]
fn empty_location_reports_no_specs() {
    let project = Project::empty();
    project
        .fm()
        .args(&["list"])
        .passes()
        .stdout_is("no job specs found");
}
