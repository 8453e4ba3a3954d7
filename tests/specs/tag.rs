//! `fm tag add|list|delete` manages protective symlinks over a run.

use crate::prelude::*;

#[test]
fn tag_add_list_delete_round_trip() {
    let project = Project::empty();
    project.workflow(LINEAR_WORKFLOW);

    project.fm().args(&["run"]).passes();

    project.fm().args(&["tag", "add", "stable"]).passes();
    project.fm().args(&["tag", "list"]).passes().stdout_has("stable");
    project.fm().args(&["tag", "delete", "stable"]).passes();
    project.fm().args(&["tag", "list"]).passes().stdout_lacks("stable");
}

#[test]
fn deleting_unknown_tag_fails() {
    let project = Project::empty();
    project.fm().args(&["tag", "delete", "ghost"]).fails();
}
