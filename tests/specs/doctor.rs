//! `fm doctor` prints a diagnostic report of the resolved config.

use crate::prelude::*;

#[test]
fn prints_resolved_configuration() {
    let project = Project::empty();

    project
        .fm()
        .args(&["doctor"])
        .passes()
        .stdout_has("Log root")
        .stdout_has("Actions registered")
        .stdout_has("mpi");
}
