use super::*;

fn commands(submit: &str, status: &str) -> BatchCommands {
    BatchCommands {
        submit: submit.to_string(),
        status: status.to_string(),
    }
}

#[test]
fn submit_parses_the_first_token_of_stdout() {
    let cmds = commands("echo 987654 queued", "echo RUNNING");
    let id = submit(&cmds, Path::new("/tmp/job.sh")).unwrap();
    assert_eq!(id, "987654");
}

#[test]
fn submit_substitutes_the_script_placeholder() {
    let cmds = commands("echo {script}", "echo RUNNING");
    let id = submit(&cmds, Path::new("/tmp/job-42.sh")).unwrap();
    assert_eq!(id, "/tmp/job-42.sh");
}

#[test]
fn submit_failure_is_reported() {
    let cmds = commands("sh -c 'exit 3'", "echo RUNNING");
    let err = submit(&cmds, Path::new("/tmp/job.sh")).unwrap_err();
    assert!(matches!(err, BatchError::SubmitFailed { code: 3, .. }));
}

#[test]
fn status_substitutes_the_id_placeholder_and_classifies() {
    let cmds = commands("echo submitted", "echo RUNNING for {id}");
    let result = status(&cmds, "42").unwrap();
    assert_eq!(result, BatchStatus::Running);
}

#[test]
fn empty_submit_output_is_an_error() {
    let cmds = commands("true", "echo RUNNING");
    let err = submit(&cmds, Path::new("/tmp/job.sh")).unwrap_err();
    assert!(matches!(err, BatchError::NoJobIdInOutput));
}
