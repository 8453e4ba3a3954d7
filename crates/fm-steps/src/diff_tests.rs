use super::*;
use fm_core::Context;

#[tokio::test]
async fn fail_on_diff_false_remaps_nonzero_to_success() {
    let mut ctx = Context::new(None);
    let mut step = DiffCheckStep {
        name: "diff".to_string(),
        tool: "sh".to_string(),
        args: vec!["-c".to_string(), "exit 1".to_string()],
        working_directory: None,
        timeout_minutes: 1.0,
        fail_on_diff: false,
    };
    assert_eq!(step.run(&mut ctx).await.return_code, 0);
}

#[tokio::test]
async fn fail_on_diff_true_keeps_nonzero() {
    let mut ctx = Context::new(None);
    let mut step = DiffCheckStep {
        name: "diff".to_string(),
        tool: "sh".to_string(),
        args: vec!["-c".to_string(), "exit 1".to_string()],
        working_directory: None,
        timeout_minutes: 1.0,
        fail_on_diff: true,
    };
    assert_eq!(step.run(&mut ctx).await.return_code, 1);
}

#[test]
fn exodiff_constructor_builds_tolerance_flags() {
    let mut with = std::collections::BTreeMap::new();
    with.insert("reference".to_string(), serde_json::json!("gold.e"));
    with.insert("test".to_string(), serde_json::json!("out.e"));
    with.insert("rtol".to_string(), serde_json::json!(1e-6));

    let step = ExodiffConstructor.construct(StepParams {
        name: "compare".to_string(),
        working_directory: None,
        timeout_minutes: 1.0,
        id: None,
        with,
    });
    let ctx = Context::new(None);
    let command = step.command(&ctx).unwrap().unwrap();
    assert!(command.starts_with("exodiff"));
    assert!(command.contains("-absolute"));
    assert!(command.ends_with("gold.e out.e"));
}

#[test]
fn h5diff_constructor_appends_dataset_path() {
    let mut with = std::collections::BTreeMap::new();
    with.insert("gold".to_string(), serde_json::json!("gold.h5"));
    with.insert("test".to_string(), serde_json::json!("out.h5"));
    with.insert("dataset".to_string(), serde_json::json!("/results/u"));
    with.insert("rel-tol".to_string(), serde_json::json!(1e-3));

    let step = H5diffConstructor.construct(StepParams {
        name: "compare".to_string(),
        working_directory: None,
        timeout_minutes: 1.0,
        id: None,
        with,
    });
    let ctx = Context::new(None);
    let command = step.command(&ctx).unwrap().unwrap();
    assert!(command.ends_with("gold.h5 out.h5 /results/u"));
}
