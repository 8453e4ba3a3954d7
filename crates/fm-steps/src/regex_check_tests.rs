use super::*;
use fm_core::Context;

#[tokio::test]
async fn matching_pattern_returns_zero() {
    let mut ctx = Context::new(None);
    ctx.record_step_output("compile", "build succeeded\n".to_string());
    let mut step = RegexCheckStep {
        name: "check".to_string(),
        input_template: "${{ steps.compile.output }}".to_string(),
        pattern: regex::Regex::new("succeeded").unwrap(),
        timeout_minutes: 1.0,
    };
    assert_eq!(step.run(&mut ctx).await.return_code, 0);
}

#[tokio::test]
async fn non_matching_pattern_returns_no_match() {
    let mut ctx = Context::new(None);
    ctx.record_step_output("compile", "build failed\n".to_string());
    let mut step = RegexCheckStep {
        name: "check".to_string(),
        input_template: "${{ steps.compile.output }}".to_string(),
        pattern: regex::Regex::new("succeeded").unwrap(),
        timeout_minutes: 1.0,
    };
    assert_eq!(step.run(&mut ctx).await.return_code, NO_MATCH);
}

#[test]
fn missing_pattern_param_is_rejected() {
    let constructor = RegexCheckConstructor;
    let err = constructor
        .try_construct(StepParams {
            name: "check".to_string(),
            working_directory: None,
            timeout_minutes: 1.0,
            id: None,
            with: std::collections::BTreeMap::new(),
        })
        .unwrap_err();
    assert!(matches!(err, RegexCheckError::MissingPattern));
}

#[tokio::test]
async fn construct_falls_back_to_a_failing_step_on_bad_pattern() {
    let constructor = RegexCheckConstructor;
    let mut with = std::collections::BTreeMap::new();
    with.insert("pattern".to_string(), serde_json::json!("(unterminated"));
    let mut step = constructor.construct(StepParams {
        name: "check".to_string(),
        working_directory: None,
        timeout_minutes: 1.0,
        id: None,
        with,
    });
    let mut ctx = Context::new(None);
    assert_ne!(step.run(&mut ctx).await.return_code, 0);
}
