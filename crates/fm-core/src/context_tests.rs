use super::*;

#[test]
fn new_context_has_reserved_keys() {
    let ctx = Context::new(None);
    assert_eq!(ctx.vars["matrix"], Value::Null);
    assert_eq!(ctx.vars["steps"], json!({}));
}

#[test]
fn record_step_output_is_visible_by_id() {
    let mut ctx = Context::new(Some(json!({"op": "add"})));
    ctx.record_step_output("compile", "hello\n".to_string());
    assert_eq!(
        ctx.lookup("steps.compile.output"),
        Some(&Value::String("hello\n".to_string()))
    );
}

#[test]
fn lookup_through_nil_subtree_is_none() {
    let ctx = Context::new(None);
    assert_eq!(ctx.lookup("matrix.op"), None);
}

#[test]
fn lookup_missing_step_id_is_none() {
    let ctx = Context::new(None);
    assert_eq!(ctx.lookup("steps.nope.output"), None);
}
