use super::*;

use fm_core::{Context, FunctionResult, Step, StepOutcome, StepParams};

struct NoopAction;

impl ActionConstructor for NoopAction {
    fn construct(&self, _params: StepParams) -> Box<dyn Step> {
        struct Noop;

        #[async_trait::async_trait]
        impl Step for Noop {
            fn command(&self, _ctx: &Context) -> Result<Option<String>, fm_core::InterpolationError> {
                Ok(None)
            }

            async fn run(&mut self, _ctx: &mut Context) -> StepOutcome {
                StepOutcome::default()
            }

            fn timeout_minutes(&self) -> f64 {
                1.0
            }

            fn name(&self) -> &str {
                "noop"
            }
        }

        Box::new(Noop)
    }
}

#[test]
fn last_registration_wins() {
    let registry = Registry::new();
    registry.register_action("probe", Arc::new(NoopAction));
    assert!(registry.has_action("probe"));
    registry.register_action("probe", Arc::new(NoopAction));
    assert!(registry.get_action("probe").is_some());
}

#[test]
fn unregistered_name_is_absent() {
    let registry = Registry::new();
    assert!(!registry.has_action("ghost"));
    assert!(registry.get_function("ghost").is_none());
}

#[test]
fn function_step_closures_register_directly() {
    let registry = Registry::new();
    let f: Arc<dyn StepFunction> = Arc::new(|_ctx: &Context, _params: &StepParams| FunctionResult {
        output: "ok".to_string(),
        return_code: 0,
    });
    registry.register_function("echo_ok", f);
    assert!(registry.has_function("echo_ok"));
}

#[test]
fn action_names_are_sorted() {
    let registry = Registry::new();
    registry.register_action("zeta", Arc::new(NoopAction));
    registry.register_action("alpha", Arc::new(NoopAction));
    assert_eq!(registry.action_names(), vec!["alpha".to_string(), "zeta".to_string()]);
}
