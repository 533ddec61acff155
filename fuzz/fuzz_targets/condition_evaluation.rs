#![no_main]

use libfuzzer_sys::fuzz_target;
use override_evaluator::{
    models::{Condition, EvaluationContext},
    services::evaluator::evaluate_condition,
};

fuzz_target!(|data: &[u8]| {
    let Ok(condition) = serde_json::from_slice::<Condition>(data) else {
        return;
    };

    let context: EvaluationContext = [
        ("country".to_string(), serde_json::json!("US")),
        ("age".to_string(), serde_json::json!(25)),
        ("tier".to_string(), serde_json::json!("premium")),
        ("flag".to_string(), serde_json::json!(true)),
        ("empty".to_string(), serde_json::Value::Null),
    ]
    .into_iter()
    .collect();

    let _ = evaluate_condition(&condition, &context);
    let _ = evaluate_condition(&condition, &EvaluationContext::new());
});
