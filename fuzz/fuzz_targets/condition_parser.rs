#![no_main]

use libfuzzer_sys::fuzz_target;
use override_evaluator::models::Condition;

fuzz_target!(|data: &[u8]| {
    let _ = serde_json::from_slice::<Condition>(data);
});
