//! Integration tests for override evaluation semantics.
//!
//! Exercises the full evaluation pipeline over rendered overrides: priority
//! order, trace completeness, casting behavior and the serialized trace shape.

use override_evaluator::{
	models::{ComparisonOperator, EvaluationContext, EvaluationOutcome},
	services::evaluator::evaluate_config_value,
	utils::tests::builders::{and, comparison, not, or, OverrideBuilder},
};
use serde_json::{json, Value as JsonValue};

fn context_with(entries: Vec<(&str, JsonValue)>) -> EvaluationContext {
	let mut context = EvaluationContext::new();
	for (property, value) in entries {
		context.insert(property, value);
	}
	context
}

#[test]
fn test_matching_override_replaces_base_value() {
	let overrides = vec![OverrideBuilder::new("US users")
		.condition(ComparisonOperator::Equals, "country", json!("US"))
		.literal(json!("us-value"))
		.build()
		.rendered(json!("us-value"))];
	let context = context_with(vec![("country", json!("US"))]);

	let result = evaluate_config_value(&json!("base-value"), &overrides, &context).unwrap();

	assert_eq!(result.final_value, json!("us-value"));
	assert_eq!(
		result.matched_override.as_ref().map(|o| o.name.as_str()),
		Some("US users")
	);
	assert_eq!(result.override_evaluations.len(), 1);
	assert_eq!(
		result.override_evaluations[0].result,
		EvaluationOutcome::Matched
	);
}

#[test]
fn test_base_value_applies_when_nothing_matches() {
	let overrides = vec![OverrideBuilder::new("US users")
		.condition(ComparisonOperator::Equals, "country", json!("US"))
		.literal(json!("us-value"))
		.build()
		.rendered(json!("us-value"))];
	let context = context_with(vec![("country", json!("DE"))]);

	let result = evaluate_config_value(&json!("base-value"), &overrides, &context).unwrap();

	assert_eq!(result.final_value, json!("base-value"));
	assert!(result.matched_override.is_none());
	assert_eq!(
		result.override_evaluations[0].result,
		EvaluationOutcome::NotMatched
	);
}

#[test]
fn test_first_matching_override_wins() {
	let overrides = vec![
		OverrideBuilder::new("Admins")
			.condition(ComparisonOperator::Equals, "role", json!("admin"))
			.literal(json!(100))
			.build()
			.rendered(json!(100)),
		OverrideBuilder::new("Premium users")
			.condition(ComparisonOperator::Equals, "tier", json!("premium"))
			.literal(json!(50))
			.build()
			.rendered(json!(50)),
	];
	let context = context_with(vec![("role", json!("admin")), ("tier", json!("premium"))]);

	let result = evaluate_config_value(&json!(10), &overrides, &context).unwrap();

	// Both match, the lower index takes priority
	assert_eq!(result.final_value, json!(100));
	assert_eq!(
		result.matched_override.as_ref().map(|o| o.name.as_str()),
		Some("Admins")
	);
	assert_eq!(result.override_evaluations.len(), 2);
	assert_eq!(
		result.override_evaluations[1].result,
		EvaluationOutcome::Matched
	);
}

#[test]
fn test_all_overrides_traced_after_a_match() {
	let overrides: Vec<_> = (0..5)
		.map(|i| {
			OverrideBuilder::new(&format!("override-{}", i))
				.condition(ComparisonOperator::Equals, "country", json!("US"))
				.literal(json!(i))
				.build()
				.rendered(json!(i))
		})
		.collect();
	let context = context_with(vec![("country", json!("US"))]);

	let result = evaluate_config_value(&json!("base"), &overrides, &context).unwrap();

	assert_eq!(result.final_value, json!(0));
	assert_eq!(result.override_evaluations.len(), 5);
	for (index, evaluation) in result.override_evaluations.iter().enumerate() {
		assert_eq!(evaluation.override_index, index);
		assert_eq!(evaluation.override_name, format!("override-{}", index));
		assert_eq!(evaluation.result, EvaluationOutcome::Matched);
	}
}

#[test]
fn test_numeric_comparison_casts_string_rule_values() {
	let overrides = vec![OverrideBuilder::new("Adults")
		.condition(ComparisonOperator::GreaterThan, "age", json!("18"))
		.literal(json!("adult-content"))
		.build()
		.rendered(json!("adult-content"))];
	let context = context_with(vec![("age", json!(25))]);

	let result = evaluate_config_value(&json!("all-ages"), &overrides, &context).unwrap();

	assert_eq!(result.final_value, json!("adult-content"));
	let reason = &result.override_evaluations[0].condition_evaluations[0].reason;
	assert!(reason.contains("(casted)"), "reason was: {}", reason);
}

#[test]
fn test_missing_property_never_matches() {
	let overrides = vec![OverrideBuilder::new("US users")
		.condition(ComparisonOperator::Equals, "country", json!("US"))
		.literal(json!("us-value"))
		.build()
		.rendered(json!("us-value"))];

	let result =
		evaluate_config_value(&json!("base"), &overrides, &EvaluationContext::new()).unwrap();

	assert_eq!(result.final_value, json!("base"));
	let reason = &result.override_evaluations[0].condition_evaluations[0].reason;
	assert!(
		reason.contains("property not present in context"),
		"reason was: {}",
		reason
	);
}

#[test]
fn test_null_property_never_matches() {
	let overrides = vec![OverrideBuilder::new("No nickname")
		.condition(ComparisonOperator::Equals, "nickname", JsonValue::Null)
		.literal(json!("fallback"))
		.build()
		.rendered(json!("fallback"))];
	let context = context_with(vec![("nickname", JsonValue::Null)]);

	let result = evaluate_config_value(&json!("base"), &overrides, &context).unwrap();

	assert_eq!(result.final_value, json!("base"));
	let reason = &result.override_evaluations[0].condition_evaluations[0].reason;
	assert!(reason.contains("property is null"), "reason was: {}", reason);
}

#[test]
fn test_incompatible_types_reported_in_reason() {
	let overrides = vec![OverrideBuilder::new("Ordering on a word")
		.condition(ComparisonOperator::GreaterThan, "country", json!(10))
		.literal(json!("never"))
		.build()
		.rendered(json!("never"))];
	let context = context_with(vec![("country", json!("US"))]);

	let result = evaluate_config_value(&json!("base"), &overrides, &context).unwrap();

	assert_eq!(result.final_value, json!("base"));
	let reason = &result.override_evaluations[0].condition_evaluations[0].reason;
	assert!(
		reason.contains("could not compare incompatible types"),
		"reason was: {}",
		reason
	);
}

#[test]
fn test_membership_operators_cast_elements() {
	let overrides = vec![OverrideBuilder::new("Pilot cohort")
		.condition(ComparisonOperator::In, "accountId", json!(["100", "200"]))
		.literal(json!(true))
		.build()
		.rendered(json!(true))];
	let context = context_with(vec![("accountId", json!(200))]);

	let result = evaluate_config_value(&json!(false), &overrides, &context).unwrap();

	assert_eq!(result.final_value, json!(true));
	let reason = &result.override_evaluations[0].condition_evaluations[0].reason;
	assert!(reason.contains("(casted)"), "reason was: {}", reason);
}

#[test]
fn test_composite_conditions_trace_nested_evaluations() {
	let tree = or(vec![
		comparison(ComparisonOperator::Equals, "country", json!("US")),
		and(vec![
			comparison(ComparisonOperator::Equals, "tier", json!("premium")),
			not(comparison(ComparisonOperator::LessThan, "age", json!(18))),
		]),
	]);
	let overrides = vec![OverrideBuilder::new("Eligible users")
		.condition_tree(tree)
		.literal(json!("eligible"))
		.build()
		.rendered(json!("eligible"))];
	let context = context_with(vec![
		("country", json!("DE")),
		("tier", json!("premium")),
		("age", json!(30)),
	]);

	let result = evaluate_config_value(&json!("base"), &overrides, &context).unwrap();

	assert_eq!(result.final_value, json!("eligible"));
	let root = &result.override_evaluations[0].condition_evaluations[0];
	assert_eq!(root.result, EvaluationOutcome::Matched);

	// The `or` node carries both branches, matched or not
	let branches = root.nested_evaluations.as_ref().unwrap();
	assert_eq!(branches.len(), 2);
	assert_eq!(branches[0].result, EvaluationOutcome::NotMatched);
	assert_eq!(branches[1].result, EvaluationOutcome::Matched);

	// The `and` branch carries its children, the `not` child its single operand
	let and_children = branches[1].nested_evaluations.as_ref().unwrap();
	assert_eq!(and_children.len(), 2);
	let not_children = and_children[1].nested_evaluations.as_ref().unwrap();
	assert_eq!(not_children.len(), 1);
}

#[test]
fn test_trace_serializes_camel_case() {
	let overrides = vec![OverrideBuilder::new("US users")
		.condition(ComparisonOperator::Equals, "country", json!("US"))
		.literal(json!("us-value"))
		.build()
		.rendered(json!("us-value"))];
	let context = context_with(vec![("country", json!("US"))]);

	let result = evaluate_config_value(&json!("base"), &overrides, &context).unwrap();
	let serialized = serde_json::to_value(&result).unwrap();

	assert_eq!(serialized["finalValue"], json!("us-value"));
	assert_eq!(serialized["matchedOverride"]["name"], json!("US users"));

	let evaluation = &serialized["overrideEvaluations"][0];
	assert_eq!(evaluation["overrideName"], json!("US users"));
	assert_eq!(evaluation["overrideIndex"], json!(0));
	assert_eq!(evaluation["result"], json!("matched"));

	let condition = &evaluation["conditionEvaluations"][0];
	assert_eq!(condition["result"], json!("matched"));
	assert!(condition["reason"].is_string());
	// Leaf traces omit the nested list entirely
	assert!(condition.get("nestedEvaluations").is_none());
}

#[test]
fn test_empty_conditions_always_match() {
	let overrides = vec![OverrideBuilder::new("Everyone")
		.literal(json!("for-all"))
		.build()
		.rendered(json!("for-all"))];

	let result =
		evaluate_config_value(&json!("base"), &overrides, &EvaluationContext::new()).unwrap();

	assert_eq!(result.final_value, json!("for-all"));
	assert!(result.override_evaluations[0]
		.condition_evaluations
		.is_empty());
}
