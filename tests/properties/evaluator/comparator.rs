//! Property-based tests for the casting comparator.
//!
//! Covers totality, operator dualities and the numeric casting rules.

use crate::properties::strategies::{
	comparison_operator_strategy, leaf_value_strategy, ordering_operator_strategy,
	rule_value_strategy,
};
use override_evaluator::{models::ComparisonOperator, services::evaluator::compare_values};
use proptest::{prelude::*, test_runner::Config};
use serde_json::{json, Value as JsonValue};

prop_compose! {
	/// Two values of the same JSON kind, so equality is always comparable.
	fn same_kind_pair()(
		pair in prop_oneof![
			("[a-z0-9]{0,6}", "[a-z0-9]{0,6}").prop_map(|(a, b)| (json!(a), json!(b))),
			(any::<i64>(), any::<i64>()).prop_map(|(a, b)| (json!(a), json!(b))),
			(any::<bool>(), any::<bool>()).prop_map(|(a, b)| (json!(a), json!(b))),
		]
	) -> (JsonValue, JsonValue) {
		pair
	}
}

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	#[test]
	fn test_comparison_is_total(
		context_value in proptest::option::of(rule_value_strategy()),
		operator in comparison_operator_strategy(),
		rule_value in rule_value_strategy(),
	) {
		let comparison = compare_values(context_value.as_ref(), operator, &rule_value);
		prop_assert!(!comparison.reason.is_empty());
	}

	#[test]
	fn test_missing_and_null_context_never_match(
		operator in comparison_operator_strategy(),
		rule_value in rule_value_strategy(),
	) {
		let missing = compare_values(None, operator, &rule_value);
		prop_assert!(!missing.outcome.is_matched());
		prop_assert!(missing.reason.contains("property not present in context"));

		let null = compare_values(Some(&JsonValue::Null), operator, &rule_value);
		prop_assert!(!null.outcome.is_matched());
		prop_assert!(null.reason.contains("property is null"));
	}

	#[test]
	fn test_equality_operators_are_dual_on_same_kind(
		(context_value, rule_value) in same_kind_pair(),
	) {
		let equals = compare_values(Some(&context_value), ComparisonOperator::Equals, &rule_value);
		let not_equals =
			compare_values(Some(&context_value), ComparisonOperator::NotEquals, &rule_value);
		prop_assert_ne!(equals.outcome, not_equals.outcome);
	}

	#[test]
	fn test_numeric_cast_is_symmetric(n in any::<i64>()) {
		let number = json!(n);
		let text = json!(n.to_string());

		let number_to_text =
			compare_values(Some(&number), ComparisonOperator::Equals, &text);
		prop_assert!(number_to_text.outcome.is_matched());
		prop_assert!(number_to_text.reason.contains("(casted)"));

		let text_to_number =
			compare_values(Some(&text), ComparisonOperator::Equals, &number);
		prop_assert!(text_to_number.outcome.is_matched());
	}

	#[test]
	fn test_ordering_agrees_with_integer_ordering(
		a in any::<i64>(),
		b in any::<i64>(),
		operator in ordering_operator_strategy(),
	) {
		let expected = match operator {
			ComparisonOperator::LessThan => a < b,
			ComparisonOperator::LessThanOrEqual => a <= b,
			ComparisonOperator::GreaterThan => a > b,
			ComparisonOperator::GreaterThanOrEqual => a >= b,
			_ => unreachable!(),
		};

		let direct = compare_values(Some(&json!(a)), operator, &json!(b));
		prop_assert_eq!(direct.outcome.is_matched(), expected);

		// The rule side as a numeric string orders identically, with a cast
		let casted = compare_values(Some(&json!(a)), operator, &json!(b.to_string()));
		prop_assert_eq!(casted.outcome.is_matched(), expected);
		prop_assert!(casted.reason.contains("(casted)"));
	}

	#[test]
	fn test_strict_and_inclusive_ordering_are_complements(
		a in any::<i64>(),
		b in any::<i64>(),
	) {
		let context = json!(a);
		let rule = json!(b);

		let lt = compare_values(Some(&context), ComparisonOperator::LessThan, &rule);
		let gte = compare_values(Some(&context), ComparisonOperator::GreaterThanOrEqual, &rule);
		prop_assert_ne!(lt.outcome, gte.outcome);

		let gt = compare_values(Some(&context), ComparisonOperator::GreaterThan, &rule);
		let lte = compare_values(Some(&context), ComparisonOperator::LessThanOrEqual, &rule);
		prop_assert_ne!(gt.outcome, lte.outcome);
	}

	#[test]
	fn test_membership_operators_are_dual(
		context_value in leaf_value_strategy(),
		candidates in proptest::collection::vec(leaf_value_strategy(), 0..6),
	) {
		let rule_value = JsonValue::Array(candidates);

		let included = compare_values(Some(&context_value), ComparisonOperator::In, &rule_value);
		let excluded =
			compare_values(Some(&context_value), ComparisonOperator::NotIn, &rule_value);
		prop_assert_ne!(included.outcome, excluded.outcome);
	}

	#[test]
	fn test_membership_mirrors_array_containment(
		scalar in leaf_value_strategy(),
		elements in proptest::collection::vec(leaf_value_strategy(), 0..6),
	) {
		let array = JsonValue::Array(elements);

		// `x in array` and `array contains x` apply the same casting matrix
		let membership = compare_values(Some(&scalar), ComparisonOperator::In, &array);
		let containment = compare_values(Some(&array), ComparisonOperator::Contains, &scalar);
		prop_assert_eq!(membership.outcome, containment.outcome);
	}

	#[test]
	fn test_string_containment_operators_are_dual(
		haystack in "[a-z0-9]{0,12}",
		needle in "[a-z0-9]{0,4}",
	) {
		let context = json!(haystack);
		let rule = json!(needle);

		let contains = compare_values(Some(&context), ComparisonOperator::Contains, &rule);
		let not_contains =
			compare_values(Some(&context), ComparisonOperator::NotContains, &rule);
		prop_assert_ne!(contains.outcome, not_contains.outcome);
		prop_assert_eq!(contains.outcome.is_matched(), haystack.contains(&needle));
	}
}
