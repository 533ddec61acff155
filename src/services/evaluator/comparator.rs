//! Type-casting comparator for condition leaves.
//!
//! Compares a context-supplied value against a rule-side literal the way a
//! config author would expect: numeric strings compare as numbers, boolean
//! strings as booleans, ordering is always numeric. Every comparison is
//! total: operands that cannot be reconciled produce a not-matched outcome
//! with an explanatory reason instead of an error. Reasons name any cast
//! that was applied ("casted") and, on a mismatch, what was expected
//! ("expected"); debug tooling renders these substrings verbatim.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

use crate::{
	models::{ComparisonOperator, EvaluationOutcome},
	utils::normalize_string,
};

/// Outcome of a single leaf comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
	/// Whether the comparison matched
	pub outcome: EvaluationOutcome,
	/// Human-readable explanation of the outcome
	pub reason: String,
}

impl Comparison {
	fn not_matched(reason: impl Into<String>) -> Self {
		Self {
			outcome: EvaluationOutcome::NotMatched,
			reason: reason.into(),
		}
	}

	/// Builds the standard matched / not-matched wording for an operator.
	fn resolved(
		matched: bool,
		casted: bool,
		context_value: &JsonValue,
		operator: ComparisonOperator,
		rule_value: &JsonValue,
	) -> Self {
		let cast_note = if casted { " (casted)" } else { "" };
		let reason = if matched {
			format!(
				"context value {} {} {}{}",
				context_value,
				matched_phrase(operator),
				rule_value,
				cast_note
			)
		} else {
			format!(
				"expected a value {} {}, got {}{}",
				expected_phrase(operator),
				rule_value,
				context_value,
				cast_note
			)
		};
		Self {
			outcome: EvaluationOutcome::from(matched),
			reason,
		}
	}

	/// Builds the wording for operands no cast can reconcile.
	fn incomparable(
		context_value: &JsonValue,
		operator: ComparisonOperator,
		rule_value: &JsonValue,
	) -> Self {
		Self::not_matched(format!(
			"could not compare incompatible types: expected a value {} {}, got {}",
			expected_phrase(operator),
			rule_value,
			context_value
		))
	}
}

/// Wording used when a comparison matched, keyed by operator.
fn matched_phrase(operator: ComparisonOperator) -> &'static str {
	match operator {
		ComparisonOperator::Equals => "is equal to",
		ComparisonOperator::NotEquals => "is not equal to",
		ComparisonOperator::LessThan => "is less than",
		ComparisonOperator::LessThanOrEqual => "is at most",
		ComparisonOperator::GreaterThan => "is greater than",
		ComparisonOperator::GreaterThanOrEqual => "is at least",
		ComparisonOperator::In => "is one of",
		ComparisonOperator::NotIn => "is not one of",
		ComparisonOperator::Contains => "contains",
		ComparisonOperator::NotContains => "does not contain",
	}
}

/// Wording used when a comparison did not match, keyed by operator.
fn expected_phrase(operator: ComparisonOperator) -> &'static str {
	match operator {
		ComparisonOperator::Equals => "equal to",
		ComparisonOperator::NotEquals => "not equal to",
		ComparisonOperator::LessThan => "less than",
		ComparisonOperator::LessThanOrEqual => "at most",
		ComparisonOperator::GreaterThan => "greater than",
		ComparisonOperator::GreaterThanOrEqual => "at least",
		ComparisonOperator::In => "one of",
		ComparisonOperator::NotIn => "not one of",
		ComparisonOperator::Contains => "containing",
		ComparisonOperator::NotContains => "not containing",
	}
}

/// Parses a decimal out of a string, accepting plain and scientific notation.
fn parse_decimal(text: &str) -> Option<Decimal> {
	let trimmed = text.trim();
	Decimal::from_str(trimmed)
		.ok()
		.or_else(|| Decimal::from_scientific(trimmed).ok())
}

/// Numeric view of a value: JSON numbers directly, numeric strings by cast.
fn decimal_value(value: &JsonValue) -> Option<Decimal> {
	match value {
		JsonValue::Number(number) => parse_decimal(&number.to_string()),
		JsonValue::String(text) => parse_decimal(text),
		_ => None,
	}
}

/// Boolean view of a string: `"true"` / `"false"`, case-insensitive.
fn parse_boolean(text: &str) -> Option<bool> {
	match normalize_string(text).as_str() {
		"true" => Some(true),
		"false" => Some(false),
		_ => None,
	}
}

/// Returns true when a value is a number or a string that casts to one.
pub fn casts_to_number(value: &JsonValue) -> bool {
	match value {
		JsonValue::Number(_) => true,
		JsonValue::String(text) => parse_decimal(text).is_some(),
		_ => false,
	}
}

/// How two values relate under equality, after any applicable cast.
enum Equivalence {
	/// The values were comparable; `casted` records whether a cast was needed
	Comparable { equal: bool, casted: bool },
	/// No cast reconciles the two types
	Incomparable,
}

/// Equality across the casting matrix: same-type values compare directly,
/// number/numeric-string and boolean/boolean-string pairs compare after a
/// cast, everything else is incomparable.
fn check_equivalence(context_value: &JsonValue, rule_value: &JsonValue) -> Equivalence {
	match (context_value, rule_value) {
		(JsonValue::String(left), JsonValue::String(right)) => Equivalence::Comparable {
			equal: left == right,
			casted: false,
		},
		(JsonValue::Bool(left), JsonValue::Bool(right)) => Equivalence::Comparable {
			equal: left == right,
			casted: false,
		},
		(JsonValue::Number(_), JsonValue::Number(_)) => {
			// Decimal comparison lets 1 equal 1.0; raw equality is the
			// fallback for numbers outside the decimal range.
			let equal = match (decimal_value(context_value), decimal_value(rule_value)) {
				(Some(left), Some(right)) => left == right,
				_ => context_value == rule_value,
			};
			Equivalence::Comparable {
				equal,
				casted: false,
			}
		}
		(JsonValue::Number(_), JsonValue::String(text))
		| (JsonValue::String(text), JsonValue::Number(_)) => match parse_decimal(text) {
			Some(_) => {
				let equal = match (decimal_value(context_value), decimal_value(rule_value)) {
					(Some(left), Some(right)) => left == right,
					_ => false,
				};
				Equivalence::Comparable {
					equal,
					casted: true,
				}
			}
			None => Equivalence::Incomparable,
		},
		(JsonValue::Bool(flag), JsonValue::String(text))
		| (JsonValue::String(text), JsonValue::Bool(flag)) => match parse_boolean(text) {
			Some(parsed) => Equivalence::Comparable {
				equal: parsed == *flag,
				casted: true,
			},
			None => Equivalence::Incomparable,
		},
		(JsonValue::Array(left), JsonValue::Array(right)) => Equivalence::Comparable {
			equal: left == right,
			casted: false,
		},
		(JsonValue::Object(left), JsonValue::Object(right)) => Equivalence::Comparable {
			equal: left == right,
			casted: false,
		},
		_ => Equivalence::Incomparable,
	}
}

/// Applies an ordering operator to the relation between two decimals.
fn ordering_matches(operator: ComparisonOperator, ordering: std::cmp::Ordering) -> bool {
	match operator {
		ComparisonOperator::LessThan => ordering.is_lt(),
		ComparisonOperator::LessThanOrEqual => ordering.is_le(),
		ComparisonOperator::GreaterThan => ordering.is_gt(),
		ComparisonOperator::GreaterThanOrEqual => ordering.is_ge(),
		// Non-ordering operators are dispatched elsewhere
		_ => false,
	}
}

/// Compares a context value against a rule-side literal.
///
/// `context_value` is `None` when the property is absent from the context;
/// absent and null values never match, whatever the operator.
///
/// Arguments:
/// - context_value: The context-supplied value for the condition's property.
/// - operator: The comparison operator to apply.
/// - rule_value: The rule-side literal operand.
///
/// Returns:
/// - The outcome together with a human-readable reason.
pub fn compare_values(
	context_value: Option<&JsonValue>,
	operator: ComparisonOperator,
	rule_value: &JsonValue,
) -> Comparison {
	let Some(context_value) = context_value else {
		return Comparison::not_matched(format!(
			"property not present in context, expected a value {} {}",
			expected_phrase(operator),
			rule_value
		));
	};
	if context_value.is_null() {
		return Comparison::not_matched(format!(
			"property is null, expected a value {} {}",
			expected_phrase(operator),
			rule_value
		));
	}

	tracing::debug!(
		"Comparing context value {} against {} with operator '{}'",
		context_value,
		rule_value,
		operator
	);

	match operator {
		ComparisonOperator::Equals => compare_equality(context_value, rule_value, false),
		ComparisonOperator::NotEquals => compare_equality(context_value, rule_value, true),
		ComparisonOperator::LessThan
		| ComparisonOperator::LessThanOrEqual
		| ComparisonOperator::GreaterThan
		| ComparisonOperator::GreaterThanOrEqual => {
			compare_ordering(context_value, operator, rule_value)
		}
		ComparisonOperator::In => compare_membership(context_value, rule_value, false),
		ComparisonOperator::NotIn => compare_membership(context_value, rule_value, true),
		ComparisonOperator::Contains => compare_containment(context_value, rule_value, false),
		ComparisonOperator::NotContains => compare_containment(context_value, rule_value, true),
	}
}

/// `equals` / `not_equals` over the casting matrix.
fn compare_equality(context_value: &JsonValue, rule_value: &JsonValue, negated: bool) -> Comparison {
	let operator = if negated {
		ComparisonOperator::NotEquals
	} else {
		ComparisonOperator::Equals
	};
	match check_equivalence(context_value, rule_value) {
		Equivalence::Comparable { equal, casted } => Comparison::resolved(
			equal != negated,
			casted,
			context_value,
			operator,
			rule_value,
		),
		Equivalence::Incomparable => Comparison::incomparable(context_value, operator, rule_value),
	}
}

/// Ordering operators: numeric comparison only, after casting.
fn compare_ordering(
	context_value: &JsonValue,
	operator: ComparisonOperator,
	rule_value: &JsonValue,
) -> Comparison {
	match (decimal_value(context_value), decimal_value(rule_value)) {
		(Some(left), Some(right)) => {
			let casted = !context_value.is_number() || !rule_value.is_number();
			let matched = ordering_matches(operator, left.cmp(&right));
			Comparison::resolved(matched, casted, context_value, operator, rule_value)
		}
		_ => Comparison::incomparable(context_value, operator, rule_value),
	}
}

/// `in` / `not_in`: membership of the context value in the rule-side array,
/// casting each candidate to the context value's type.
fn compare_membership(
	context_value: &JsonValue,
	rule_value: &JsonValue,
	negated: bool,
) -> Comparison {
	let operator = if negated {
		ComparisonOperator::NotIn
	} else {
		ComparisonOperator::In
	};
	let JsonValue::Array(candidates) = rule_value else {
		return Comparison::not_matched(format!(
			"expected an array rule value for `{}`, got {}",
			operator, rule_value
		));
	};

	let mut found = false;
	let mut casted_any = false;
	for candidate in candidates {
		if let Equivalence::Comparable { equal, casted } =
			check_equivalence(context_value, candidate)
		{
			casted_any |= casted;
			found |= equal;
		}
	}

	Comparison::resolved(
		found != negated,
		casted_any,
		context_value,
		operator,
		rule_value,
	)
}

/// `contains` / `not_contains`: substring search for string contexts,
/// element membership for array contexts.
fn compare_containment(
	context_value: &JsonValue,
	rule_value: &JsonValue,
	negated: bool,
) -> Comparison {
	let operator = if negated {
		ComparisonOperator::NotContains
	} else {
		ComparisonOperator::Contains
	};
	match context_value {
		JsonValue::String(haystack) => {
			let (needle, casted) = match rule_value {
				JsonValue::String(text) => (text.clone(), false),
				JsonValue::Number(number) => (number.to_string(), true),
				JsonValue::Bool(flag) => (flag.to_string(), true),
				_ => {
					return Comparison::incomparable(context_value, operator, rule_value);
				}
			};
			Comparison::resolved(
				haystack.contains(&needle) != negated,
				casted,
				context_value,
				operator,
				rule_value,
			)
		}
		JsonValue::Array(elements) => {
			let mut found = false;
			let mut casted_any = false;
			for element in elements {
				if let Equivalence::Comparable { equal, casted } =
					check_equivalence(element, rule_value)
				{
					casted_any |= casted;
					found |= equal;
				}
			}
			Comparison::resolved(
				found != negated,
				casted_any,
				context_value,
				operator,
				rule_value,
			)
		}
		_ => Comparison::incomparable(context_value, operator, rule_value),
	}
}
