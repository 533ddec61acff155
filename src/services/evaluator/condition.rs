//! Recursive condition evaluation with full tracing.
//!
//! Walks a condition tree against an evaluation context and produces one
//! trace record per node. Composite nodes evaluate every child even after
//! the outcome is decided, so the trace always explains the whole tree.

use std::collections::HashMap;

use crate::{
	models::{
		ComparisonCondition, Condition, ConditionEvaluation, EvaluationContext, EvaluationOutcome,
	},
	services::evaluator::{comparator::compare_values, error::EvaluatorError},
	utils::constants::MAX_CONDITION_DEPTH,
};

/// Evaluates a condition tree against a context.
///
/// Malformed or missing data is absorbed into a not-matched trace record;
/// the only error is a tree nested past the supported depth bound, which
/// validation rejects at load time and can therefore only appear for
/// conditions built programmatically.
///
/// Arguments:
/// - condition: The condition tree to evaluate.
/// - context: The evaluation context supplying property values.
///
/// Returns:
/// - The trace record for the root node, with child records nested inside.
pub fn evaluate_condition(
	condition: &Condition,
	context: &EvaluationContext,
) -> Result<ConditionEvaluation, EvaluatorError> {
	evaluate_at_depth(condition, context, 1)
}

fn evaluate_at_depth(
	condition: &Condition,
	context: &EvaluationContext,
	depth: usize,
) -> Result<ConditionEvaluation, EvaluatorError> {
	if depth > MAX_CONDITION_DEPTH {
		return Err(EvaluatorError::depth_exceeded(
			format!(
				"condition tree nests deeper than the supported bound of {}",
				MAX_CONDITION_DEPTH
			),
			None,
			Some(HashMap::from([("depth".to_string(), depth.to_string())])),
		));
	}

	match condition {
		Condition::Comparison(comparison) => Ok(evaluate_comparison(comparison, context)),
		Condition::And { conditions } => {
			let nested = evaluate_children(conditions, context, depth)?;
			let failed = nested
				.iter()
				.filter(|child| !child.result.is_matched())
				.count();
			let matched = failed == 0;
			let reason = if matched {
				format!("all {} conditions matched", nested.len())
			} else {
				format!("{} of {} conditions did not match", failed, nested.len())
			};
			Ok(ConditionEvaluation {
				condition: condition.clone(),
				result: EvaluationOutcome::from(matched),
				reason,
				nested_evaluations: Some(nested),
			})
		}
		Condition::Or { conditions } => {
			let nested = evaluate_children(conditions, context, depth)?;
			let succeeded = nested
				.iter()
				.filter(|child| child.result.is_matched())
				.count();
			let matched = succeeded > 0;
			let reason = if matched {
				format!("{} of {} conditions matched", succeeded, nested.len())
			} else {
				format!("none of the {} conditions matched", nested.len())
			};
			Ok(ConditionEvaluation {
				condition: condition.clone(),
				result: EvaluationOutcome::from(matched),
				reason,
				nested_evaluations: Some(nested),
			})
		}
		Condition::Not { condition: inner } => {
			let nested = evaluate_at_depth(inner, context, depth + 1)?;
			let result = nested.result.negated();
			let reason = if result.is_matched() {
				"nested condition did not match".to_string()
			} else {
				"nested condition matched".to_string()
			};
			Ok(ConditionEvaluation {
				condition: condition.clone(),
				result,
				reason,
				nested_evaluations: Some(vec![nested]),
			})
		}
	}
}

/// Evaluates every child of an `and` / `or` node, preserving child order.
fn evaluate_children(
	conditions: &[Condition],
	context: &EvaluationContext,
	depth: usize,
) -> Result<Vec<ConditionEvaluation>, EvaluatorError> {
	conditions
		.iter()
		.map(|child| evaluate_at_depth(child, context, depth + 1))
		.collect()
}

/// Evaluates a leaf comparison by looking the property up in the context.
fn evaluate_comparison(
	comparison: &ComparisonCondition,
	context: &EvaluationContext,
) -> ConditionEvaluation {
	let context_value = context.get(&comparison.property);
	let outcome = compare_values(context_value, comparison.operator, &comparison.value);
	ConditionEvaluation {
		condition: Condition::Comparison(comparison.clone()),
		result: outcome.outcome,
		reason: outcome.reason,
		nested_evaluations: None,
	}
}
