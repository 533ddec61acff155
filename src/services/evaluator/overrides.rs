//! Priority-ordered override evaluation.
//!
//! An override matches when every condition in its list matches (an empty
//! list always matches). Overrides are evaluated in list order, the first
//! match supplies the final value, and every override is traced whether or
//! not an earlier one already matched.

use serde_json::Value as JsonValue;

use crate::{
	models::{
		EvaluationContext, EvaluationOutcome, EvaluationResult, OverrideEvaluation,
		RenderedOverride,
	},
	services::evaluator::{condition::evaluate_condition, error::EvaluatorError},
};

/// Evaluates a single rendered override against a context.
///
/// The override's conditions form an implicit AND; each produces one entry
/// in the trace, in authored order, and all of them are evaluated even when
/// an earlier one has already failed.
pub fn evaluate_override(
	override_: &RenderedOverride,
	override_index: usize,
	context: &EvaluationContext,
) -> Result<OverrideEvaluation, EvaluatorError> {
	let condition_evaluations = override_
		.conditions
		.iter()
		.map(|condition| evaluate_condition(condition, context))
		.collect::<Result<Vec<_>, _>>()?;
	let matched = condition_evaluations
		.iter()
		.all(|evaluation| evaluation.result.is_matched());

	Ok(OverrideEvaluation {
		override_name: override_.name.clone(),
		override_index,
		result: EvaluationOutcome::from(matched),
		condition_evaluations,
	})
}

/// Resolves a config's effective value for a context.
///
/// Walks the rendered overrides in priority order (index 0 first). The first
/// matching override supplies the final value; when none matches, the base
/// value applies. The returned trace holds one record per override
/// regardless of where the first match occurred.
///
/// Arguments:
/// - base_value: The config's default value.
/// - overrides: The rendered overrides, highest priority first.
/// - context: The evaluation context.
///
/// Returns:
/// - The effective value, the matched override if any, and the full trace.
pub fn evaluate_config_value(
	base_value: &JsonValue,
	overrides: &[RenderedOverride],
	context: &EvaluationContext,
) -> Result<EvaluationResult, EvaluatorError> {
	let mut matched_override: Option<&RenderedOverride> = None;
	let mut override_evaluations = Vec::with_capacity(overrides.len());

	for (override_index, override_) in overrides.iter().enumerate() {
		let evaluation = evaluate_override(override_, override_index, context)?;
		if evaluation.result.is_matched() && matched_override.is_none() {
			matched_override = Some(override_);
		}
		override_evaluations.push(evaluation);
	}

	let final_value = matched_override
		.map(|override_| override_.value.clone())
		.unwrap_or_else(|| base_value.clone());

	Ok(EvaluationResult {
		final_value,
		matched_override: matched_override.cloned(),
		override_evaluations,
	})
}
