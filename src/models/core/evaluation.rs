use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::models::core::{condition::Condition, overrides::RenderedOverride};

/// Outcome of evaluating a condition or an override against a context.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationOutcome {
	/// The condition or override matched the context
	Matched,
	/// The condition or override did not match the context
	NotMatched,
}

impl EvaluationOutcome {
	/// Returns true for `Matched`.
	pub fn is_matched(&self) -> bool {
		matches!(self, EvaluationOutcome::Matched)
	}

	/// Returns the opposite outcome.
	pub fn negated(&self) -> Self {
		match self {
			EvaluationOutcome::Matched => EvaluationOutcome::NotMatched,
			EvaluationOutcome::NotMatched => EvaluationOutcome::Matched,
		}
	}
}

impl From<bool> for EvaluationOutcome {
	fn from(matched: bool) -> Self {
		if matched {
			EvaluationOutcome::Matched
		} else {
			EvaluationOutcome::NotMatched
		}
	}
}

/// Trace record for a single condition node.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionEvaluation {
	/// The condition this record describes
	pub condition: Condition,

	/// Whether the condition matched
	pub result: EvaluationOutcome,

	/// Human-readable explanation of the outcome
	pub reason: String,

	/// Child evaluations in child order, populated for composite nodes only.
	/// A `not` node carries exactly one entry.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub nested_evaluations: Option<Vec<ConditionEvaluation>>,
}

/// Trace record for a single override.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideEvaluation {
	/// Name of the override this record describes
	pub override_name: String,

	/// Position of the override in the rendered list; 0 has highest priority
	pub override_index: usize,

	/// Whether every condition of the override matched
	pub result: EvaluationOutcome,

	/// One entry per condition in the override's implicit AND list, in order
	pub condition_evaluations: Vec<ConditionEvaluation>,
}

/// Complete result of evaluating a config against a context.
///
/// `final_value` is the field surfaced to SDK consumers; the matched override
/// and the per-override trace feed debug and preview tooling.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
	/// Effective value after override resolution
	pub final_value: JsonValue,

	/// The first matching override, or `null` when the base value applies
	pub matched_override: Option<RenderedOverride>,

	/// One entry per rendered override, in priority order
	pub override_evaluations: Vec<OverrideEvaluation>,
}
