//! Core domain models for the override evaluation system.
//!
//! This module contains the fundamental data structures that represent:
//! - Configs: A base value plus prioritized conditional overrides
//! - Conditions: Leaf comparisons and boolean combinators matched against a context
//! - Contexts: The caller-supplied key/value bag conditions read from
//! - Evaluations: Trace records explaining why each override did or did not match

mod condition;
mod config;
mod context;
mod evaluation;
mod overrides;

pub use condition::{ComparisonCondition, ComparisonOperator, Condition, OPERATOR_NAMES};
pub use config::Config;
pub use context::EvaluationContext;
pub use evaluation::{
	ConditionEvaluation, EvaluationOutcome, EvaluationResult, OverrideEvaluation,
};
pub use overrides::{Override, OverrideValue, RenderedOverride};
