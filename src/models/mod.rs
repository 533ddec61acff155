//! Domain models and data structures for override evaluation.
//!
//! This module contains all the core data structures used throughout the application:
//!
//! - `config`: Configuration loading and validation
//! - `core`: Core domain models (Config, Condition, Override, evaluation traces)

mod config;
mod core;

// Re-export core types
pub use core::{
	ComparisonCondition, ComparisonOperator, Condition, ConditionEvaluation, Config,
	EvaluationContext, EvaluationOutcome, EvaluationResult, Override, OverrideEvaluation,
	OverrideValue, RenderedOverride, OPERATOR_NAMES,
};

// Re-export config types
pub use config::{ConfigError, ConfigLoader};
