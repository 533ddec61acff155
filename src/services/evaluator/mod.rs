//! Override evaluation services.
//!
//! Turns a config's authored overrides into an effective value for a given
//! evaluation context. Rendering resolves config references up front, then
//! evaluation walks the rendered overrides in priority order, comparing
//! context properties against rule values with type casting and recording
//! a complete trace of every decision along the way.
//!
//! Evaluation is total over config and context data: malformed operands,
//! missing properties, and dangling references all degrade to not-matched
//! outcomes or skipped overrides with reasons attached, never errors. The
//! error type exists for programmer mistakes such as condition trees built
//! past the supported nesting depth.

mod comparator;
mod condition;
mod error;
mod overrides;
mod render;

pub use comparator::{casts_to_number, compare_values, Comparison};
pub use condition::evaluate_condition;
pub use error::EvaluatorError;
pub use overrides::{evaluate_config_value, evaluate_override};
pub use render::{evaluate_config, render_overrides, ConfigResolver};
