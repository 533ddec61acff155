//! Error types for override evaluation.
//!
//! Ordinary data problems (missing context keys, type mismatches, dangling
//! config references) never surface as errors; they are absorbed into
//! not-matched or excluded outcomes with explanatory reasons. The errors in
//! this module cover programmer mistakes only, such as condition trees built
//! past the supported depth bound.

use crate::utils::logging::error::{ErrorContext, TraceableError};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EvaluatorError {
	/// A condition tree nests deeper than the supported recursion bound.
	#[error("Condition depth exceeded: {0}")]
	DepthExceeded(Box<ErrorContext>),

	/// Other errors that don't fit into the categories above
	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl EvaluatorError {
	/// Creates a new `DepthExceeded` error.
	/// The `message` for `ErrorContext` should name the offending depth.
	pub fn depth_exceeded(
		message: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::DepthExceeded(Box::new(ErrorContext::new_with_log(
			message, source, metadata,
		)))
	}
}

impl TraceableError for EvaluatorError {
	fn trace_id(&self) -> String {
		match self {
			Self::DepthExceeded(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
