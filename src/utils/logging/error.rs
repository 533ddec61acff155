//! Structured error context shared by every error type in the crate.
//!
//! [`ErrorContext`] carries a message, an optional source error, optional
//! key-value metadata, a timestamp, and a trace id. Error enums wrap their
//! variants in it so that one log line and one trace id describe a failure
//! wherever it bubbles up.

use chrono::Utc;
use std::{collections::HashMap, fmt};
use uuid::Uuid;

/// Contextual wrapper carried inside error enum variants.
///
/// The timestamp (RFC 3339) and trace id (UUID v4) are generated on
/// construction; when a source error already carries a trace id, that id is
/// adopted so a failure keeps one id across wrapping layers.
#[derive(Debug)]
pub struct ErrorContext {
	/// The error message
	pub message: String,
	/// The source error that caused this error
	pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
	/// Additional metadata about the error
	pub metadata: Option<HashMap<String, String>>,
	/// When the error was created, in RFC 3339 format
	pub timestamp: String,
	/// Identifier tying log lines for this failure together
	pub trace_id: String,
}

impl ErrorContext {
	/// Creates a new error context.
	///
	/// The trace id is taken from the source error when one is present and
	/// traceable, otherwise freshly generated.
	pub fn new(
		message: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let trace_id = source
			.as_ref()
			.map(|src| TraceableError::trace_id(src.as_ref()))
			.unwrap_or_else(|| Uuid::new_v4().to_string());

		Self {
			message: message.into(),
			source,
			metadata,
			timestamp: Utc::now().to_rfc3339(),
			trace_id,
		}
	}

	/// Creates a new error context and emits it as a structured error event.
	pub fn new_with_log(
		message: impl Into<String>,
		source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		let error_context = Self::new(message, source, metadata);
		log_error(&error_context);
		error_context
	}

	/// Adds a single metadata entry, creating the map when absent.
	pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.metadata
			.get_or_insert_with(HashMap::new)
			.insert(key.into(), value.into());
		self
	}

	/// Renders the message with metadata appended as `message [k1=v1, k2=v2]`.
	///
	/// Metadata keys are sorted so the rendering is stable.
	pub fn format_with_metadata(&self) -> String {
		let Some(metadata) = self.metadata.as_ref().filter(|m| !m.is_empty()) else {
			return self.message.clone();
		};

		let mut entries: Vec<_> = metadata.iter().collect();
		entries.sort();
		let rendered = entries
			.iter()
			.map(|(key, value)| format!("{}={}", key, value))
			.collect::<Vec<_>>()
			.join(", ");

		format!("{} [{}]", self.message, rendered)
	}
}

impl fmt::Display for ErrorContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.format_with_metadata())
	}
}

impl std::error::Error for ErrorContext {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.source
			.as_ref()
			.map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
	}
}

/// Errors that carry a trace id.
pub trait TraceableError: std::error::Error + Send + Sync {
	/// Returns the trace id for this error
	fn trace_id(&self) -> String;
}

/// How many source hops to follow when looking for an existing trace id.
const MAX_SOURCE_HOPS: usize = 3;

impl TraceableError for dyn std::error::Error + Send + Sync + 'static {
	fn trace_id(&self) -> String {
		if let Some(id) = known_trace_id(self) {
			return id;
		}

		// Walk the source chain so ids survive wrapping in opaque errors
		let mut source = self.source();
		for _ in 0..MAX_SOURCE_HOPS {
			let Some(err) = source else {
				break;
			};
			if let Some(id) = known_trace_id(err) {
				return id;
			}
			source = err.source();
		}

		Uuid::new_v4().to_string()
	}
}

/// Recovers the trace id from errors of known concrete types.
fn known_trace_id(err: &(dyn std::error::Error + 'static)) -> Option<String> {
	if let Some(ctx) = err.downcast_ref::<ErrorContext>() {
		return Some(ctx.trace_id.clone());
	}

	macro_rules! try_downcast {
		($($ty:path),* $(,)?) => {
			$(
				if let Some(typed) = err.downcast_ref::<$ty>() {
					return Some(typed.trace_id());
				}
			)*
		};
	}

	try_downcast!(
		crate::models::ConfigError,
		crate::repositories::RepositoryError,
		crate::services::evaluator::EvaluatorError,
		crate::utils::preview::PreviewError,
	);

	None
}

/// Renders an error and its sources as one `Caused by:` chain.
fn format_error_chain(err: &dyn std::error::Error) -> String {
	let mut rendered = err.to_string();
	let mut source = err.source();

	while let Some(err) = source {
		rendered.push_str("\n\tCaused by: ");
		rendered.push_str(&err.to_string());
		source = err.source();
	}

	rendered
}

/// Emits the error context as a structured tracing event.
fn log_error(error: &ErrorContext) {
	if let Some(err) = &error.source {
		tracing::error!(
			message = error.format_with_metadata(),
			trace_id = %error.trace_id,
			timestamp = %error.timestamp,
			error.chain = %format_error_chain(&**err),
			"Error occurred"
		);
	} else {
		tracing::error!(
			message = error.format_with_metadata(),
			trace_id = %error.trace_id,
			timestamp = %error.timestamp,
			"Error occurred"
		);
	}
}
