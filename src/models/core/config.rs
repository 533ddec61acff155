use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::models::core::overrides::Override;

/// A configuration entry: a base value plus prioritized conditional overrides.
///
/// A Config defines what value SDK callers receive through a combination of:
/// - A base value returned when nothing else applies
/// - An ordered list of overrides, earlier entries taking priority
/// - Per-override condition trees matched against the caller's context
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// Unique name identifying this config
	pub name: String,

	/// Base value returned when no override matches
	pub value: JsonValue,

	/// Conditional overrides in priority order; index 0 has highest priority
	#[serde(default)]
	pub overrides: Vec<Override>,
}
