use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// The caller-supplied key/value bag conditions are evaluated against.
///
/// Keys are flat property names (e.g. `country`, `userEmail`); values are
/// arbitrary JSON. A property that is absent, or present with a `null` value,
/// never satisfies a condition.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EvaluationContext(Map<String, JsonValue>);

impl EvaluationContext {
	/// Creates an empty context.
	pub fn new() -> Self {
		Self(Map::new())
	}

	/// Returns the value stored under `property`, if any.
	pub fn get(&self, property: &str) -> Option<&JsonValue> {
		self.0.get(property)
	}

	/// Sets `property` to `value`, replacing any previous value.
	pub fn insert(&mut self, property: impl Into<String>, value: JsonValue) {
		self.0.insert(property.into(), value);
	}

	/// Returns the number of properties in the context.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true when the context holds no properties.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Map<String, JsonValue>> for EvaluationContext {
	fn from(properties: Map<String, JsonValue>) -> Self {
		Self(properties)
	}
}

impl FromIterator<(String, JsonValue)> for EvaluationContext {
	fn from_iter<I: IntoIterator<Item = (String, JsonValue)>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}
