//! Test helper utilities for Config definitions
//!
//! - `ConfigBuilder`: Builder for creating test Config instances
//! - `OverrideBuilder`: Builder for creating test Override instances

use serde_json::{json, Value as JsonValue};

use crate::{
	models::{ComparisonOperator, Condition, Config, Override, OverrideValue},
	utils::tests::builders::condition::comparison,
};

/// Builder for creating test Config instances
pub struct ConfigBuilder {
	name: String,
	value: JsonValue,
	overrides: Vec<Override>,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self {
			name: "test-config".to_string(),
			value: json!("base"),
			overrides: vec![],
		}
	}
}

impl ConfigBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn name(mut self, name: &str) -> Self {
		self.name = name.to_string();
		self
	}

	pub fn value(mut self, value: JsonValue) -> Self {
		self.value = value;
		self
	}

	pub fn add_override(mut self, override_: Override) -> Self {
		self.overrides.push(override_);
		self
	}

	pub fn overrides(mut self, overrides: Vec<Override>) -> Self {
		self.overrides = overrides;
		self
	}

	pub fn build(self) -> Config {
		Config {
			name: self.name,
			value: self.value,
			overrides: self.overrides,
		}
	}
}

/// Builder for creating test Override instances
pub struct OverrideBuilder {
	name: String,
	conditions: Vec<Condition>,
	value: OverrideValue,
}

impl OverrideBuilder {
	pub fn new(name: &str) -> Self {
		Self {
			name: name.to_string(),
			conditions: vec![],
			value: OverrideValue::Literal(json!(true)),
		}
	}

	pub fn condition(
		mut self,
		operator: ComparisonOperator,
		property: &str,
		value: JsonValue,
	) -> Self {
		self.conditions.push(comparison(operator, property, value));
		self
	}

	pub fn condition_tree(mut self, condition: Condition) -> Self {
		self.conditions.push(condition);
		self
	}

	pub fn conditions(mut self, conditions: Vec<Condition>) -> Self {
		self.conditions = conditions;
		self
	}

	pub fn literal(mut self, value: JsonValue) -> Self {
		self.value = OverrideValue::Literal(value);
		self
	}

	pub fn config_reference(mut self, config_name: &str) -> Self {
		self.value = OverrideValue::ConfigReference {
			config_name: config_name.to_string(),
		};
		self
	}

	pub fn build(self) -> Override {
		Override {
			name: self.name,
			conditions: self.conditions,
			value: self.value,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_config() {
		let config = ConfigBuilder::new().build();

		assert_eq!(config.name, "test-config");
		assert_eq!(config.value, json!("base"));
		assert!(config.overrides.is_empty());
	}

	#[test]
	fn test_basic_builder_methods() {
		let config = ConfigBuilder::new()
			.name("checkout-theme")
			.value(json!({ "theme": "light" }))
			.add_override(
				OverrideBuilder::new("US users")
					.condition(ComparisonOperator::Equals, "country", json!("US"))
					.literal(json!({ "theme": "dark" }))
					.build(),
			)
			.build();

		assert_eq!(config.name, "checkout-theme");
		assert_eq!(config.value, json!({ "theme": "light" }));
		assert_eq!(config.overrides.len(), 1);
		assert_eq!(config.overrides[0].name, "US users");
		assert_eq!(config.overrides[0].conditions.len(), 1);
	}

	#[test]
	fn test_override_defaults() {
		let override_ = OverrideBuilder::new("catch-all").build();

		assert_eq!(override_.name, "catch-all");
		assert!(override_.conditions.is_empty());
		assert_eq!(override_.value, OverrideValue::Literal(json!(true)));
	}

	#[test]
	fn test_override_config_reference() {
		let override_ = OverrideBuilder::new("shared")
			.config_reference("shared-value")
			.build();

		assert_eq!(override_.value.referenced_config(), Some("shared-value"));
	}

	#[test]
	fn test_overrides_bulk_set() {
		let config = ConfigBuilder::new()
			.overrides(vec![
				OverrideBuilder::new("first").build(),
				OverrideBuilder::new("second").build(),
			])
			.build();

		assert_eq!(config.overrides.len(), 2);
		assert_eq!(config.overrides[0].name, "first");
		assert_eq!(config.overrides[1].name, "second");
	}
}
