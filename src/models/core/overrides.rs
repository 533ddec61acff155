use serde::{
	de, ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::Value as JsonValue;

use crate::models::core::condition::Condition;

/// A named conditional rule that replaces a config's base value when all of
/// its conditions match the context.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Override {
	/// Name identifying this override within its config
	pub name: String,

	/// Conditions that must all match for the override to apply (implicit AND)
	pub conditions: Vec<Condition>,

	/// Value the config takes when this override matches
	pub value: OverrideValue,
}

impl Override {
	/// Builds the rendered form of this override with the given literal value.
	pub fn rendered(&self, value: JsonValue) -> RenderedOverride {
		RenderedOverride {
			name: self.name.clone(),
			conditions: self.conditions.clone(),
			value,
		}
	}
}

/// An override's value: a literal, or a lazy reference to another config.
///
/// The JSON encoding accepts two shapes. An object carrying a `type` field of
/// `literal` or `config_reference` is the tagged form; those two tag values
/// are reserved and must carry `value` respectively `config_name`. Any other
/// JSON value, objects included, is taken as a raw literal.
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideValue {
	/// A concrete value, used as-is
	Literal(JsonValue),
	/// A reference to another config's effective value, resolved at render time
	ConfigReference {
		/// Name of the referenced config
		config_name: String,
	},
}

impl OverrideValue {
	/// Returns the referenced config name, if this value is a reference.
	pub fn referenced_config(&self) -> Option<&str> {
		match self {
			OverrideValue::ConfigReference { config_name } => Some(config_name),
			OverrideValue::Literal(_) => None,
		}
	}
}

impl Serialize for OverrideValue {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		// Always writes the tagged form so literals containing a `type` key
		// survive a round trip.
		match self {
			OverrideValue::Literal(value) => {
				let mut map = serializer.serialize_map(Some(2))?;
				map.serialize_entry("type", "literal")?;
				map.serialize_entry("value", value)?;
				map.end()
			}
			OverrideValue::ConfigReference { config_name } => {
				let mut map = serializer.serialize_map(Some(2))?;
				map.serialize_entry("type", "config_reference")?;
				map.serialize_entry("config_name", config_name)?;
				map.end()
			}
		}
	}
}

impl<'de> Deserialize<'de> for OverrideValue {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let fields = match JsonValue::deserialize(deserializer)? {
			JsonValue::Object(fields) => fields,
			other => return Ok(OverrideValue::Literal(other)),
		};

		let tag = fields
			.get("type")
			.and_then(JsonValue::as_str)
			.map(str::to_lowercase);

		match tag.as_deref() {
			Some("literal") => {
				if fields.len() != 2 {
					return Err(de::Error::custom(
						"literal override value takes exactly `type` and `value`",
					));
				}
				let value = fields
					.get("value")
					.cloned()
					.ok_or_else(|| de::Error::missing_field("value"))?;
				Ok(OverrideValue::Literal(value))
			}
			Some("config_reference") => {
				if fields.len() != 2 {
					return Err(de::Error::custom(
						"config reference takes exactly `type` and `config_name`",
					));
				}
				let config_name = fields
					.get("config_name")
					.and_then(JsonValue::as_str)
					.ok_or_else(|| de::Error::missing_field("config_name"))?;
				Ok(OverrideValue::ConfigReference {
					config_name: config_name.to_string(),
				})
			}
			_ => Ok(OverrideValue::Literal(JsonValue::Object(fields))),
		}
	}
}

/// An override whose value has been fully resolved to a literal, ready for
/// condition evaluation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RenderedOverride {
	/// Name identifying this override within its config
	pub name: String,

	/// Conditions that must all match for the override to apply (implicit AND)
	pub conditions: Vec<Condition>,

	/// Concrete value the config takes when this override matches
	pub value: JsonValue,
}
