use std::fmt;

use serde::{
	de::{self, MapAccess, Visitor},
	ser::SerializeMap,
	Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::Value as JsonValue;

/// Comparison operators available to override authors.
///
/// Ordering operators are defined numerically: both operands must be numbers
/// after casting for the comparison to match.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
	/// Values are equal after casting
	Equals,
	/// Values are not equal after casting
	NotEquals,
	/// Context value is numerically less than the rule value
	LessThan,
	/// Context value is numerically less than or equal to the rule value
	LessThanOrEqual,
	/// Context value is numerically greater than the rule value
	GreaterThan,
	/// Context value is numerically greater than or equal to the rule value
	GreaterThanOrEqual,
	/// Context value is a member of the rule-side array
	In,
	/// Context value is not a member of the rule-side array
	NotIn,
	/// Context string or array contains the rule value
	Contains,
	/// Context string or array does not contain the rule value
	NotContains,
}

/// Operator names accepted in condition JSON, used in parse errors.
pub const OPERATOR_NAMES: &[&str] = &[
	"equals",
	"not_equals",
	"less_than",
	"less_than_or_equal",
	"greater_than",
	"greater_than_or_equal",
	"in",
	"not_in",
	"contains",
	"not_contains",
	"and",
	"or",
	"not",
];

impl ComparisonOperator {
	/// Returns the operator's wire name.
	pub fn as_str(&self) -> &'static str {
		match self {
			ComparisonOperator::Equals => "equals",
			ComparisonOperator::NotEquals => "not_equals",
			ComparisonOperator::LessThan => "less_than",
			ComparisonOperator::LessThanOrEqual => "less_than_or_equal",
			ComparisonOperator::GreaterThan => "greater_than",
			ComparisonOperator::GreaterThanOrEqual => "greater_than_or_equal",
			ComparisonOperator::In => "in",
			ComparisonOperator::NotIn => "not_in",
			ComparisonOperator::Contains => "contains",
			ComparisonOperator::NotContains => "not_contains",
		}
	}

	/// Parses an operator from its wire name, case-insensitively.
	pub fn from_name(name: &str) -> Option<Self> {
		match name.to_lowercase().as_str() {
			"equals" => Some(ComparisonOperator::Equals),
			"not_equals" => Some(ComparisonOperator::NotEquals),
			"less_than" => Some(ComparisonOperator::LessThan),
			"less_than_or_equal" => Some(ComparisonOperator::LessThanOrEqual),
			"greater_than" => Some(ComparisonOperator::GreaterThan),
			"greater_than_or_equal" => Some(ComparisonOperator::GreaterThanOrEqual),
			"in" => Some(ComparisonOperator::In),
			"not_in" => Some(ComparisonOperator::NotIn),
			"contains" => Some(ComparisonOperator::Contains),
			"not_contains" => Some(ComparisonOperator::NotContains),
			_ => None,
		}
	}

	/// Returns true for operators that impose a numeric ordering.
	pub fn is_ordering(&self) -> bool {
		matches!(
			self,
			ComparisonOperator::LessThan
				| ComparisonOperator::LessThanOrEqual
				| ComparisonOperator::GreaterThan
				| ComparisonOperator::GreaterThanOrEqual
		)
	}

	/// Returns true for operators whose rule-side operand must be an array.
	pub fn is_membership(&self) -> bool {
		matches!(self, ComparisonOperator::In | ComparisonOperator::NotIn)
	}
}

impl fmt::Display for ComparisonOperator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Leaf comparison between a context property and a rule-side literal.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ComparisonCondition {
	/// Comparison operator to apply
	pub operator: ComparisonOperator,

	/// Context property the comparison reads
	pub property: String,

	/// Rule-side literal operand
	pub value: JsonValue,
}

/// A node in a condition tree: a leaf comparison or a boolean combinator.
///
/// The `operator` field of the JSON encoding is the discriminant: `and`, `or`
/// and `not` select the composite variants, any comparison operator selects a
/// leaf. Conditions nest arbitrarily and always form a tree, each node owning
/// its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
	/// Matches iff every child matches
	And {
		/// Child conditions, evaluated in order
		conditions: Vec<Condition>,
	},
	/// Matches iff at least one child matches
	Or {
		/// Child conditions, evaluated in order
		conditions: Vec<Condition>,
	},
	/// Matches iff the child does not match
	Not {
		/// Negated child condition
		condition: Box<Condition>,
	},
	/// Leaf comparison against the context
	Comparison(ComparisonCondition),
}

impl Condition {
	/// Depth of the tree rooted at this node. A leaf has depth 1.
	pub fn depth(&self) -> usize {
		match self {
			Condition::Comparison(_) => 1,
			Condition::Not { condition } => 1 + condition.depth(),
			Condition::And { conditions } | Condition::Or { conditions } => {
				1 + conditions.iter().map(Condition::depth).max().unwrap_or(0)
			}
		}
	}

	/// Total number of nodes in the tree rooted at this node.
	pub fn node_count(&self) -> usize {
		match self {
			Condition::Comparison(_) => 1,
			Condition::Not { condition } => 1 + condition.node_count(),
			Condition::And { conditions } | Condition::Or { conditions } => {
				1 + conditions.iter().map(Condition::node_count).sum::<usize>()
			}
		}
	}
}

impl Serialize for Condition {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		match self {
			Condition::And { conditions } => {
				let mut map = serializer.serialize_map(Some(2))?;
				map.serialize_entry("operator", "and")?;
				map.serialize_entry("conditions", conditions)?;
				map.end()
			}
			Condition::Or { conditions } => {
				let mut map = serializer.serialize_map(Some(2))?;
				map.serialize_entry("operator", "or")?;
				map.serialize_entry("conditions", conditions)?;
				map.end()
			}
			Condition::Not { condition } => {
				let mut map = serializer.serialize_map(Some(2))?;
				map.serialize_entry("operator", "not")?;
				map.serialize_entry("condition", condition)?;
				map.end()
			}
			Condition::Comparison(comparison) => comparison.serialize(serializer),
		}
	}
}

const CONDITION_FIELDS: &[&str] = &["operator", "property", "value", "conditions", "condition"];

impl<'de> Deserialize<'de> for Condition {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		struct ConditionVisitor;

		impl<'de> Visitor<'de> for ConditionVisitor {
			type Value = Condition;

			fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
				formatter.write_str("a condition object with an `operator` field")
			}

			fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
			where
				M: MapAccess<'de>,
			{
				let mut operator: Option<String> = None;
				let mut property: Option<String> = None;
				let mut value: Option<JsonValue> = None;
				let mut conditions: Option<Vec<Condition>> = None;
				let mut condition: Option<Condition> = None;

				while let Some(key) = map.next_key::<String>()? {
					match key.as_str() {
						"operator" => operator = Some(map.next_value()?),
						"property" => property = Some(map.next_value()?),
						"value" => value = Some(map.next_value()?),
						"conditions" => conditions = Some(map.next_value()?),
						"condition" => condition = Some(map.next_value()?),
						other => return Err(de::Error::unknown_field(other, CONDITION_FIELDS)),
					}
				}

				let operator = operator.ok_or_else(|| de::Error::missing_field("operator"))?;
				let operator_lowercase = operator.to_lowercase();

				match operator_lowercase.as_str() {
					"and" | "or" => {
						let conditions =
							conditions.ok_or_else(|| de::Error::missing_field("conditions"))?;
						if property.is_some() || value.is_some() || condition.is_some() {
							return Err(de::Error::custom(format!(
								"`{}` takes only a `conditions` list",
								operator_lowercase
							)));
						}
						if operator_lowercase == "and" {
							Ok(Condition::And { conditions })
						} else {
							Ok(Condition::Or { conditions })
						}
					}
					"not" => {
						let condition =
							condition.ok_or_else(|| de::Error::missing_field("condition"))?;
						if property.is_some() || value.is_some() || conditions.is_some() {
							return Err(de::Error::custom(
								"`not` takes only a single `condition`",
							));
						}
						Ok(Condition::Not {
							condition: Box::new(condition),
						})
					}
					name => {
						let operator = ComparisonOperator::from_name(name).ok_or_else(|| {
							de::Error::unknown_variant(name, OPERATOR_NAMES)
						})?;
						let property =
							property.ok_or_else(|| de::Error::missing_field("property"))?;
						let value = value.ok_or_else(|| de::Error::missing_field("value"))?;
						if conditions.is_some() || condition.is_some() {
							return Err(de::Error::custom(format!(
								"`{}` takes `property` and `value`, not nested conditions",
								name
							)));
						}
						Ok(Condition::Comparison(ComparisonCondition {
							operator,
							property,
							value,
						}))
					}
				}
			}
		}

		deserializer.deserialize_map(ConditionVisitor)
	}
}
