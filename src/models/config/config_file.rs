//! Config definition loading and validation.
//!
//! This module implements the ConfigLoader trait for Config entries, allowing
//! configs to be loaded from JSON files and checked against the platform's
//! authoring limits before they reach rendering and evaluation.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::{
	collections::{HashMap, HashSet},
	fs,
	path::Path,
};

use crate::{
	models::{config::error::ConfigError, Condition, Config, ConfigLoader, OverrideValue},
	services::evaluator::casts_to_number,
	utils::{
		constants::{
			DEFAULT_CONFIG_DIR, DEFAULT_MAX_CONFIG_VALUE_SIZE, MAX_CONDITIONS_PER_OVERRIDE,
			MAX_CONDITION_DEPTH, MAX_CONFIG_VALUE_SIZE_ENV, MAX_NAME_LENGTH,
			MAX_OVERRIDES_PER_CONFIG,
		},
		normalize_string, parse_string_to_bytes_size,
	},
};

/// Serialized size ceiling for a single config value, in bytes.
///
/// Reads the `MAX_CONFIG_VALUE_SIZE` environment variable (human-readable
/// sizes like "1MB" or "512KiB") and falls back to the default ceiling.
fn max_value_bytes() -> u64 {
	std::env::var(MAX_CONFIG_VALUE_SIZE_ENV)
		.ok()
		.and_then(|raw| parse_string_to_bytes_size(&raw).ok())
		.or_else(|| parse_string_to_bytes_size(DEFAULT_MAX_CONFIG_VALUE_SIZE).ok())
		.unwrap_or(1_000_000)
}

/// Checks one value against the serialized size ceiling.
fn validate_value_size(
	value: &JsonValue,
	owner: &str,
	config_name: &str,
) -> Result<(), ConfigError> {
	let serialized = serde_json::to_string(value)?;
	let limit = max_value_bytes();
	if serialized.len() as u64 > limit {
		return Err(ConfigError::validation_error(
			format!("{} value exceeds the configured size ceiling", owner),
			None,
			Some(HashMap::from([
				("config_name".to_string(), config_name.to_string()),
				("size_bytes".to_string(), serialized.len().to_string()),
				("limit_bytes".to_string(), limit.to_string()),
			])),
		));
	}
	Ok(())
}

/// Checks a condition tree for shapes that could never match at runtime.
fn validate_condition(condition: &Condition, config_name: &str) -> Result<(), ConfigError> {
	match condition {
		Condition::Comparison(comparison) => {
			if comparison.property.is_empty() {
				return Err(ConfigError::validation_error(
					"comparison property is required",
					None,
					Some(HashMap::from([(
						"config_name".to_string(),
						config_name.to_string(),
					)])),
				));
			}
			if comparison.operator.is_membership() && !comparison.value.is_array() {
				return Err(ConfigError::validation_error(
					format!(
						"`{}` requires an array rule value",
						comparison.operator
					),
					None,
					Some(HashMap::from([
						("config_name".to_string(), config_name.to_string()),
						("property".to_string(), comparison.property.clone()),
					])),
				));
			}
			if comparison.operator.is_ordering() && !casts_to_number(&comparison.value) {
				return Err(ConfigError::validation_error(
					format!(
						"`{}` requires a numeric rule value",
						comparison.operator
					),
					None,
					Some(HashMap::from([
						("config_name".to_string(), config_name.to_string()),
						("property".to_string(), comparison.property.clone()),
					])),
				));
			}
			Ok(())
		}
		Condition::Not { condition } => validate_condition(condition, config_name),
		Condition::And { conditions } | Condition::Or { conditions } => {
			for child in conditions {
				validate_condition(child, config_name)?;
			}
			Ok(())
		}
	}
}

#[async_trait]
impl ConfigLoader for Config {
	/// Load all config definitions from a directory
	///
	/// Reads and parses all JSON files in the specified directory (or default
	/// config directory) as config definitions, keyed by config name.
	async fn load_all<T>(path: Option<&Path>) -> Result<T, ConfigError>
	where
		T: FromIterator<(String, Self)>,
	{
		let config_dir = path.unwrap_or(Path::new(DEFAULT_CONFIG_DIR));
		let mut pairs = Vec::new();

		if !config_dir.exists() {
			return Err(ConfigError::file_error(
				"configs directory not found",
				None,
				Some(HashMap::from([(
					"path".to_string(),
					config_dir.display().to_string(),
				)])),
			));
		}

		for entry in fs::read_dir(config_dir).map_err(|e| {
			ConfigError::file_error(
				format!("failed to read configs directory: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					config_dir.display().to_string(),
				)])),
			)
		})? {
			let entry = entry.map_err(|e| {
				ConfigError::file_error(
					format!("failed to read directory entry: {}", e),
					Some(Box::new(e)),
					Some(HashMap::from([(
						"path".to_string(),
						config_dir.display().to_string(),
					)])),
				)
			})?;
			let path = entry.path();

			if !Self::is_json_file(&path) {
				continue;
			}

			let config = Self::load_from_path(&path).await?;

			let existing_configs: Vec<&Config> = pairs.iter().map(|(_, config)| config).collect();
			// Check config name uniqueness before pushing
			Self::validate_uniqueness(&existing_configs, &config, &path.display().to_string())?;

			pairs.push((config.name.clone(), config));
		}

		Ok(T::from_iter(pairs))
	}

	/// Load a config definition from a specific file
	///
	/// Reads and parses a single JSON file as a config definition.
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let file = std::fs::File::open(path).map_err(|e| {
			ConfigError::file_error(
				format!("failed to open config file: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.display().to_string(),
				)])),
			)
		})?;
		let config: Config = serde_json::from_reader(file).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse config file: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.display().to_string(),
				)])),
			)
		})?;

		// Validate the config after loading
		config.validate().map_err(|e| {
			ConfigError::validation_error(
				format!("config validation failed: {}", e),
				Some(Box::new(e)),
				Some(HashMap::from([
					("path".to_string(), path.display().to_string()),
					("config_name".to_string(), config.name.clone()),
				])),
			)
		})?;

		Ok(config)
	}

	/// Validate the config definition against the platform's authoring limits
	fn validate(&self) -> Result<(), ConfigError> {
		// Validate config name
		if self.name.is_empty() {
			return Err(ConfigError::validation_error(
				"Config name is required",
				None,
				None,
			));
		}
		if self.name.chars().count() > MAX_NAME_LENGTH {
			return Err(ConfigError::validation_error(
				format!("Config name exceeds {} characters", MAX_NAME_LENGTH),
				None,
				Some(HashMap::from([(
					"config_name".to_string(),
					self.name.clone(),
				)])),
			));
		}

		// Validate base value size
		validate_value_size(&self.value, "config base", &self.name)?;

		// Validate override count
		if self.overrides.len() > MAX_OVERRIDES_PER_CONFIG {
			return Err(ConfigError::validation_error(
				format!(
					"Config has {} overrides, maximum is {}",
					self.overrides.len(),
					MAX_OVERRIDES_PER_CONFIG
				),
				None,
				Some(HashMap::from([(
					"config_name".to_string(),
					self.name.clone(),
				)])),
			));
		}

		let mut seen_names = HashSet::new();
		for override_ in &self.overrides {
			if override_.name.is_empty() {
				return Err(ConfigError::validation_error(
					"Override name is required",
					None,
					Some(HashMap::from([(
						"config_name".to_string(),
						self.name.clone(),
					)])),
				));
			}
			if override_.name.chars().count() > MAX_NAME_LENGTH {
				return Err(ConfigError::validation_error(
					format!("Override name exceeds {} characters", MAX_NAME_LENGTH),
					None,
					Some(HashMap::from([
						("config_name".to_string(), self.name.clone()),
						("override_name".to_string(), override_.name.clone()),
					])),
				));
			}
			if !seen_names.insert(normalize_string(&override_.name)) {
				return Err(ConfigError::validation_error(
					format!("Duplicate override name found: '{}'", override_.name),
					None,
					Some(HashMap::from([(
						"config_name".to_string(),
						self.name.clone(),
					)])),
				));
			}

			if override_.conditions.len() > MAX_CONDITIONS_PER_OVERRIDE {
				return Err(ConfigError::validation_error(
					format!(
						"Override '{}' has {} conditions, maximum is {}",
						override_.name,
						override_.conditions.len(),
						MAX_CONDITIONS_PER_OVERRIDE
					),
					None,
					Some(HashMap::from([(
						"config_name".to_string(),
						self.name.clone(),
					)])),
				));
			}

			for condition in &override_.conditions {
				if condition.depth() > MAX_CONDITION_DEPTH {
					return Err(ConfigError::validation_error(
						format!(
							"Override '{}' nests conditions deeper than {} levels",
							override_.name, MAX_CONDITION_DEPTH
						),
						None,
						Some(HashMap::from([(
							"config_name".to_string(),
							self.name.clone(),
						)])),
					));
				}
				validate_condition(condition, &self.name)?;
			}

			if let OverrideValue::Literal(value) = &override_.value {
				validate_value_size(value, "override", &self.name)?;
			}
		}

		Ok(())
	}

	fn validate_uniqueness(
		instances: &[&Self],
		current_instance: &Self,
		file_path: &str,
	) -> Result<(), ConfigError> {
		// Check config name uniqueness before pushing
		if instances.iter().any(|existing_config| {
			normalize_string(&existing_config.name) == normalize_string(&current_instance.name)
		}) {
			Err(ConfigError::validation_error(
				format!("Duplicate config name found: '{}'", current_instance.name),
				None,
				Some(HashMap::from([
					(
						"config_name".to_string(),
						current_instance.name.to_string(),
					),
					("path".to_string(), file_path.to_string()),
				])),
			))
		} else {
			Ok(())
		}
	}
}
