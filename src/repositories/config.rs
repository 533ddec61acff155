//! Config definition repository implementation.
//!
//! This module provides storage and retrieval of config definitions, including
//! validation of config references between overrides. The repository loads
//! config definitions from JSON files and ensures every referenced config
//! exists and no override points back at its own config.

#![allow(clippy::result_large_err)]

use std::{collections::HashMap, path::Path};

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::{
	models::{Config, ConfigLoader},
	repositories::error::RepositoryError,
	services::evaluator::ConfigResolver,
};

/// Repository for storing and retrieving config definitions
#[derive(Debug, Clone, Default)]
pub struct ConfigRepository {
	/// Map of config names to their definitions
	pub configs: HashMap<String, Config>,
}

impl ConfigRepository {
	/// Create a new config repository from the given path
	///
	/// Loads all config definitions from JSON files in the specified directory
	/// (or default config directory if None is provided).
	pub async fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
		let configs = Self::load_all(path).await?;
		Ok(ConfigRepository { configs })
	}

	/// Create a new config repository from a map of configs
	pub fn new_with_configs(configs: HashMap<String, Config>) -> Self {
		ConfigRepository { configs }
	}

	/// Returns an error if any override references a non-existent config or
	/// the config it belongs to.
	pub fn validate_config_references(
		configs: &HashMap<String, Config>,
	) -> Result<(), RepositoryError> {
		let mut validation_errors = Vec::new();
		let mut metadata = HashMap::new();

		for (config_name, config) in configs {
			for override_ in &config.overrides {
				let Some(referenced) = override_.value.referenced_config() else {
					continue;
				};

				if referenced == config_name {
					validation_errors.push(format!(
						"Config '{}' override '{}' references its own config",
						config_name, override_.name
					));
					metadata.insert(
						format!("config_{}_self_reference", config_name),
						override_.name.clone(),
					);
				} else if !configs.contains_key(referenced) {
					validation_errors.push(format!(
						"Config '{}' override '{}' references non-existent config '{}'",
						config_name, override_.name, referenced
					));
					metadata.insert(
						format!("config_{}_invalid_reference", config_name),
						referenced.to_string(),
					);
				}
			}
		}

		if !validation_errors.is_empty() {
			return Err(RepositoryError::validation_error(
				format!(
					"Configuration validation failed:\n{}",
					validation_errors.join("\n"),
				),
				None,
				Some(metadata),
			));
		}

		Ok(())
	}
}

/// Interface for config repository implementations
///
/// This trait defines the standard operations that any config repository must
/// support, allowing for different storage backends while maintaining a
/// consistent interface.
#[async_trait]
pub trait ConfigRepositoryTrait: Clone + Send {
	/// Create a new repository instance
	async fn new(path: Option<&Path>) -> Result<Self, RepositoryError>
	where
		Self: Sized;

	/// Load all config definitions from the given path
	///
	/// If no path is provided, uses the default config directory.
	/// Also validates config references between overrides.
	/// This is a static method that doesn't require an instance.
	async fn load_all(path: Option<&Path>) -> Result<HashMap<String, Config>, RepositoryError>;

	/// Load a config definition from a specific path
	///
	/// Validates the loaded config's references against the configs already
	/// held by this repository.
	async fn load_from_path(&self, path: Option<&Path>) -> Result<Config, RepositoryError>;

	/// Get a specific config by name
	///
	/// Returns None if the config doesn't exist.
	fn get(&self, config_name: &str) -> Option<Config>;

	/// Get all configs
	///
	/// Returns a copy of the config map to prevent external mutation.
	fn get_all(&self) -> HashMap<String, Config>;
}

#[async_trait]
impl ConfigRepositoryTrait for ConfigRepository {
	async fn new(path: Option<&Path>) -> Result<Self, RepositoryError> {
		ConfigRepository::new(path).await
	}

	async fn load_all(path: Option<&Path>) -> Result<HashMap<String, Config>, RepositoryError> {
		let configs = Config::load_all(path).await.map_err(|e| {
			RepositoryError::load_error(
				"Failed to load configs",
				Some(Box::new(e)),
				Some(HashMap::from([(
					"path".to_string(),
					path.map_or_else(|| "default".to_string(), |p| p.display().to_string()),
				)])),
			)
		})?;

		Self::validate_config_references(&configs)?;
		Ok(configs)
	}

	async fn load_from_path(&self, path: Option<&Path>) -> Result<Config, RepositoryError> {
		match path {
			Some(path) => {
				let config = Config::load_from_path(path).await.map_err(|e| {
					RepositoryError::load_error(
						"Failed to load configs",
						Some(Box::new(e)),
						Some(HashMap::from([(
							"path".to_string(),
							path.display().to_string(),
						)])),
					)
				})?;

				// References resolve against the repository's current
				// contents plus the config under load.
				let mut configs = self.configs.clone();
				configs.insert(config.name.clone(), config.clone());
				Self::validate_config_references(&configs)?;
				Ok(config)
			}
			None => Err(RepositoryError::load_error(
				"Failed to load configs",
				None,
				None,
			)),
		}
	}

	fn get(&self, config_name: &str) -> Option<Config> {
		self.configs.get(config_name).cloned()
	}

	fn get_all(&self) -> HashMap<String, Config> {
		self.configs.clone()
	}
}

/// Service layer for config repository operations
///
/// This type provides a higher-level interface for working with config
/// definitions, handling repository initialization and access through a
/// trait-based interface. It also acts as the resolver that override
/// rendering uses to look up referenced configs.
#[derive(Clone)]
pub struct ConfigService<T: ConfigRepositoryTrait> {
	repository: T,
}

impl<T: ConfigRepositoryTrait> ConfigService<T> {
	/// Create a new config service with the default repository implementation
	pub async fn new(
		path: Option<&Path>,
	) -> Result<ConfigService<ConfigRepository>, RepositoryError> {
		let repository = ConfigRepository::new(path).await?;
		Ok(ConfigService { repository })
	}

	/// Create a new config service with a custom repository implementation
	pub fn new_with_repository(repository: T) -> Result<Self, RepositoryError> {
		Ok(ConfigService { repository })
	}

	/// Create a new config service with a specific configuration path
	pub async fn new_with_path(
		path: Option<&Path>,
	) -> Result<ConfigService<ConfigRepository>, RepositoryError> {
		let repository = ConfigRepository::new(path).await?;
		Ok(ConfigService { repository })
	}

	/// Get a specific config by name
	pub fn get(&self, config_name: &str) -> Option<Config> {
		self.repository.get(config_name)
	}

	/// Get all configs
	pub fn get_all(&self) -> HashMap<String, Config> {
		self.repository.get_all()
	}

	/// Load a config definition from a specific path
	pub async fn load_from_path(&self, path: Option<&Path>) -> Result<Config, RepositoryError> {
		self.repository.load_from_path(path).await
	}
}

#[async_trait]
impl<T: ConfigRepositoryTrait + Send + Sync> ConfigResolver for ConfigService<T> {
	/// Resolves a referenced config to its base value.
	///
	/// The repository holds one value per config name, so the environment
	/// id is accepted for resolver-contract compatibility and ignored.
	async fn resolve(&self, config_name: &str, _environment_id: Option<&str>) -> Option<JsonValue> {
		self.get(config_name).map(|config| config.value)
	}
}
