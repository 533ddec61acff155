//! Preview execution module
//!
//! This module provides functionality to evaluate a config definition against
//! an ad-hoc context, either for a config already held by the service or for
//! a definition loaded from a file on demand.
use crate::{
	models::EvaluationContext,
	repositories::{ConfigRepositoryTrait, ConfigService},
	services::evaluator::evaluate_config,
	utils::preview::PreviewError,
};
use std::{path::Path, sync::Arc};
use tokio::sync::Mutex;
use tracing::instrument;

/// Configuration for executing a preview
///
/// # Arguments
///
/// * `path` - Optional path to a config definition file to evaluate
/// * `config_name` - Optional name of an already-loaded config to evaluate
/// * `context` - The evaluation context to evaluate against
/// * `environment_id` - Optional environment to resolve config references within
/// * `config_service` - The config service to use
pub struct PreviewExecutionConfig<C: ConfigRepositoryTrait + Send + Sync + 'static> {
	pub path: Option<String>,
	pub config_name: Option<String>,
	pub context: EvaluationContext,
	pub environment_id: Option<String>,
	pub config_service: Arc<Mutex<ConfigService<C>>>,
}

pub type PreviewResult<T> = std::result::Result<T, PreviewError>;

/// Evaluates a config against a specific context.
///
/// This function allows testing config definitions by running them against a
/// hand-written context before deployment. The config is either loaded from a
/// file (validated against the service's current contents) or picked from the
/// already-loaded set by name; config references are resolved through the
/// service either way.
///
/// # Arguments
///
/// * `config` - The preview execution configuration
///
/// # Returns
/// * `PreviewResult<String>` - JSON string containing the evaluation result
///   (final value, matched override, and the full trace) or an error
#[instrument(skip_all)]
pub async fn execute_preview<C: ConfigRepositoryTrait + Send + Sync + 'static>(
	config: PreviewExecutionConfig<C>,
) -> PreviewResult<String> {
	let service = config.config_service.lock().await;

	let target = match (&config.path, &config.config_name) {
		(Some(path), _) => {
			tracing::debug!(path = %path, "Loading config definition from file");
			service
				.load_from_path(Some(Path::new(path)))
				.await
				.map_err(|e| PreviewError::execution_error(e.to_string(), None, None))?
		}
		(None, Some(config_name)) => {
			tracing::debug!(config = %config_name, "Looking up loaded config definition");
			service.get(config_name).ok_or_else(|| {
				PreviewError::not_found(format!("Config '{}' not found", config_name), None, None)
			})?
		}
		(None, None) => {
			return Err(PreviewError::execution_error(
				"Either a config path or a config name must be provided",
				None,
				None,
			));
		}
	};

	tracing::debug!(config = %target.name, "Config loaded successfully");

	let result = evaluate_config(
		&target,
		&config.context,
		&*service,
		config.environment_id.as_deref(),
	)
	.await
	.map_err(|e| PreviewError::execution_error(e.to_string(), None, None))?;

	tracing::debug!(
		matched = result.matched_override.is_some(),
		overrides_evaluated = result.override_evaluations.len(),
		"Serializing result"
	);
	let json_result = serde_json::to_string(&result).map_err(|e| {
		PreviewError::execution_error(
			format!("Failed to serialize evaluation result: {}", e),
			None,
			None,
		)
	})?;

	tracing::debug!("Preview execution completed successfully");
	Ok(json_result)
}
