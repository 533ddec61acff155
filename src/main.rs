//! Override evaluation service entry point.
//!
//! This binary provides the main entry point for evaluating config
//! definitions against hand-written contexts. It loads config definitions
//! from a directory, resolves config references between overrides, and
//! reports which override supplied the effective value for a context.
//!
//! # Architecture
//! The service is built around several key components:
//! - Configs: Named values with a priority-ordered list of overrides
//! - Overrides: Conditions plus the value that applies when they match
//! - Services: Core functionality including rendering and evaluation
//!
//! # Flow
//! 1. Loads config definitions from the default directory (or --config-path)
//! 2. Validates names, limits, and config references between overrides
//! 3. Evaluates the requested config against the supplied context
//! 4. Prints the effective value, optionally with the full evaluation trace

pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;

use crate::{
	models::EvaluationContext,
	repositories::{ConfigRepository, ConfigService},
	utils::{
		logging::setup_logging,
		parse_string_to_bytes_size,
		preview::{
			execution::{execute_preview, PreviewExecutionConfig},
			PreviewError,
		},
	},
};

use clap::Parser;
use dotenvy::dotenv_override;
use std::collections::HashMap;
use std::env::{set_var, var};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Configuration for running a preview from the command line
/// Fields:
/// * `path` - Optional path to a config definition file to evaluate
/// * `config_name` - Optional name of a loaded config to evaluate
/// * `context` - The evaluation context to evaluate against
/// * `environment_id` - Optional environment to resolve config references within
/// * `trace` - Whether to print the full evaluation trace
/// * `config_service` - Service handling config operations
struct PreviewRunConfig {
	pub path: Option<String>,
	pub config_name: Option<String>,
	pub context: EvaluationContext,
	pub environment_id: Option<String>,
	pub trace: bool,
	pub config_service: Arc<Mutex<ConfigService<ConfigRepository>>>,
}

#[derive(Parser)]
#[command(
	name = "override-evaluator",
	about = "A config evaluation service that resolves the effective value of a config for a given context by evaluating its overrides in priority order.",
	version
)]
struct Cli {
	/// Write logs to file instead of stdout
	#[arg(long)]
	log_file: bool,

	/// Set log level (trace, debug, info, warn, error)
	#[arg(long, value_name = "LEVEL")]
	log_level: Option<String>,

	/// Path to store log files (default: logs/)
	#[arg(long, value_name = "PATH")]
	log_path: Option<String>,

	/// Maximum log file size before rolling (e.g., "1GB", "500MB", "1024KB")
	#[arg(long, value_name = "SIZE", value_parser = parse_string_to_bytes_size)]
	log_max_size: Option<u64>,

	/// Path to config definitions: a directory to load, or a single file to preview
	#[arg(long, value_name = "CONFIG_PATH")]
	config_path: Option<String>,

	/// Name of the config to evaluate
	#[arg(long, value_name = "CONFIG_NAME")]
	config: Option<String>,

	/// Evaluation context as an inline JSON object
	#[arg(long, value_name = "JSON")]
	context: Option<String>,

	/// Path to a JSON file holding the evaluation context
	#[arg(long, value_name = "CONTEXT_FILE")]
	context_file: Option<String>,

	/// Environment to resolve config references within
	#[arg(long, value_name = "ENVIRONMENT_ID")]
	environment: Option<String>,

	/// Print the full evaluation trace instead of only the final value
	#[arg(long)]
	trace: bool,

	/// Validate configuration files without evaluating
	#[arg(long)]
	check: bool,
}

impl Cli {
	/// Apply CLI options to environment variables, overriding any existing values
	fn apply_to_env(&self) {
		// Reload environment variables from .env file
		// Override any existing environment variables
		dotenv_override().ok();

		// Log file mode - override if CLI flag is set
		if self.log_file {
			set_var("LOG_MODE", "file");
		}

		// Set log level from RUST_LOG if it exists
		if let Ok(level) = var("RUST_LOG") {
			set_var("LOG_LEVEL", level);
		}

		// Log level - override if CLI flag is set
		if let Some(level) = &self.log_level {
			set_var("LOG_LEVEL", level);
			set_var("RUST_LOG", level);
		}

		// Log path - override if CLI flag is set
		if let Some(path) = &self.log_path {
			set_var("LOG_DATA_DIR", path);
		}

		// Log max size - override if CLI flag is set
		if let Some(max_size) = &self.log_max_size {
			set_var("LOG_MAX_SIZE", max_size.to_string());
		}
	}
}

/// Builds the evaluation context from the CLI arguments.
///
/// The context is either inline JSON or a file, never both; omitting both
/// evaluates against an empty context.
fn load_context(inline: Option<&str>, file: Option<&str>) -> Result<EvaluationContext> {
	let raw = match (inline, file) {
		(Some(_), Some(_)) => {
			return Err(anyhow::anyhow!(
				"--context and --context-file are mutually exclusive"
			)
			.into());
		}
		(Some(inline), None) => inline.to_string(),
		(None, Some(file)) => fs::read_to_string(file)
			.map_err(|e| anyhow::anyhow!("Failed to read context file '{}': {}", file, e))?,
		(None, None) => return Ok(EvaluationContext::new()),
	};

	let context = serde_json::from_str(&raw)
		.map_err(|e| anyhow::anyhow!("Failed to parse context as a JSON object: {}", e))?;
	Ok(context)
}

/// Main entry point for the override evaluation service.
///
/// # Errors
/// Returns an error if config loading fails or if the preview cannot be
/// executed with the provided arguments.
#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	// Apply CLI options to environment
	cli.apply_to_env();

	// Setup logging to stdout
	setup_logging().unwrap_or_else(|e| {
		error!("Failed to setup logging: {}", e);
	});

	// A file path previews that single definition; a directory path becomes
	// the load root for the whole config set.
	let (config_dir, preview_file) = match cli.config_path.as_deref() {
		Some(path) if Path::new(path).is_file() => (None, Some(path.to_string())),
		Some(path) => (Some(path.to_string()), None),
		None => (None, None),
	};

	// If --check flag is provided, only validate configuration and exit
	if cli.check {
		validate_configuration(config_dir.as_deref()).await;
		return Ok(());
	}

	let config_service =
		match ConfigService::<ConfigRepository>::new_with_path(config_dir.as_deref().map(Path::new))
			.await
		{
			Ok(service) => service,
			Err(e) if preview_file.is_some() => {
				// A single-file preview can proceed without a loaded set;
				// config references then resolve to nothing.
				tracing::warn!("Proceeding without loaded configs: {}", e);
				ConfigService::new_with_repository(ConfigRepository::default())?
			}
			Err(e) => {
				return Err(anyhow::anyhow!("Failed to load configs: {}", e).into());
			}
		};

	if preview_file.is_none() && cli.config.is_none() {
		return Err(anyhow::anyhow!(
			"Nothing to evaluate: provide --config <name>, or --config-path pointing at a config \
			 definition file"
		)
		.into());
	}

	let context = load_context(cli.context.as_deref(), cli.context_file.as_deref())?;

	run_preview(PreviewRunConfig {
		path: preview_file,
		config_name: cli.config.clone(),
		context,
		environment_id: cli.environment.clone(),
		trace: cli.trace,
		config_service: Arc::new(Mutex::new(config_service)),
	})
	.await
}

/// Evaluates a config definition against the supplied context and prints
/// the outcome.
///
/// This is primarily used for testing and debugging config definitions
/// before deploying them.
///
/// # Arguments
/// * `config` - Configuration for the preview run
///
/// # Returns
/// * `Result<()>` - Ok(()) if evaluation succeeds, or an error if it fails
#[instrument(skip_all)]
async fn run_preview(config: PreviewRunConfig) -> Result<()> {
	info!(
		message = "Starting config evaluation",
		path = config.path,
		config = config.config_name,
		environment = config.environment_id,
	);

	let result = execute_preview(PreviewExecutionConfig {
		path: config.path.clone(),
		config_name: config.config_name.clone(),
		context: config.context.clone(),
		environment_id: config.environment_id.clone(),
		config_service: config.config_service.clone(),
	})
	.await;

	match result {
		Ok(result) => {
			info!("Config evaluation completed successfully");
			info!("=========== Evaluation Result ===========");

			match serde_json::from_str::<serde_json::Value>(&result) {
				Ok(json) => {
					if config.trace {
						match serde_json::to_string_pretty(&json) {
							Ok(pretty) => info!("{}", pretty),
							Err(_) => info!(result = %result, "Raw evaluation result"),
						}
					} else {
						info!(
							"Final value: {}",
							json.get("finalValue").unwrap_or(&serde_json::Value::Null)
						);
						match json.get("matchedOverride") {
							Some(serde_json::Value::Null) | None => {
								info!("Matched override: none (base value applies)");
							}
							Some(matched) => {
								info!(
									"Matched override: {}",
									matched.get("name").unwrap_or(&serde_json::Value::Null)
								);
							}
						}
					}
				}
				Err(e) => {
					tracing::warn!(
						error = %e,
						"Failed to parse JSON output, falling back to raw output"
					);
					info!(result = %result, "Raw evaluation result");
				}
			}

			info!("=========================================");
			Ok(())
		}
		Err(e) => {
			// Convert to domain-specific error with proper context
			Err(PreviewError::execution_error(
				"Config evaluation failed",
				Some(e.into()),
				Some(HashMap::from([
					("path".to_string(), config.path.unwrap_or_default()),
					(
						"config".to_string(),
						config.config_name.unwrap_or_default(),
					),
					(
						"environment".to_string(),
						config.environment_id.unwrap_or_default(),
					),
				])),
			)
			.into())
		}
	}
}

/// Validates configuration files and their structure
async fn validate_configuration(config_dir: Option<&str>) {
	info!("Validating configuration files...");

	match ConfigService::<ConfigRepository>::new_with_path(config_dir.map(Path::new)).await {
		Ok(service) => {
			let configs = service.get_all();
			if configs.is_empty() {
				error!("No config definitions found. Add JSON definitions to the config directory before starting the service.");
				return;
			}
			info!("✓ Found {} config definition(s)", configs.len());

			let override_count: usize = configs
				.values()
				.map(|config| config.overrides.len())
				.sum();
			info!("✓ Found {} override(s) across all configs", override_count);

			info!("Configuration validation completed successfully!");
		}
		Err(e) => {
			error!("{}", e);
		}
	}
}
