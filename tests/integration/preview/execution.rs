//! Integration tests for preview execution.
//!
//! Drives `execute_preview` the way the CLI does: against a service loaded
//! from disk, against a single definition file, and against a mocked
//! repository.

use crate::integration::mocks::MockConfigRepository;
use override_evaluator::{
	models::EvaluationContext,
	repositories::{ConfigRepository, ConfigService},
	utils::{
		preview::execution::{execute_preview, PreviewExecutionConfig},
		tests::builders::{ConfigBuilder, OverrideBuilder},
	},
};
use serde_json::json;
use std::{fs, path::Path, sync::Arc};
use tempfile::TempDir;
use tokio::sync::Mutex;

// Helper to create a valid config JSON file
fn create_test_config_file(path: &Path, name: &str, definition: serde_json::Value) -> std::path::PathBuf {
	let config_path = path.join(format!("{}.json", name));
	fs::write(&config_path, definition.to_string()).unwrap();
	config_path
}

fn page_size_definition() -> serde_json::Value {
	json!({
		"name": "page-size",
		"value": 25,
		"overrides": [
			{
				"name": "Mobile users",
				"conditions": [
					{ "operator": "equals", "property": "platform", "value": "mobile" }
				],
				"value": 10
			}
		]
	})
}

async fn seeded_service(temp_dir: &TempDir) -> Arc<Mutex<ConfigService<ConfigRepository>>> {
	create_test_config_file(temp_dir.path(), "page-size", page_size_definition());
	let service = ConfigService::<ConfigRepository>::new_with_path(Some(temp_dir.path()))
		.await
		.unwrap();
	Arc::new(Mutex::new(service))
}

fn context_with(entries: Vec<(&str, serde_json::Value)>) -> EvaluationContext {
	let mut context = EvaluationContext::new();
	for (property, value) in entries {
		context.insert(property, value);
	}
	context
}

#[tokio::test]
async fn test_execute_preview_by_name() {
	let temp_dir = TempDir::new().unwrap();
	let config_service = seeded_service(&temp_dir).await;

	let result = execute_preview(PreviewExecutionConfig {
		path: None,
		config_name: Some("page-size".to_string()),
		context: context_with(vec![("platform", json!("mobile"))]),
		environment_id: None,
		config_service,
	})
	.await;

	assert!(result.is_ok(), "Preview failed: {:?}", result.err());
	let evaluation: serde_json::Value = serde_json::from_str(&result.unwrap()).unwrap();
	assert_eq!(evaluation["finalValue"], json!(10));
	assert_eq!(evaluation["matchedOverride"]["name"], json!("Mobile users"));
}

#[tokio::test]
async fn test_execute_preview_by_name_base_value() {
	let temp_dir = TempDir::new().unwrap();
	let config_service = seeded_service(&temp_dir).await;

	let result = execute_preview(PreviewExecutionConfig {
		path: None,
		config_name: Some("page-size".to_string()),
		context: context_with(vec![("platform", json!("desktop"))]),
		environment_id: None,
		config_service,
	})
	.await;

	let evaluation: serde_json::Value = serde_json::from_str(&result.unwrap()).unwrap();
	assert_eq!(evaluation["finalValue"], json!(25));
	assert_eq!(evaluation["matchedOverride"], serde_json::Value::Null);
	assert_eq!(evaluation["overrideEvaluations"][0]["result"], json!("not_matched"));
}

#[tokio::test]
async fn test_execute_preview_by_path_resolves_loaded_references() {
	let temp_dir = TempDir::new().unwrap();
	create_test_config_file(
		temp_dir.path(),
		"page-size",
		json!({ "name": "page-size", "value": 50, "overrides": [] }),
	);
	let service = ConfigService::<ConfigRepository>::new_with_path(Some(temp_dir.path()))
		.await
		.unwrap();

	// Previewing a draft definition that references a deployed config
	let draft_dir = TempDir::new().unwrap();
	let draft_path = create_test_config_file(
		draft_dir.path(),
		"power-page-size",
		json!({
			"name": "power-page-size",
			"value": 25,
			"overrides": [
				{
					"name": "Power users",
					"conditions": [
						{ "operator": "equals", "property": "tier", "value": "power" }
					],
					"value": { "type": "config_reference", "config_name": "page-size" }
				}
			]
		}),
	);

	let result = execute_preview(PreviewExecutionConfig {
		path: Some(draft_path.display().to_string()),
		config_name: None,
		context: context_with(vec![("tier", json!("power"))]),
		environment_id: Some("production".to_string()),
		config_service: Arc::new(Mutex::new(service)),
	})
	.await;

	assert!(result.is_ok(), "Preview failed: {:?}", result.err());
	let evaluation: serde_json::Value = serde_json::from_str(&result.unwrap()).unwrap();
	assert_eq!(evaluation["finalValue"], json!(50));
}

#[tokio::test]
async fn test_execute_preview_trace_is_complete() {
	let temp_dir = TempDir::new().unwrap();
	let config_service = seeded_service(&temp_dir).await;

	let result = execute_preview(PreviewExecutionConfig {
		path: None,
		config_name: Some("page-size".to_string()),
		context: EvaluationContext::new(),
		environment_id: None,
		config_service,
	})
	.await
	.unwrap();

	let evaluation: serde_json::Value = serde_json::from_str(&result).unwrap();
	let evaluations = evaluation["overrideEvaluations"].as_array().unwrap();
	assert_eq!(evaluations.len(), 1);
	let reason = evaluations[0]["conditionEvaluations"][0]["reason"]
		.as_str()
		.unwrap();
	assert!(reason.contains("property not present in context"));
}

#[tokio::test]
async fn test_execute_preview_unknown_config() {
	let temp_dir = TempDir::new().unwrap();
	let config_service = seeded_service(&temp_dir).await;

	let result = execute_preview(PreviewExecutionConfig {
		path: None,
		config_name: Some("missing-config".to_string()),
		context: EvaluationContext::new(),
		environment_id: None,
		config_service,
	})
	.await;

	assert!(result.is_err());
	assert!(result.unwrap_err().to_string().contains("not found"));
}

#[tokio::test]
async fn test_execute_preview_without_target() {
	let temp_dir = TempDir::new().unwrap();
	let config_service = seeded_service(&temp_dir).await;

	let result = execute_preview(PreviewExecutionConfig {
		path: None,
		config_name: None,
		context: EvaluationContext::new(),
		environment_id: None,
		config_service,
	})
	.await;

	assert!(result.is_err());
}

#[tokio::test]
async fn test_execute_preview_invalid_path() {
	let temp_dir = TempDir::new().unwrap();
	let config_service = seeded_service(&temp_dir).await;

	let result = execute_preview(PreviewExecutionConfig {
		path: Some("nonexistent_config.json".to_string()),
		config_name: None,
		context: EvaluationContext::new(),
		environment_id: None,
		config_service,
	})
	.await;

	assert!(result.is_err());
}

#[tokio::test]
async fn test_execute_preview_with_mocked_repository() {
	let config = ConfigBuilder::new()
		.name("welcome-banner")
		.value(json!({ "enabled": false }))
		.add_override(
			OverrideBuilder::new("Beta testers")
				.condition(
					override_evaluator::models::ComparisonOperator::Equals,
					"beta",
					json!(true),
				)
				.literal(json!({ "enabled": true }))
				.build(),
		)
		.build();

	let mut mock_repository = MockConfigRepository::default();
	let stored = config.clone();
	mock_repository
		.expect_get()
		.returning(move |name| match name {
			"welcome-banner" => Some(stored.clone()),
			_ => None,
		});

	let service = ConfigService::new_with_repository(mock_repository).unwrap();

	let result = execute_preview(PreviewExecutionConfig {
		path: None,
		config_name: Some("welcome-banner".to_string()),
		context: context_with(vec![("beta", json!(true))]),
		environment_id: None,
		config_service: Arc::new(Mutex::new(service)),
	})
	.await;

	assert!(result.is_ok(), "Preview failed: {:?}", result.err());
	let evaluation: serde_json::Value = serde_json::from_str(&result.unwrap()).unwrap();
	assert_eq!(evaluation["finalValue"], json!({ "enabled": true }));
}
