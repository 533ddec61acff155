//! Override rendering: config-reference resolution ahead of evaluation.
//!
//! Override values may point at other configs by name. Rendering resolves
//! every reference concurrently, preserves the authored priority order, and
//! drops overrides whose reference does not resolve so that evaluation only
//! ever sees concrete values.

use async_trait::async_trait;
use futures::future::join_all;
use serde_json::Value as JsonValue;

use crate::{
	models::{
		Config, EvaluationContext, EvaluationResult, Override, OverrideValue, RenderedOverride,
	},
	services::evaluator::{error::EvaluatorError, overrides::evaluate_config_value},
};

/// Resolves config names to their base values during rendering.
///
/// `environment_id` selects an environment-specific variant where the
/// backing store distinguishes them; resolvers without that notion ignore
/// it. Returning `None` marks the reference as dangling.
#[async_trait]
pub trait ConfigResolver: Send + Sync {
	/// Resolves a config's base value by name.
	async fn resolve(&self, config_name: &str, environment_id: Option<&str>) -> Option<JsonValue>;
}

/// Renders a config's overrides by resolving config references.
///
/// All references are resolved concurrently; the returned list preserves
/// the input order. Overrides whose reference does not resolve are omitted
/// and logged, so a dangling reference degrades that override rather than
/// the whole config.
///
/// Arguments:
/// - overrides: The authored overrides, highest priority first.
/// - resolver: Source of base values for referenced configs.
/// - environment_id: Optional environment to resolve references within.
///
/// Returns:
/// - The rendered overrides that survived resolution, in priority order.
pub async fn render_overrides(
	overrides: &[Override],
	resolver: &dyn ConfigResolver,
	environment_id: Option<&str>,
) -> Vec<RenderedOverride> {
	let rendered = overrides.iter().map(|override_| async move {
		match &override_.value {
			OverrideValue::Literal(value) => Some(override_.rendered(value.clone())),
			OverrideValue::ConfigReference { config_name } => {
				match resolver.resolve(config_name, environment_id).await {
					Some(value) => Some(override_.rendered(value)),
					None => {
						tracing::warn!(
							"Skipping override '{}': referenced config '{}' did not resolve",
							override_.name,
							config_name
						);
						None
					}
				}
			}
		}
	});

	join_all(rendered).await.into_iter().flatten().collect()
}

/// Renders a config's overrides and evaluates them against a context.
///
/// This is the entry point callers use for one-shot evaluation; rendering
/// and evaluation can also be driven separately when a caller wants to
/// reuse rendered overrides across contexts.
pub async fn evaluate_config(
	config: &Config,
	context: &EvaluationContext,
	resolver: &dyn ConfigResolver,
	environment_id: Option<&str>,
) -> Result<EvaluationResult, EvaluatorError> {
	let rendered = render_overrides(&config.overrides, resolver, environment_id).await;
	evaluate_config_value(&config.value, &rendered, context)
}
