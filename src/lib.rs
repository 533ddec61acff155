//! Override evaluation engine for remote configuration.
//!
//! This library resolves which value a configuration entry takes for a given
//! request context. It includes:
//!
//! - Configuration management through JSON files
//! - Typed condition evaluation with explicit casting rules
//! - Priority-ordered override resolution with full evaluation traces
//! - Extensible repository and service architecture
//!
//! # Module Structure
//!
//! - `models`: Data structures for configs, conditions and evaluation traces
//! - `repositories`: Configuration storage and reference validation
//! - `services`: Core evaluation logic (rendering, comparison, tracing)
//! - `utils`: Common utilities and helper functions

pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;
