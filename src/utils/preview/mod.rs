//! Preview utilities for evaluating configs against hand-written contexts.
//!
//! This module provides functionality for evaluating a config definition
//! against a specific context outside the serving path
//!
//! - execution: Preview execution logic against a specific context
//! - error: Error types for preview execution

mod error;
pub use error::PreviewError;
pub mod execution;
