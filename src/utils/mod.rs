//! Utility modules for common functionality.
//!
//! This module provides various utility functions and types that are used across
//! the application. Currently includes:
//!
//! - constants: Constants for the application
//! - logging: Logging utilities
//! - parsing: Parsing utilities
//! - preview: Preview utilities for evaluating configs against ad-hoc contexts
//! - tests: Test utilities

pub mod constants;
pub mod logging;
pub mod parsing;
pub mod preview;
pub mod tests;

pub use constants::*;
pub use parsing::*;
