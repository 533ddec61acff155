//! Core services implementing the business logic.
//!
//! This module contains the main service implementations:
//! - `evaluator`: Override rendering, condition evaluation and trace construction

pub mod evaluator;
