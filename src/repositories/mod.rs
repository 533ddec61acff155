//! Repository implementations for config management.
//!
//! This module provides traits and implementations for loading and managing
//! config definitions from the filesystem. The repository provides:
//!
//! - Loading config definitions from JSON files
//! - Validating config references between overrides
//! - Accessing configs through a service layer that doubles as the resolver
//!   used during override rendering

mod config;
mod error;

pub use config::{ConfigRepository, ConfigRepositoryTrait, ConfigService};
pub use error::RepositoryError;
