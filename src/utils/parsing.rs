//! Parsing utilities
//!
//! This module provides utilities for parsing values that arrive as strings,
//! such as environment-supplied size limits and user-authored names.

use byte_unit::Byte;
use std::str::FromStr;

/// Parses a string argument into a `u64` value representing a byte size.
///
/// Accepts human-readable formats like "1GB", "500MB", "1024KB", etc.
/// Returns an error if the format is invalid.
pub fn parse_string_to_bytes_size(s: &str) -> Result<u64, String> {
	match Byte::from_str(s) {
		Ok(byte) => Ok(byte.as_u64()),
		Err(e) => Err(format!("Invalid size format: '{}'. Error: {}", s, e)),
	}
}

/// Normalizes a string by trimming whitespace and converting to lowercase.
///
/// Used wherever names are compared case-insensitively, such as duplicate
/// detection across config and override names.
///
/// # Arguments
/// * `input` - The string to normalize
///
/// # Returns
/// * `String` - The normalized string (trimmed and lowercase)
pub fn normalize_string(input: &str) -> String {
	input.trim().to_lowercase()
}
