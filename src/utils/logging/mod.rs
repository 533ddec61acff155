//! Logging configuration driven by environment variables.
//!
//! Variables read at startup:
//! - LOG_MODE: "stdout" (default) or "file"
//! - LOG_LEVEL: "trace", "debug", "info", "warn" or "error"; defaults to "info"
//! - LOG_DATA_DIR: directory log files are written to; defaults to "logs/"
//! - LOG_MAX_SIZE: size a log file may reach before rolling, as a plain byte
//!   count or a human-readable size such as "1GB"; defaults to 1GB
//! - IN_DOCKER: "true" pins the log directory to "logs/" inside a container

pub mod error;

use chrono::Utc;
use std::{
	env,
	fs::{create_dir_all, metadata},
	path::Path,
};
use tracing::{info, Subscriber};
use tracing_subscriber::{
	filter::EnvFilter,
	fmt,
	fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
	prelude::*,
	registry::LookupSpan,
};

use crate::utils::{constants::DEFAULT_LOG_MAX_SIZE, parse_string_to_bytes_size};

/// Wraps a formatter and removes ANSI escape sequences from its output.
///
/// File logs go through this wrapper so color codes never reach disk.
struct PlainTextFormatter<F> {
	inner: F,
}

impl<S, N, F> FormatEvent<S, N> for PlainTextFormatter<F>
where
	S: Subscriber + for<'a> LookupSpan<'a>,
	N: for<'a> FormatFields<'a> + 'static,
	F: FormatEvent<S, N>,
{
	fn format_event(
		&self,
		ctx: &FmtContext<'_, S, N>,
		mut writer: Writer<'_>,
		event: &tracing::Event<'_>,
	) -> std::fmt::Result {
		let mut formatted = String::new();
		self.inner
			.format_event(ctx, Writer::new(&mut formatted), event)?;
		write!(writer, "{}", strip_ansi_escapes(&formatted))
	}
}

/// Removes ANSI escape sequences (colors and text styles) from a string.
fn strip_ansi_escapes(input: &str) -> String {
	match regex::Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]") {
		Ok(pattern) => pattern.replace_all(input, "").to_string(),
		Err(_) => input.to_string(),
	}
}

/// Builds the rolled log file name for a date and sequence index.
///
/// "logs/evaluator.log" becomes "logs/evaluator-2026-08-23.1.log"; a base
/// path without the ".log" suffix gains one.
pub fn compute_rolled_file_path(base_file_path: &str, date_str: &str, index: u32) -> String {
	let stem = base_file_path
		.strip_suffix(".log")
		.unwrap_or(base_file_path);
	format!("{}-{}.{}.log", stem, date_str, index)
}

/// Picks the log file to write to, advancing the sequence index while the
/// candidate file already holds more than `max_size` bytes.
pub fn space_based_rolling(
	file_path: &str,
	base_file_path: &str,
	date_str: &str,
	max_size: u64,
) -> String {
	let mut candidate = file_path.to_string();
	let mut index = 1;
	while let Ok(file_info) = metadata(&candidate) {
		if file_info.len() <= max_size {
			break;
		}
		candidate = compute_rolled_file_path(base_file_path, date_str, index);
		index += 1;
	}
	candidate
}

/// Reads the size ceiling for a single log file from `LOG_MAX_SIZE`.
///
/// Plain byte counts and human-readable sizes are both accepted; unset or
/// unparseable values fall back to the default ceiling.
fn max_log_file_size() -> u64 {
	env::var("LOG_MAX_SIZE")
		.ok()
		.and_then(|raw| parse_string_to_bytes_size(&raw).ok())
		.or_else(|| parse_string_to_bytes_size(DEFAULT_LOG_MAX_SIZE).ok())
		.unwrap_or(1_000_000_000)
}

/// Resolves the directory log files are written into.
///
/// Containers pin the directory to "logs/"; elsewhere `LOG_DATA_DIR` wins
/// over the default. The returned path always ends with a single slash.
fn resolve_log_directory() -> String {
	let in_docker = env::var("IN_DOCKER").map(|v| v == "true").unwrap_or(false);
	let dir = if in_docker {
		"logs/".to_string()
	} else {
		env::var("LOG_DATA_DIR").unwrap_or_else(|_| "logs/".to_string())
	};
	format!("{}/", dir.trim_end_matches('/'))
}

/// Compact single-line event format; `with_ansi` toggles terminal colors.
fn create_log_format(with_ansi: bool) -> fmt::format::Format<fmt::format::Compact> {
	fmt::format()
		.with_level(true)
		.with_target(true)
		.with_thread_ids(false)
		.with_thread_names(false)
		.with_ansi(with_ansi)
		.compact()
}

/// Initializes the global tracing subscriber from environment variables.
///
/// Stdout mode keeps ANSI colors. File mode strips them and writes to a
/// dated log file under the resolved log directory, rolling to the next
/// sequence index once the current file exceeds the configured size.
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error>> {
	let log_mode = env::var("LOG_MODE").unwrap_or_else(|_| "stdout".to_string());
	let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

	let level_filter = match log_level.to_lowercase().as_str() {
		"trace" => tracing::Level::TRACE,
		"debug" => tracing::Level::DEBUG,
		"warn" => tracing::Level::WARN,
		"error" => tracing::Level::ERROR,
		_ => tracing::Level::INFO,
	};
	let subscriber = tracing_subscriber::registry().with(EnvFilter::new(level_filter.to_string()));

	if log_mode.to_lowercase() == "file" {
		let log_dir = resolve_log_directory();
		let date_str = Utc::now().format("%Y-%m-%d").to_string();
		let base_file_path = format!("{}evaluator.log", log_dir);

		// Roll by date first, then by size within the day
		let dated_path = compute_rolled_file_path(&base_file_path, &date_str, 1);
		if let Some(parent) = Path::new(&dated_path).parent() {
			create_dir_all(parent)?;
		}
		let final_path = space_based_rolling(
			&dated_path,
			&base_file_path,
			&date_str,
			max_log_file_size(),
		);

		let file_appender = tracing_appender::rolling::never(
			Path::new(&final_path).parent().unwrap_or(Path::new(".")),
			Path::new(&final_path).file_name().unwrap_or_default(),
		);

		subscriber
			.with(
				fmt::layer()
					.event_format(PlainTextFormatter {
						inner: create_log_format(false),
					})
					.with_writer(file_appender)
					.fmt_fields(fmt::format::PrettyFields::new()),
			)
			.init();
	} else {
		subscriber
			.with(
				fmt::layer()
					.event_format(create_log_format(true))
					.fmt_fields(fmt::format::PrettyFields::new()),
			)
			.init();
	}

	info!("Logging is successfully configured (mode: {})", log_mode);
	Ok(())
}
