//! Constants used across the application.

/// Default directory config definitions are loaded from
pub const DEFAULT_CONFIG_DIR: &str = "config/configs";

/// Environment variable overriding the serialized config value size ceiling
pub const MAX_CONFIG_VALUE_SIZE_ENV: &str = "MAX_CONFIG_VALUE_SIZE";

/// Default serialized size ceiling for a single config value
pub const DEFAULT_MAX_CONFIG_VALUE_SIZE: &str = "1MB";

/// Maximum number of overrides a single config may carry
pub const MAX_OVERRIDES_PER_CONFIG: usize = 100;

/// Maximum number of conditions a single override may carry
pub const MAX_CONDITIONS_PER_OVERRIDE: usize = 100;

/// Maximum length of config and override names, in characters
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum nesting depth of a condition tree, counted in nodes along a path
pub const MAX_CONDITION_DEPTH: usize = 64;

/// Default size a log file may grow to before rolling over to a new file
pub const DEFAULT_LOG_MAX_SIZE: &str = "1GB";
