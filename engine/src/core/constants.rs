// =============================================================================
// Application Identity
// =============================================================================

/// Application name (for display, paths and log filters)
pub const APP_NAME: &str = "traceset";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".traceset";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "traceset.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "TRACESET_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "TRACESET_LOG";

// =============================================================================
// Environment Variables - Output
// =============================================================================

/// Environment variable for output format (json or table)
pub const ENV_OUTPUT_FORMAT: &str = "TRACESET_OUTPUT_FORMAT";

/// Environment variable to disable pretty-printed JSON
pub const ENV_OUTPUT_COMPACT: &str = "TRACESET_OUTPUT_COMPACT";

// =============================================================================
// Environment Variables - Transform
// =============================================================================

/// Environment variable for the wire shape written by `convert`
pub const ENV_TRANSFORM_SHAPE: &str = "TRACESET_TRANSFORM_SHAPE";

/// Environment variable to include per-span matches in `run` output
pub const ENV_REPORT_MATCHES: &str = "TRACESET_REPORT_MATCHES";

// =============================================================================
// Defaults
// =============================================================================

/// Pretty-print JSON output unless told otherwise
pub const DEFAULT_OUTPUT_PRETTY: bool = true;

/// Report all matches for columns whose span name is shared
pub const DEFAULT_REPORT_MATCHES: bool = true;

/// Key holding the span list when the spans file is an object
pub const SPANS_FILE_KEY: &str = "spans";

/// Longest preview rendered in table output before truncation
pub const TABLE_PREVIEW_MAX_CHARS: usize = 60;
