//! File utility functions

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;

/// Expand a user-supplied path to an absolute path.
///
/// `~` and `~/rest` resolve against the home directory; relative paths
/// resolve against the current directory. Surrounding whitespace is ignored.
///
/// ```text
/// expand_path("~/.traceset")   // -> /home/user/.traceset
/// expand_path("spans.json")    // -> /current/dir/spans.json
/// expand_path("/etc/traceset") // -> /etc/traceset
/// ```
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    }

    let expanded = match path.strip_prefix('~') {
        Some("") => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        Some(rest) if rest.starts_with('/') || rest.starts_with('\\') => dirs::home_dir()
            .map(|home| home.join(&rest[1..]))
            .unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}

/// Read and parse a JSON document from disk.
pub fn read_json(path: &Path) -> Result<JsonValue> {
    tracing::debug!(path = %path.display(), "Reading JSON file");
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON in file: {}", path.display()))
}
