use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::transforms::WireShape;
use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_OUTPUT_PRETTY, DEFAULT_REPORT_MATCHES,
};

// =============================================================================
// Output Format Enum
// =============================================================================

/// How command results are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

// =============================================================================
// File Config (JSON)
// =============================================================================

/// Output configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct OutputFileConfig {
    pub format: Option<OutputFormat>,
    pub pretty: Option<bool>,
}

/// Transform configuration section (from JSON config file)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TransformFileConfig {
    pub shape: Option<WireShape>,
    pub report_matches: Option<bool>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub output: Option<OutputFileConfig>,
    pub transform: Option<TransformFileConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Unknown top-level keys, sorted
    fn unknown_fields(&self) -> Vec<&str> {
        match &self.extra {
            serde_json::Value::Object(map) => {
                let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
                keys.sort_unstable();
                keys
            }
            _ => Vec::new(),
        }
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        let unknown = self.unknown_fields();
        if !unknown.is_empty() {
            tracing::warn!(
                fields = %unknown.join(", "),
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(output) = other.output {
            let current = self.output.get_or_insert_with(OutputFileConfig::default);
            if output.format.is_some() {
                tracing::trace!(format = ?output.format, "Merging output.format");
                current.format = output.format;
            }
            if output.pretty.is_some() {
                tracing::trace!(pretty = ?output.pretty, "Merging output.pretty");
                current.pretty = output.pretty;
            }
        }

        if let Some(transform) = other.transform {
            let current = self
                .transform
                .get_or_insert_with(TransformFileConfig::default);
            if transform.shape.is_some() {
                tracing::trace!(shape = ?transform.shape, "Merging transform.shape");
                current.shape = transform.shape;
            }
            if transform.report_matches.is_some() {
                tracing::trace!(
                    report_matches = ?transform.report_matches,
                    "Merging transform.report_matches"
                );
                current.report_matches = transform.report_matches;
            }
        }
    }
}

// =============================================================================
// Resolved Config
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformConfig {
    pub shape: WireShape,
    pub report_matches: bool,
}

/// Final merged application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub output: OutputConfig,
    pub transform: TransformConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.traceset/traceset.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        Self::load_layers(cli, get_profile_config_path().as_deref())
    }

    fn load_layers(cli: &CliConfig, profile_path: Option<&Path>) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Profile dir, skipped when absent
        if let Some(profile_path) = profile_path
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        // 3. Layer: defaults -> file config -> CLI/env overrides
        let file_output = file_config.output.unwrap_or_default();
        let file_transform = file_config.transform.unwrap_or_default();

        let output = OutputConfig {
            format: cli.format.or(file_output.format).unwrap_or_default(),
            pretty: if cli.compact {
                false
            } else {
                file_output.pretty.unwrap_or(DEFAULT_OUTPUT_PRETTY)
            },
        };

        let transform = TransformConfig {
            shape: cli.shape.or(file_transform.shape).unwrap_or_default(),
            report_matches: cli
                .report_matches
                .or(file_transform.report_matches)
                .unwrap_or(DEFAULT_REPORT_MATCHES),
        };

        let config = Self { output, transform };
        tracing::debug!(config = ?config, "Configuration resolved");
        Ok(config)
    }
}

/// Get the profile config path (~/.traceset/traceset.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}
