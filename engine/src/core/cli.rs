use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::config::OutputFormat;
use super::constants::{
    ENV_CONFIG, ENV_OUTPUT_COMPACT, ENV_OUTPUT_FORMAT, ENV_REPORT_MATCHES, ENV_TRANSFORM_SHAPE,
};
use crate::domain::transforms::WireShape;

#[derive(Parser)]
#[command(name = "traceset")]
#[command(version, about = "Turn recorded traces into dataset rows", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Output format (json or table)
    #[arg(long, short = 'f', global = true, env = ENV_OUTPUT_FORMAT, value_parser = parse_output_format)]
    pub format: Option<OutputFormat>,

    /// Print JSON on a single line
    #[arg(long, global = true, env = ENV_OUTPUT_COMPACT)]
    pub compact: bool,

    /// Wire shape for written definitions (columns or variables)
    #[arg(long, global = true, env = ENV_TRANSFORM_SHAPE, value_parser = parse_wire_shape)]
    pub shape: Option<WireShape>,

    /// Include every matching span in `run` output
    #[arg(long, global = true, env = ENV_REPORT_MATCHES)]
    pub report_matches: Option<bool>,
}

/// Parse output format from CLI/env string
fn parse_output_format(s: &str) -> Result<OutputFormat, String> {
    match s.to_lowercase().as_str() {
        "json" => Ok(OutputFormat::Json),
        "table" => Ok(OutputFormat::Table),
        _ => Err(format!(
            "Invalid output format '{}'. Valid options: json, table",
            s
        )),
    }
}

/// Parse wire shape from CLI/env string
fn parse_wire_shape(s: &str) -> Result<WireShape, String> {
    match s.to_lowercase().as_str() {
        "columns" => Ok(WireShape::Columns),
        "variables" => Ok(WireShape::Variables),
        _ => Err(format!(
            "Invalid wire shape '{}'. Valid options: columns, variables",
            s
        )),
    }
}

/// Parse a `NAME=VALUE` pair
fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("Expected NAME=VALUE, got '{}'", s)),
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Execute a transform against a trace and print the row
    Run {
        /// Spans file (array, or object with a "spans" array)
        #[arg(long, short = 's')]
        spans: PathBuf,
        /// Transform definition file (columns or variables shape)
        #[arg(long, short = 't')]
        transform: PathBuf,
    },
    /// Check a transform definition and list every problem
    Validate {
        #[arg(long, short = 't')]
        transform: PathBuf,
    },
    /// List pickable attribute paths
    Paths {
        #[arg(long, short = 's')]
        spans: PathBuf,
        /// Only list paths for spans with this name
        #[arg(long)]
        span: Option<String>,
    },
    /// Rewrite a transform definition in the configured wire shape
    Convert {
        #[arg(long, short = 't')]
        transform: PathBuf,
    },
    /// Reopen the picker at a stored `<span_name>.<attribute_path>`
    Pick {
        #[arg(long, short = 's')]
        spans: PathBuf,
        #[arg(long)]
        path: String,
    },
    /// Build a transform definition from NAME=PATH picks
    Build {
        /// Spans used to split paths on the longest span name
        #[arg(long, short = 's')]
        spans: Option<PathBuf>,
        /// Column as NAME=PATH (repeatable)
        #[arg(long = "column", value_parser = parse_assignment, required = true)]
        columns: Vec<(String, String)>,
        /// Fallback as NAME=JSON (repeatable)
        #[arg(long = "fallback", value_parser = parse_assignment)]
        fallbacks: Vec<(String, String)>,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub compact: bool,
    pub shape: Option<WireShape>,
    pub report_matches: Option<bool>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        config: cli.config,
        format: cli.format,
        compact: cli.compact,
        shape: cli.shape,
        report_matches: cli.report_matches,
    };
    (config, cli.command)
}
