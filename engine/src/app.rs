//! Core application

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;

use crate::core::cli::{self, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{APP_NAME, ENV_LOG, SPANS_FILE_KEY};
use crate::core::render;
use crate::domain::spans::{Span, SpanTree};
use crate::domain::transforms::{
    PickedColumn, SpanSelector, TransformBuilder, TransformDefinition, TransformWire, execute,
    leaf_paths, parse_fallback,
};
use crate::utils::file::{expand_path, read_json};
use crate::utils::json::stringify_value;

pub struct CoreApp {
    pub config: AppConfig,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let app = Self {
            config: AppConfig::load(&cli_config)?,
        };
        let output = app.execute(command)?;
        println!("{}", output);
        Ok(())
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .with_writer(std::io::stderr)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    /// Run one command and return what should be printed.
    pub fn execute(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Run { spans, transform } => self.run_transform(&spans, &transform),
            Commands::Validate { transform } => self.validate(&transform),
            Commands::Paths { spans, span } => self.paths(&spans, span.as_deref()),
            Commands::Convert { transform } => self.convert(&transform),
            Commands::Pick { spans, path } => self.pick(&spans, &path),
            Commands::Build {
                spans,
                columns,
                fallbacks,
            } => self.build(spans.as_deref(), &columns, &fallbacks),
        }
    }

    fn run_transform(&self, spans_path: &Path, transform_path: &Path) -> Result<String> {
        let tree = load_spans(spans_path)?;
        let definition = load_definition(transform_path)?.validated()?;
        let spans = tree.flatten();

        tracing::debug!(
            spans = spans.len(),
            columns = definition.len(),
            "Running transform"
        );
        let columns = execute(&spans, &definition);
        render::render_columns(&columns, &self.config)
    }

    fn validate(&self, transform_path: &Path) -> Result<String> {
        let definition = load_definition(transform_path)?;
        let errors = definition.validate();
        let rendered = render::render_validation(&errors, &self.config)?;
        if errors.is_empty() {
            return Ok(rendered);
        }
        anyhow::bail!("{}\n\n{} validation error(s)", rendered, errors.len())
    }

    fn paths(&self, spans_path: &Path, span_name: Option<&str>) -> Result<String> {
        let tree = load_spans(spans_path)?;

        let mut paths = Vec::new();
        for span in tree.flatten() {
            let Some(name) = span.name().filter(|n| !n.is_empty()) else {
                continue;
            };
            if span_name.is_some_and(|wanted| wanted != name) {
                continue;
            }
            for leaf in leaf_paths(&span.raw_data) {
                paths.push((format!("{}.{}", name, leaf.path), stringify_value(leaf.value)));
            }
        }

        tracing::debug!(paths = paths.len(), "Collected attribute paths");
        render::render_paths(&paths, &self.config)
    }

    fn convert(&self, transform_path: &Path) -> Result<String> {
        let definition = load_definition(transform_path)?;
        let wire = definition.to_wire(self.config.transform.shape);
        render::to_json(&wire, self.config.output.pretty)
    }

    fn pick(&self, spans_path: &Path, stored_path: &str) -> Result<String> {
        let tree = load_spans(spans_path)?;
        let spans = tree.flatten();
        let selector = SpanSelector::new(&spans);

        let rehydrated = selector.rehydrate(stored_path);
        let pick = rehydrated
            .picked_key
            .as_deref()
            .and_then(|key| selector.pick_value(&rehydrated.state, key))
            .with_context(|| {
                format!(
                    "Path '{}' does not resolve in these spans; pick again from the top level",
                    stored_path
                )
            })?;

        render::render_pick(&pick, &self.config)
    }

    fn build(
        &self,
        spans_path: Option<&Path>,
        columns: &[(String, String)],
        fallbacks: &[(String, String)],
    ) -> Result<String> {
        let tree = spans_path.map(load_spans).transpose()?.unwrap_or_default();
        let spans = tree.flatten();
        let builder = TransformBuilder::with_spans(&spans);

        let mut picked = Vec::with_capacity(columns.len());
        for (name, path) in columns {
            let mut column = PickedColumn::new(name.clone(), path.clone());
            if let Some((_, raw)) = fallbacks.iter().rev().find(|(n, _)| n == name) {
                column.fallback = parse_fallback(raw)
                    .with_context(|| format!("Invalid fallback for column '{}'", name))?;
            }
            picked.push(column);
        }

        let definition = builder.build(&picked).validated()?;
        let wire = definition.to_wire(self.config.transform.shape);
        render::to_json(&wire, self.config.output.pretty)
    }
}

/// Read spans from a file holding an array, or an object with a `spans` array.
///
/// Spans are linked by `parent_span_id` (nested `children` are lifted into
/// the list) and the returned tree is stored in pre-order.
pub fn load_spans(path: &Path) -> Result<SpanTree> {
    let path = expand_path(&path.to_string_lossy());
    let document = read_json(&path)?;
    let list = match document {
        JsonValue::Object(mut map) => map.remove(SPANS_FILE_KEY).with_context(|| {
            format!(
                "Spans file must be an array or contain a \"{}\" array: {}",
                SPANS_FILE_KEY,
                path.display()
            )
        })?,
        other => other,
    };
    let spans: Vec<Span> = serde_json::from_value(list)
        .with_context(|| format!("Failed to read spans from: {}", path.display()))?;

    tracing::debug!(spans = spans.len(), "Loaded spans");
    Ok(SpanTree::from_flat(spans))
}

/// Read a transform definition in either wire shape.
pub fn load_definition(path: &Path) -> Result<TransformDefinition> {
    let path = expand_path(&path.to_string_lossy());
    let document = read_json(&path)?;
    let wire = TransformWire::from_value(document)
        .with_context(|| format!("Failed to read transform: {}", path.display()))?;

    tracing::debug!(shape = %wire.shape(), "Loaded transform definition");
    Ok(TransformDefinition::from(wire))
}
