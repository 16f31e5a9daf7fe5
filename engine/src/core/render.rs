//! Command output rendering (JSON or aligned text table)

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;

use super::config::{AppConfig, OutputFormat};
use super::constants::TABLE_PREVIEW_MAX_CHARS;
use crate::domain::transforms::{PickedValue, ResolvedColumn, executor};

/// Serialize `value` honoring `pretty`.
pub fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    out.context("Failed to serialize output")
}

/// Executor results: the dataset row plus per-column resolution details.
pub fn render_columns(columns: &[ResolvedColumn], config: &AppConfig) -> Result<String> {
    match config.output.format {
        OutputFormat::Json => {
            let details: Vec<ResolvedColumn> = columns
                .iter()
                .cloned()
                .map(|mut column| {
                    if !config.transform.report_matches {
                        column.all_matches.clear();
                    }
                    column
                })
                .collect();
            let doc = json!({
                "row": executor::to_row(columns),
                "columns": details,
            });
            to_json(&doc, config.output.pretty)
        }
        OutputFormat::Table => {
            let rows = columns
                .iter()
                .map(|c| {
                    vec![
                        c.name.clone(),
                        c.value.clone(),
                        c.match_count.to_string(),
                        c.selected_span_id.clone().unwrap_or_default(),
                    ]
                })
                .collect::<Vec<_>>();
            Ok(render_table(&["COLUMN", "VALUE", "MATCHES", "SPAN"], &rows))
        }
    }
}

/// Validation outcome.
pub fn render_validation(errors: &[String], config: &AppConfig) -> Result<String> {
    match config.output.format {
        OutputFormat::Json => to_json(
            &json!({ "valid": errors.is_empty(), "errors": errors }),
            config.output.pretty,
        ),
        OutputFormat::Table if errors.is_empty() => Ok("Transform is valid".to_string()),
        OutputFormat::Table => Ok(errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Pickable `(path, preview)` pairs.
pub fn render_paths(paths: &[(String, String)], config: &AppConfig) -> Result<String> {
    match config.output.format {
        OutputFormat::Json => {
            let doc: Vec<_> = paths
                .iter()
                .map(|(path, value)| json!({ "path": path, "value": value }))
                .collect();
            to_json(&doc, config.output.pretty)
        }
        OutputFormat::Table => {
            let rows = paths
                .iter()
                .map(|(path, value)| vec![path.clone(), value.clone()])
                .collect::<Vec<_>>();
            Ok(render_table(&["PATH", "VALUE"], &rows))
        }
    }
}

/// A selector pick.
pub fn render_pick(pick: &PickedValue, config: &AppConfig) -> Result<String> {
    match config.output.format {
        OutputFormat::Json => to_json(pick, config.output.pretty),
        OutputFormat::Table => {
            let rows = vec![
                vec!["span_name".to_string(), pick.span_name.clone()],
                vec!["attribute_path".to_string(), pick.attribute_path.clone()],
                vec!["value".to_string(), pick.value.clone()],
                vec!["match_count".to_string(), pick.match_count.to_string()],
            ];
            Ok(render_table(&["FIELD", "VALUE"], &rows))
        }
    }
}

/// Left-aligned text table. Cells are truncated and newlines flattened.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| preview(cell)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_row = |row: &[String]| -> String {
        row.iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut lines = vec![format_row(&header)];
    lines.extend(cells.iter().map(|row| format_row(row)));
    lines.join("\n")
}

fn preview(cell: &str) -> String {
    let flat = cell.replace(['\n', '\r'], " ");
    if flat.chars().count() <= TABLE_PREVIEW_MAX_CHARS {
        return flat;
    }
    let mut cut: String = flat.chars().take(TABLE_PREVIEW_MAX_CHARS - 3).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{OutputConfig, TransformConfig};
    use crate::domain::transforms::{SpanMatch, WireShape};

    fn config(format: OutputFormat, report_matches: bool) -> AppConfig {
        AppConfig {
            output: OutputConfig {
                format,
                pretty: false,
            },
            transform: TransformConfig {
                shape: WireShape::Columns,
                report_matches,
            },
        }
    }

    fn resolved() -> Vec<ResolvedColumn> {
        vec![ResolvedColumn {
            name: "t".to_string(),
            value: "72".to_string(),
            match_count: 1,
            selected_span_id: Some("s1".to_string()),
            all_matches: vec![SpanMatch {
                span_id: "s1".to_string(),
                value: "72".to_string(),
            }],
        }]
    }

    #[test]
    fn test_render_columns_json() {
        let out = render_columns(&resolved(), &config(OutputFormat::Json, true)).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(doc["row"], json!({"t": "72"}));
        assert_eq!(doc["columns"][0]["match_count"], 1);
        assert_eq!(doc["columns"][0]["all_matches"][0]["span_id"], "s1");
    }

    #[test]
    fn test_render_columns_json_without_matches() {
        let out = render_columns(&resolved(), &config(OutputFormat::Json, false)).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(doc["columns"][0].get("all_matches").is_none());
    }

    #[test]
    fn test_render_columns_table() {
        let out = render_columns(&resolved(), &config(OutputFormat::Table, true)).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "COLUMN  VALUE  MATCHES  SPAN");
        assert_eq!(lines[1], "t       72     1        s1");
    }

    #[test]
    fn test_render_validation() {
        let errors = vec!["a".to_string(), "b".to_string()];
        let table = render_validation(&errors, &config(OutputFormat::Table, true)).unwrap();
        assert_eq!(table, "  - a\n  - b");

        let ok = render_validation(&[], &config(OutputFormat::Json, true)).unwrap();
        assert_eq!(ok, r#"{"valid":true,"errors":[]}"#);
    }

    #[test]
    fn test_table_truncates_long_cells() {
        let long = "x".repeat(TABLE_PREVIEW_MAX_CHARS + 10);
        let out = render_table(&["V"], &[vec![long]]);
        let row = out.lines().nth(1).unwrap();

        assert_eq!(row.chars().count(), TABLE_PREVIEW_MAX_CHARS);
        assert!(row.ends_with("..."));
    }

    #[test]
    fn test_table_flattens_newlines() {
        let out = render_table(&["V"], &[vec!["a\nb".to_string()]]);
        assert_eq!(out.lines().nth(1), Some("a b"));
    }
}
