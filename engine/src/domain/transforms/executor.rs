//! Transform Executor
//!
//! Evaluates a [`TransformDefinition`] against one trace's spans and produces
//! one flattened row.
//!
//! ## Resolution (per column, in definition order)
//!
//! 1. Spans whose `span_name` equals the column's `span_name` (exact,
//!    case-sensitive) are matches
//! 2. No match: the value is the stringified fallback, or `""`
//! 3. Otherwise the **first** match in input order is used; its attribute is
//!    resolved and stringified, `null`/absent falling back as in (2)
//!
//! Every match's extracted value is reported in `all_matches` so a caller can
//! surface the ambiguity when several spans share a name.
//!
//! The executor is pure and total: it returns one result per column and never
//! fails on missing spans or attributes.

use std::borrow::Borrow;

use serde::Serialize;
use serde_json::Value as JsonValue;

use super::definition::{TransformColumn, TransformDefinition};
use crate::domain::spans::Span;
use crate::utils::json::{stringify_opt, stringify_value};

/// One matching span and the value extracted from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpanMatch {
    pub span_id: String,
    pub value: String,
}

/// Executor output for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumn {
    pub name: String,
    pub value: String,
    pub match_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_span_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all_matches: Vec<SpanMatch>,
}

impl ResolvedColumn {
    /// More than one span carried the column's span name.
    pub fn is_ambiguous(&self) -> bool {
        self.match_count > 1
    }
}

/// Ordered `column_name -> value` map, ready for dataset-row creation.
pub type DatasetRow = serde_json::Map<String, JsonValue>;

/// Evaluate every column of `definition` against `spans`.
///
/// `spans` is taken in the caller's order (typically trace execution order);
/// it is never re-sorted. Accepts owned or borrowed spans, so the output of
/// [`crate::domain::spans::SpanTree::flatten`] can be passed directly.
pub fn execute<S: Borrow<Span>>(spans: &[S], definition: &TransformDefinition) -> Vec<ResolvedColumn> {
    tracing::trace!(
        spans = spans.len(),
        columns = definition.len(),
        "Executing transform"
    );
    definition
        .columns
        .iter()
        .map(|column| resolve_column(spans, column))
        .collect()
}

/// Evaluate and collapse into a dataset row.
pub fn execute_row<S: Borrow<Span>>(spans: &[S], definition: &TransformDefinition) -> DatasetRow {
    to_row(&execute(spans, definition))
}

/// Collapse resolved columns into a row; a repeated name keeps its last value.
pub fn to_row(columns: &[ResolvedColumn]) -> DatasetRow {
    columns
        .iter()
        .map(|c| (c.name.clone(), JsonValue::String(c.value.clone())))
        .collect()
}

/// Resolve a single column.
pub fn resolve_column<S: Borrow<Span>>(spans: &[S], column: &TransformColumn) -> ResolvedColumn {
    let all_matches: Vec<SpanMatch> = spans
        .iter()
        .map(<S as Borrow<Span>>::borrow)
        .filter(|span| span.has_name(&column.span_name))
        .map(|span| SpanMatch {
            span_id: span.span_id.clone(),
            value: extract(span, column),
        })
        .collect();

    let Some(first) = all_matches.first() else {
        tracing::trace!(
            column = %column.column_name,
            span_name = %column.span_name,
            "No span matched, using fallback"
        );
        return ResolvedColumn {
            name: column.column_name.clone(),
            value: fallback_value(column),
            match_count: 0,
            selected_span_id: None,
            all_matches: Vec::new(),
        };
    };

    if all_matches.len() > 1 {
        tracing::debug!(
            column = %column.column_name,
            span_name = %column.span_name,
            matches = all_matches.len(),
            "Multiple spans share this name, using the first"
        );
    }

    ResolvedColumn {
        name: column.column_name.clone(),
        value: first.value.clone(),
        match_count: all_matches.len(),
        selected_span_id: Some(first.span_id.clone()),
        all_matches,
    }
}

/// Value of `column` in one span, fallback applied.
fn extract(span: &Span, column: &TransformColumn) -> String {
    match span.resolve(&column.attribute_path) {
        Some(value) if !value.is_null() => stringify_value(value),
        _ => fallback_value(column),
    }
}

/// `stringify(fallback ?? "")`
fn fallback_value(column: &TransformColumn) -> String {
    stringify_opt(column.fallback.as_ref())
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
