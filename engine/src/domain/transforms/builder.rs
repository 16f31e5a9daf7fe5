//! Transform Builder
//!
//! Turns interactive picks into a [`TransformDefinition`]. A pick carries a
//! combined `<span_name>.<attribute_path>` path; picks made through the span
//! selector also carry the already-resolved pair, which is used verbatim.
//!
//! Hand-typed paths are split with the longest span-name prefix among the
//! spans the builder knows about, falling back to the first `.` only when no
//! span context is available or no known name matches.

use std::borrow::Borrow;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::definition::{TransformColumn, TransformDefinition};
use super::path::split_span_prefix;
use super::selector::PickedValue;
use crate::domain::spans::Span;
use crate::utils::json::non_null;

/// One row of the column picker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PickedColumn {
    #[serde(default)]
    pub column_name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<JsonValue>,
    /// Resolved by the selector; bypasses path splitting when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_path: Option<String>,
}

impl PickedColumn {
    pub fn new(column_name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// A column from a selector pick, boundary already known.
    pub fn from_pick(column_name: impl Into<String>, pick: &PickedValue) -> Self {
        Self {
            column_name: column_name.into(),
            path: pick.path.clone(),
            fallback: None,
            span_name: Some(pick.span_name.clone()),
            attribute_path: Some(pick.attribute_path.clone()),
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<JsonValue>) -> Self {
        self.fallback = non_null(Some(fallback.into()));
        self
    }

    fn resolved_pair(&self) -> Option<(&str, &str)> {
        match (self.span_name.as_deref(), self.attribute_path.as_deref()) {
            (Some(span), Some(attr)) if !span.is_empty() && !attr.is_empty() => Some((span, attr)),
            _ => None,
        }
    }
}

/// Builds transform definitions from picks.
#[derive(Debug, Clone, Default)]
pub struct TransformBuilder<'a> {
    span_names: Vec<&'a str>,
}

impl<'a> TransformBuilder<'a> {
    /// Builder without span context: hand-typed paths split on the first `.`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder that splits hand-typed paths against these spans' names.
    pub fn with_spans<S: Borrow<Span>>(spans: &'a [S]) -> Self {
        let mut seen: FxHashSet<&'a str> = FxHashSet::default();
        let span_names = spans
            .iter()
            .filter_map(|s| Borrow::<Span>::borrow(s).name())
            .filter(|name| seen.insert(*name))
            .collect();
        Self { span_names }
    }

    /// Split a combined path into `(span_name, attribute_path)`.
    ///
    /// A path without any `.` yields the whole path as span name and an
    /// empty attribute path, which validation then reports.
    pub fn split_path<'p>(&self, path: &'p str) -> (&'p str, &'p str) {
        if let Some(split) = split_span_prefix(path, self.span_names.iter().copied()) {
            return split;
        }
        path.split_once('.').unwrap_or((path, ""))
    }

    /// Build a definition, dropping rows that are not configured yet.
    pub fn build(&self, columns: &[PickedColumn]) -> TransformDefinition {
        let built = columns
            .iter()
            .filter_map(|picked| self.build_column(picked))
            .collect::<Vec<_>>();

        tracing::debug!(
            picked = columns.len(),
            built = built.len(),
            "Built transform definition"
        );
        TransformDefinition::new(built)
    }

    fn build_column(&self, picked: &PickedColumn) -> Option<TransformColumn> {
        let column_name = picked.column_name.trim();
        if column_name.is_empty() {
            return None;
        }

        let (span_name, attribute_path) = match picked.resolved_pair() {
            Some(pair) => pair,
            None if picked.path.trim().is_empty() => return None,
            None => self.split_path(&picked.path),
        };

        Some(TransformColumn {
            column_name: column_name.to_string(),
            span_name: span_name.to_string(),
            attribute_path: attribute_path.to_string(),
            fallback: non_null(picked.fallback.clone()),
        })
    }
}

/// Build without span context.
pub fn build_from_columns(columns: &[PickedColumn]) -> TransformDefinition {
    TransformBuilder::new().build(columns)
}
