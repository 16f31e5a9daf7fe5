//! Span Tree Model
//!
//! One trace is a set of spans. Each span carries a human-assigned name (not
//! unique, may contain dots), an optional parent link, nested children, and
//! the full recorded payload in `raw_data`. The transform engine only ever
//! borrows spans; it never creates, mutates, or persists them.

mod tree;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::transforms::path;

pub use tree::SpanTree;

/// A single recorded unit of work (LLM call, tool call, retrieval, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Storage row identifier, when the fetching collaborator provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub span_id: String,
    #[serde(default)]
    pub span_name: Option<String>,
    #[serde(default)]
    pub parent_span_id: Option<String>,
    /// Nested input form; [`SpanTree::from_flat`] lifts these into its list
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Span>,
    #[serde(default)]
    pub raw_data: JsonValue,
}

impl Span {
    pub fn new(span_id: impl Into<String>, span_name: impl Into<String>, raw_data: JsonValue) -> Self {
        Self {
            span_id: span_id.into(),
            span_name: Some(span_name.into()),
            raw_data,
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent_span_id: impl Into<String>) -> Self {
        self.parent_span_id = Some(parent_span_id.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Span>) -> Self {
        self.children = children;
        self
    }

    /// Span name, or `None` when the span is unnamed.
    pub fn name(&self) -> Option<&str> {
        self.span_name.as_deref()
    }

    /// Exact, case-sensitive name comparison. Unnamed spans never match.
    pub fn has_name(&self, name: &str) -> bool {
        self.name() == Some(name)
    }

    /// Resolve a dot-notation attribute path against `raw_data`.
    pub fn resolve(&self, attribute_path: &str) -> Option<&JsonValue> {
        path::resolve_value(&self.raw_data, attribute_path)
    }
}
