//! Interactive Span Selector
//!
//! The human-driven way to build a column: choose a span, walk down into its
//! payload, pick a key. Navigation is an explicit value type
//! ([`NavigationState`]) with pure transitions; [`SpanSelector`] binds it to
//! a span list for the data-aware operations.
//!
//! ```text
//! { span: None, keys: [] }  --select_span-->  { span: id, keys: [] }
//!                           <--go_back-----
//! { span: id, keys: [..] }  --descend_into--> { span: id, keys: [.., k] }
//!                           <--go_back-----
//! ```
//!
//! Picks resolve through the same lookup as the executor, so feeding a pick's
//! `(span_name, attribute_path)` back into the executor over the same spans
//! reproduces the picked value. Keys the executor could not read back are
//! refused: dotted keys, and any key under a span that an earlier span with
//! the same name shadows.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::path::{self, split_path_by_span_name};
use crate::domain::spans::Span;
use crate::utils::json::{is_record, stringify_value};

/// Where the picker currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub span_id: Option<String>,
    /// Literal keys descended so far under the selected span
    #[serde(default)]
    pub keys: Vec<String>,
}

impl NavigationState {
    pub fn top_level() -> Self {
        Self::default()
    }

    pub fn is_top_level(&self) -> bool {
        self.span_id.is_none()
    }

    /// Choose a span and reset to its root.
    pub fn select_span(self, span_id: impl Into<String>) -> Self {
        Self {
            span_id: Some(span_id.into()),
            keys: Vec::new(),
        }
    }

    /// Push a key. Without a selected span this is a no-op.
    pub fn descend_into(mut self, key: impl Into<String>) -> Self {
        if self.span_id.is_some() {
            self.keys.push(key.into());
        }
        self
    }

    /// Pop a key, else clear the span, else stay at top level.
    pub fn go_back(mut self) -> Self {
        if self.keys.pop().is_none() {
            self.span_id = None;
        }
        self
    }
}

/// One key at the current navigation level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorEntry {
    pub key: String,
    /// The value is an object or array and can be descended into
    pub navigable: bool,
    /// Stringified value for leaves
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

/// A committed pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickedValue {
    /// `<span_name>.<attribute_path>`
    pub path: String,
    pub span_name: String,
    pub attribute_path: String,
    /// Stringified exactly as the executor would render it
    pub value: String,
    /// Spans sharing `span_name`; the pick always comes from the first
    pub match_count: usize,
}

/// A navigation state rebuilt from a stored path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rehydrated {
    /// Positioned at the parent of the picked key
    pub state: NavigationState,
    pub picked_key: Option<String>,
}

/// Data-aware selector operations over one trace's spans.
#[derive(Debug)]
pub struct SpanSelector<'a, S> {
    spans: &'a [S],
}

impl<'a, S: Borrow<Span>> SpanSelector<'a, S> {
    pub fn new(spans: &'a [S]) -> Self {
        Self { spans }
    }

    fn spans(&self) -> impl Iterator<Item = &'a Span> {
        self.spans.iter().map(<S as Borrow<Span>>::borrow)
    }

    /// The selected span, looked up by `span_id`.
    pub fn selected_span(&self, state: &NavigationState) -> Option<&'a Span> {
        let span_id = state.span_id.as_deref()?;
        self.spans().find(|span| span.span_id == span_id)
    }

    /// Value at the current position, `None` at top level or if the path
    /// no longer exists in the data.
    pub fn current_value(&self, state: &NavigationState) -> Option<&'a JsonValue> {
        let span = self.selected_span(state)?;
        path::resolve_keys(&span.raw_data, &state.keys)
    }

    /// Keys available at the current position, in document order.
    ///
    /// At the top level every span is listed by `span_id`, with its name as
    /// the preview.
    pub fn entries(&self, state: &NavigationState) -> Vec<SelectorEntry> {
        if state.is_top_level() {
            return self
                .spans()
                .map(|span| SelectorEntry {
                    key: span.span_id.clone(),
                    navigable: true,
                    preview: span.span_name.clone(),
                })
                .collect();
        }

        let Some(current) = self.current_value(state) else {
            return Vec::new();
        };

        let children: Vec<(String, &JsonValue)> = match current {
            JsonValue::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
            JsonValue::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            _ => return Vec::new(),
        };

        children
            .into_iter()
            .map(|(key, value)| {
                let navigable = is_record(value);
                SelectorEntry {
                    key,
                    navigable,
                    preview: (!navigable).then(|| stringify_value(value)),
                }
            })
            .collect()
    }

    /// Descend into `key` when it holds an object or array. At the top level
    /// `key` is a `span_id` and selects that span.
    pub fn descend_into(&self, state: NavigationState, key: &str) -> Option<NavigationState> {
        if state.is_top_level() {
            let span = self.spans().find(|span| span.span_id == key)?;
            return Some(state.select_span(span.span_id.clone()));
        }

        let current = self.current_value(&state)?;
        let next = path::child(current, key)?;
        if !is_record(next) {
            return None;
        }
        Some(state.descend_into(key))
    }

    /// Commit `key` at the current position. Navigation state is unchanged.
    pub fn pick_value(&self, state: &NavigationState, key: &str) -> Option<PickedValue> {
        let span = self.selected_span(state)?;
        let span_name = span.name().filter(|name| !name.is_empty())?;
        let parent = path::resolve_keys(&span.raw_data, &state.keys)?;
        let value = path::child(parent, key)?;

        let attribute_path = state
            .keys
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(key))
            .collect::<Vec<_>>()
            .join(".");

        // Dotted keys do not survive the round trip through a dotted path
        if !span
            .resolve(&attribute_path)
            .is_some_and(|resolved| std::ptr::eq(resolved, value))
        {
            tracing::debug!(
                attribute_path = %attribute_path,
                "Picked key is not addressable by a dotted path"
            );
            return None;
        }

        // The executor reads the first span carrying this name
        let mut named = self.spans().filter(|s| s.has_name(span_name));
        if !named.next().is_some_and(|first| std::ptr::eq(first, span)) {
            tracing::debug!(
                span_name,
                span_id = %span.span_id,
                "Picked span is shadowed by an earlier span with the same name"
            );
            return None;
        }
        let match_count = 1 + named.count();

        Some(PickedValue {
            path: format!("{span_name}.{attribute_path}"),
            span_name: span_name.to_string(),
            attribute_path,
            value: stringify_value(value),
            match_count,
        })
    }

    /// Rebuild navigation from a stored `<span_name>.<attribute_path>`.
    ///
    /// Falls back to the top level when no span matches or the path no
    /// longer resolves in the span's data.
    pub fn rehydrate(&self, stored_path: &str) -> Rehydrated {
        let Some(split) = split_path_by_span_name(stored_path, self.spans) else {
            tracing::debug!(
                path = stored_path,
                "Stored path no longer resolves, starting from top level"
            );
            return Rehydrated::default();
        };

        let mut keys = split.remaining_keys;
        let picked_key = keys.pop();
        Rehydrated {
            state: NavigationState {
                span_id: Some(split.span_id),
                keys,
            },
            picked_key,
        }
    }
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
