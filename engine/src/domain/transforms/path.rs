//! Path Resolver
//!
//! Dot-notation lookup into span payloads, and the inverse operation of
//! splitting a combined `<span_name>.<attribute_path>` string back into the
//! span it refers to.
//!
//! ## Lookup rules
//!
//! A path is split on `.` and descended one key at a time. Objects are
//! addressed by key, arrays by canonical decimal index (`0`, `12`, not `012`).
//! The first missing step ends the lookup with `None`; lookups never panic.
//!
//! Keys that themselves contain a dot (flat OTEL attributes such as
//! `"gen_ai.usage.input_tokens"`) are not addressable by a dotted path. They
//! can still be read with [`resolve_keys`], which takes keys literally.
//!
//! ## Span name splitting
//!
//! Span names may contain dots, so the first `.` in a combined path is not a
//! reliable boundary. The span whose name is the **longest** dotted prefix of
//! the path wins (ties go to the earliest span in input order).

use std::borrow::Borrow;

use serde_json::Value as JsonValue;

use crate::domain::spans::Span;

/// Resolve a dot-notation path inside `root`.
///
/// Returns `None` for an empty path or when any step is missing. A present
/// `null` is returned as `Some(&Value::Null)`.
pub fn resolve_value<'a>(root: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    if path.is_empty() {
        return None;
    }
    resolve_keys(root, path.split('.'))
}

/// Resolve an already-split key sequence, each key taken literally.
pub fn resolve_keys<'a, I, K>(root: &'a JsonValue, keys: I) -> Option<&'a JsonValue>
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    keys.into_iter()
        .try_fold(root, |current, key| child(current, key.as_ref()))
}

/// Single-step lookup: object key or canonical array index.
pub fn child<'a>(value: &'a JsonValue, key: &str) -> Option<&'a JsonValue> {
    match value {
        JsonValue::Object(map) => map.get(key),
        JsonValue::Array(items) => array_index(key).and_then(|idx| items.get(idx)),
        _ => None,
    }
}

fn array_index(key: &str) -> Option<usize> {
    let canonical = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'));
    if canonical { key.parse().ok() } else { None }
}

/// True when `name` followed by `.` is a prefix of `path`.
fn is_dotted_prefix(path: &str, name: &str) -> bool {
    !name.is_empty()
        && path.len() > name.len()
        && path.starts_with(name)
        && path.as_bytes()[name.len()] == b'.'
}

/// Longest dotted-prefix match among `names`: `(index, name_len)`.
fn longest_prefix<'n, I>(path: &str, names: I) -> Option<(usize, usize)>
where
    I: IntoIterator<Item = Option<&'n str>>,
{
    let mut best: Option<(usize, usize)> = None;
    for (idx, name) in names.into_iter().enumerate() {
        let Some(name) = name else { continue };
        if !is_dotted_prefix(path, name) {
            continue;
        }
        if best.is_none_or(|(_, len)| name.len() > len) {
            best = Some((idx, name.len()));
        }
    }
    best
}

/// Split `path` into `(span_name, attribute_path)` using the longest span
/// name in `names` that is a dotted prefix. No payload validation.
///
/// ```
/// use traceset::domain::transforms::path::split_span_prefix;
///
/// let names = ["A", "A.B"];
/// assert_eq!(split_span_prefix("A.B.x", names), Some(("A.B", "x")));
/// assert_eq!(split_span_prefix("A.y", names), Some(("A", "y")));
/// assert_eq!(split_span_prefix("C.y", names), None);
/// ```
pub fn split_span_prefix<'p, 'n, I>(path: &'p str, names: I) -> Option<(&'p str, &'p str)>
where
    I: IntoIterator<Item = &'n str>,
{
    let (_, len) = longest_prefix(path, names.into_iter().map(Some))?;
    Some((&path[..len], &path[len + 1..]))
}

/// Result of mapping a combined path back onto a concrete span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanPathSplit {
    /// Position of the span in the slice that was searched
    pub span_index: usize,
    pub span_id: String,
    pub span_name: String,
    /// Literal keys from the span root to the value, final key included
    pub remaining_keys: Vec<String>,
}

impl SpanPathSplit {
    /// Keys leading to the parent of the final key.
    pub fn parent_keys(&self) -> &[String] {
        self.remaining_keys
            .split_last()
            .map_or(&[], |(_, parents)| parents)
    }

    pub fn final_key(&self) -> Option<&str> {
        self.remaining_keys.last().map(String::as_str)
    }

    pub fn attribute_path(&self) -> String {
        self.remaining_keys.join(".")
    }
}

/// Map `path` onto the span whose name is its longest dotted prefix, then
/// check that the remainder addresses a present value in that span.
///
/// Returns `None` when no span name is a dotted prefix, when the remainder
/// is empty, or when the remainder does not resolve in the chosen span's
/// payload. Callers treat `None` as "start over from the top level".
pub fn split_path_by_span_name<S: Borrow<Span>>(path: &str, spans: &[S]) -> Option<SpanPathSplit> {
    let (span_index, name_len) =
        longest_prefix(path, spans.iter().map(|s| Borrow::<Span>::borrow(s).name()))?;
    let span = Borrow::<Span>::borrow(&spans[span_index]);
    let remainder = &path[name_len + 1..];

    if resolve_value(&span.raw_data, remainder).is_none() {
        tracing::trace!(
            path,
            span_id = %span.span_id,
            "Path does not resolve in the matched span"
        );
        return None;
    }

    Some(SpanPathSplit {
        span_index,
        span_id: span.span_id.clone(),
        span_name: path[..name_len].to_string(),
        remaining_keys: remainder.split('.').map(str::to_string).collect(),
    })
}

/// A leaf value and its attribute path.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafPath<'a> {
    pub path: String,
    pub value: &'a JsonValue,
}

/// Every leaf under `root` in document order.
///
/// Scalars and empty containers are leaves. A scalar root has no attribute
/// path and yields nothing. Keys containing a `.` cannot be addressed by a
/// dotted path, so they and everything below them are skipped.
pub fn leaf_paths(root: &JsonValue) -> Vec<LeafPath<'_>> {
    let mut out = Vec::new();
    collect_leaves(root, &mut String::new(), &mut out);
    out
}

fn collect_leaves<'a>(value: &'a JsonValue, prefix: &mut String, out: &mut Vec<LeafPath<'a>>) {
    let children: Vec<(String, &JsonValue)> = match value {
        JsonValue::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        JsonValue::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => return,
    };

    for (key, child) in children {
        if key.contains('.') {
            continue;
        }
        let restore = prefix.len();
        if !prefix.is_empty() {
            prefix.push('.');
        }
        prefix.push_str(&key);

        let is_empty_record = match child {
            JsonValue::Object(map) => map.is_empty(),
            JsonValue::Array(items) => items.is_empty(),
            _ => true,
        };
        if is_empty_record {
            out.push(LeafPath {
                path: prefix.clone(),
                value: child,
            });
        } else {
            collect_leaves(child, prefix, out);
        }

        prefix.truncate(restore);
    }
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
