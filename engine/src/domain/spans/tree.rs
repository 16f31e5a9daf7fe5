//! Span tree assembly and traversal

use rustc_hash::FxHashMap;

use super::Span;

/// A trace linked by `parent_span_id`, stored flat in pre-order.
///
/// Parents come before their children and siblings keep input order, so the
/// stored order is the one the executor's first-match rule applies to. Each
/// span's depth is kept alongside it; `children` fields are always empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpanTree {
    spans: Vec<Span>,
    depths: Vec<usize>,
}

impl SpanTree {
    /// Link a span list into a tree using `parent_span_id`.
    ///
    /// Spans nested under `children` are lifted into the list first, taking
    /// the enclosing span as parent unless they name one themselves. Input
    /// order is kept for roots and for siblings. Spans whose parent is missing
    /// from the list (or is themselves) become roots. Spans caught in a parent
    /// cycle are detached at the first one encountered and kept as a root so
    /// nothing is dropped.
    pub fn from_flat(spans: Vec<Span>) -> Self {
        let spans = lift_children(spans);

        let index_by_id: FxHashMap<&str, usize> = spans
            .iter()
            .enumerate()
            .map(|(idx, span)| (span.span_id.as_str(), idx))
            .collect();

        let mut children_of: Vec<Vec<usize>> = vec![Vec::new(); spans.len()];
        let mut root_indices = Vec::new();
        for (idx, span) in spans.iter().enumerate() {
            match span
                .parent_span_id
                .as_deref()
                .and_then(|parent| index_by_id.get(parent))
            {
                Some(&parent) if parent != idx => children_of[parent].push(idx),
                _ => root_indices.push(idx),
            }
        }
        drop(index_by_id);

        let mut visited = vec![false; spans.len()];
        let mut order: Vec<(usize, usize)> = Vec::with_capacity(spans.len());
        for idx in root_indices {
            walk(idx, &children_of, &mut visited, &mut order);
        }

        // Anything still unvisited sits in a parent cycle
        for idx in 0..spans.len() {
            if !visited[idx] {
                tracing::debug!(
                    span_id = %spans[idx].span_id,
                    "Span parent chain forms a cycle, promoting to root"
                );
                walk(idx, &children_of, &mut visited, &mut order);
            }
        }

        let mut slots: Vec<Option<Span>> = spans.into_iter().map(Some).collect();
        let mut linked = Vec::with_capacity(order.len());
        let mut depths = Vec::with_capacity(order.len());
        for (idx, depth) in order {
            if let Some(span) = slots[idx].take() {
                linked.push(span);
                depths.push(depth);
            }
        }

        Self {
            spans: linked,
            depths,
        }
    }

    /// Spans without a parent in this trace, in order.
    pub fn roots(&self) -> impl Iterator<Item = &Span> {
        self.iter_with_depth()
            .filter(|(depth, _)| *depth == 0)
            .map(|(_, span)| span)
    }

    /// Every span with its depth below its root (roots are at 0).
    pub fn iter_with_depth(&self) -> impl Iterator<Item = (usize, &Span)> {
        self.depths.iter().copied().zip(&self.spans)
    }

    /// Spans in pre-order: parents before children, siblings in order.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Borrowed pre-order view, ready for the executor.
    pub fn flatten(&self) -> Vec<&Span> {
        self.spans.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Find a span by `span_id`.
    pub fn find(&self, span_id: &str) -> Option<&Span> {
        self.spans.iter().find(|s| s.span_id == span_id)
    }
}

/// Move nested `children` into the list, in pre-order.
fn lift_children(spans: Vec<Span>) -> Vec<Span> {
    let mut flat = Vec::with_capacity(spans.len());
    let mut pending: Vec<Span> = spans.into_iter().rev().collect();
    while let Some(mut span) = pending.pop() {
        let children = std::mem::take(&mut span.children);
        for mut child in children.into_iter().rev() {
            if child.parent_span_id.is_none() {
                child.parent_span_id = Some(span.span_id.clone());
            }
            pending.push(child);
        }
        flat.push(span);
    }
    flat
}

/// Pre-order walk from `start`, appending `(index, depth)` pairs.
fn walk(
    start: usize,
    children_of: &[Vec<usize>],
    visited: &mut [bool],
    order: &mut Vec<(usize, usize)>,
) {
    let mut stack = vec![(start, 0)];
    while let Some((idx, depth)) = stack.pop() {
        if visited[idx] {
            continue;
        }
        visited[idx] = true;
        order.push((idx, depth));
        stack.extend(children_of[idx].iter().rev().map(|&child| (child, depth + 1)));
    }
}
