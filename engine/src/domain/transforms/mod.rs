//! Trace-to-Dataset Transforms
//!
//! A transform is an ordered list of columns. Each column names a span (by
//! its human-assigned name) and an attribute path inside that span's payload.
//! Executing a transform against one trace's spans yields one flat row.
//!
//! # Core Types
//!
//! - [`TransformDefinition`] / [`TransformColumn`] - the column mapping
//! - [`ResolvedColumn`] - executor output for one column
//! - [`TransformWire`] - the two accepted payload shapes (`columns`, `variables`)
//!
//! # Building
//!
//! - [`SpanSelector`] - navigate a span's payload and pick a value
//! - [`TransformBuilder`] - turn picks into a definition
//! - [`validate`] - structural checks before saving
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use traceset::domain::spans::Span;
//! use traceset::domain::transforms::{TransformColumn, TransformDefinition, execute};
//!
//! let spans = vec![Span::new("s1", "Weather", json!({"temp": 72}))];
//! let definition = TransformDefinition::new(vec![
//!     TransformColumn::new("t", "Weather", "temp").with_fallback("unknown"),
//! ]);
//!
//! let row = execute(&spans, &definition);
//! assert_eq!(row[0].value, "72");
//! ```

// ============================================================================
// MODULES
// ============================================================================

pub mod builder;
pub mod definition;
pub mod error;
pub mod executor;
pub mod path;
pub mod selector;
pub mod validate;
pub mod wire;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use builder::{PickedColumn, TransformBuilder, build_from_columns};
pub use definition::{TransformColumn, TransformDefinition, parse_fallback};
pub use error::TransformError;
pub use executor::{DatasetRow, ResolvedColumn, SpanMatch, execute, execute_row, resolve_column};
pub use path::{LeafPath, SpanPathSplit, leaf_paths, resolve_value, split_path_by_span_name};
pub use selector::{NavigationState, PickedValue, Rehydrated, SelectorEntry, SpanSelector};
pub use validate::validate;
pub use wire::{TransformWire, VariableWire, WireShape};
