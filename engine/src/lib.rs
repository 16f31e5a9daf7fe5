//! traceset: trace-to-dataset transforms
//!
//! Recorded LLM traces are trees of spans, each carrying a nested JSON
//! payload. A transform maps dataset columns to `(span_name, attribute_path)`
//! sources; executing it against one trace yields one flat dataset row.
//!
//! - [`domain::spans`] - span model and tree linking
//! - [`domain::transforms`] - definitions, executor, selector, builder, validation
//! - [`core`] - CLI, layered configuration and output rendering
//! - [`utils`] - JSON and file helpers

pub mod app;
pub mod core;
pub mod domain;
pub mod utils;

pub use domain::spans::{Span, SpanTree};
pub use domain::transforms::{
    ResolvedColumn, TransformColumn, TransformDefinition, TransformError, execute, execute_row,
};
