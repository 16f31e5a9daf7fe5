//! Domain logic for trace-to-dataset transforms
//!
//! - `spans` - span model and parent/child tree
//! - `transforms` - column definitions, executor, selector and builder

pub mod spans;
pub mod transforms;

pub use spans::{Span, SpanTree};
pub use transforms::{ResolvedColumn, TransformDefinition, TransformError, execute};
