//! Structural validation of transform definitions
//!
//! Every rule is checked so a form can show all problems at once. The one
//! exception is an empty definition, which yields a single message.

use rustc_hash::FxHashMap;

use super::definition::TransformDefinition;

pub const EMPTY_TRANSFORM: &str = "Transform must have at least one column";

/// List every structural problem in `definition`; empty means valid.
pub fn validate(definition: &TransformDefinition) -> Vec<String> {
    if definition.columns.is_empty() {
        return vec![EMPTY_TRANSFORM.to_string()];
    }

    let mut errors = Vec::new();
    let mut occurrences: FxHashMap<&str, usize> = FxHashMap::default();

    for (idx, column) in definition.columns.iter().enumerate() {
        let position = idx + 1;
        let name = column.column_name.trim();

        if name.is_empty() {
            errors.push(format!("Column {position}: column name is required"));
        } else {
            let seen = occurrences.entry(name).or_insert(0);
            *seen += 1;
            // Report each duplicated name once, at its second occurrence
            if *seen == 2 {
                errors.push(format!("Duplicate column name \"{name}\""));
            }
        }

        if column.span_name.trim().is_empty() {
            errors.push(format!("Column {position}: span name is required"));
        }
        if column.attribute_path.trim().is_empty() {
            errors.push(format!("Column {position}: attribute path is required"));
        }
    }

    if !errors.is_empty() {
        tracing::debug!(errors = errors.len(), "Transform definition is invalid");
    }
    errors
}
