//! Persisted JSON shapes of a transform definition
//!
//! Two shapes exist for the same content:
//!
//! ```json
//! { "columns":   [ { "column_name": "t",   "span_name": "...", "attribute_path": "...", "fallback": ... } ] }
//! { "variables": [ { "variable_name": "t", "span_name": "...", "attribute_path": "...", "fallback": ... } ] }
//! ```
//!
//! Both convert to one canonical [`TransformDefinition`]. A payload with
//! neither array (or a `null` array) reads as zero columns so the validator
//! can report it.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::definition::{TransformColumn, TransformDefinition};
use super::error::TransformError;

const COLUMNS_KEY: &str = "columns";
const VARIABLES_KEY: &str = "variables";

/// Which persisted shape to produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WireShape {
    #[default]
    Columns,
    Variables,
}

impl fmt::Display for WireShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireShape::Columns => write!(f, "columns"),
            WireShape::Variables => write!(f, "variables"),
        }
    }
}

/// Historical per-entry shape using `variable_name`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableWire {
    #[serde(default)]
    pub variable_name: String,
    #[serde(default)]
    pub span_name: String,
    #[serde(default)]
    pub attribute_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<JsonValue>,
}

impl From<VariableWire> for TransformColumn {
    fn from(v: VariableWire) -> Self {
        Self {
            column_name: v.variable_name,
            span_name: v.span_name,
            attribute_path: v.attribute_path,
            fallback: v.fallback,
        }
    }
}

impl From<&TransformColumn> for VariableWire {
    fn from(c: &TransformColumn) -> Self {
        Self {
            variable_name: c.column_name.clone(),
            span_name: c.span_name.clone(),
            attribute_path: c.attribute_path.clone(),
            fallback: c.fallback.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ColumnsPayload {
    #[serde(default)]
    columns: Option<Vec<TransformColumn>>,
}

#[derive(Debug, Default, Deserialize)]
struct VariablesPayload {
    #[serde(default)]
    variables: Option<Vec<VariableWire>>,
}

/// A transform definition in one of its persisted shapes
#[derive(Debug, Clone, PartialEq)]
pub enum TransformWire {
    Columns(Vec<TransformColumn>),
    Variables(Vec<VariableWire>),
}

impl TransformWire {
    /// Detect the shape by key. `columns` wins when both are present.
    pub fn from_value(value: JsonValue) -> Result<Self, TransformError> {
        let JsonValue::Object(ref map) = value else {
            return Err(TransformError::invalid_definition(format!(
                "expected a JSON object, found {}",
                json_type_name(&value)
            )));
        };

        if map.contains_key(COLUMNS_KEY) || !map.contains_key(VARIABLES_KEY) {
            let payload: ColumnsPayload = serde_json::from_value(value)?;
            Ok(Self::Columns(payload.columns.unwrap_or_default()))
        } else {
            tracing::trace!("Reading transform in variables shape");
            let payload: VariablesPayload = serde_json::from_value(value)?;
            Ok(Self::Variables(payload.variables.unwrap_or_default()))
        }
    }

    pub fn from_definition(definition: &TransformDefinition, shape: WireShape) -> Self {
        match shape {
            WireShape::Columns => Self::Columns(definition.columns.clone()),
            WireShape::Variables => {
                Self::Variables(definition.columns.iter().map(VariableWire::from).collect())
            }
        }
    }

    pub fn shape(&self) -> WireShape {
        match self {
            Self::Columns(_) => WireShape::Columns,
            Self::Variables(_) => WireShape::Variables,
        }
    }

    pub fn into_columns(self) -> Vec<TransformColumn> {
        match self {
            Self::Columns(columns) => columns,
            Self::Variables(variables) => variables.into_iter().map(TransformColumn::from).collect(),
        }
    }

    pub fn into_value(self) -> JsonValue {
        let (key, entries) = match self {
            Self::Columns(columns) => (COLUMNS_KEY, serialize_entries(&columns)),
            Self::Variables(variables) => (VARIABLES_KEY, serialize_entries(&variables)),
        };
        let mut map = serde_json::Map::new();
        map.insert(key.to_string(), JsonValue::Array(entries));
        JsonValue::Object(map)
    }
}

fn serialize_entries<T: Serialize>(entries: &[T]) -> Vec<JsonValue> {
    // Plain structs of strings and Values always serialize
    entries
        .iter()
        .filter_map(|entry| serde_json::to_value(entry).ok())
        .collect()
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_columns_shape() {
        let wire = TransformWire::from_value(json!({
            "columns": [{"column_name": "t", "span_name": "Weather", "attribute_path": "temp"}]
        }))
        .unwrap();

        assert_eq!(wire.shape(), WireShape::Columns);
        let columns = wire.into_columns();
        assert_eq!(columns, vec![TransformColumn::new("t", "Weather", "temp")]);
    }

    #[test]
    fn test_variables_shape() {
        let wire = TransformWire::from_value(json!({
            "variables": [{
                "variable_name": "t",
                "span_name": "Weather",
                "attribute_path": "temp",
                "fallback": "unknown"
            }]
        }))
        .unwrap();

        assert_eq!(wire.shape(), WireShape::Variables);
        let columns = wire.into_columns();
        assert_eq!(columns[0].column_name, "t");
        assert_eq!(columns[0].fallback, Some(json!("unknown")));
    }

    #[test]
    fn test_both_shapes_produce_same_definition() {
        let from_columns = TransformDefinition::from_value(json!({
            "columns": [{"column_name": "a", "span_name": "S", "attribute_path": "x", "fallback": 1}]
        }))
        .unwrap();
        let from_variables = TransformDefinition::from_value(json!({
            "variables": [{"variable_name": "a", "span_name": "S", "attribute_path": "x", "fallback": 1}]
        }))
        .unwrap();

        assert_eq!(from_columns, from_variables);
    }

    #[test]
    fn test_columns_preferred_when_both_present() {
        let wire = TransformWire::from_value(json!({
            "columns": [],
            "variables": [{"variable_name": "v", "span_name": "S", "attribute_path": "x"}]
        }))
        .unwrap();
        assert_eq!(wire.shape(), WireShape::Columns);
    }

    #[test]
    fn test_missing_or_null_array_is_zero_columns() {
        assert!(TransformDefinition::from_value(json!({})).unwrap().is_empty());
        assert!(TransformDefinition::from_value(json!({"columns": null})).unwrap().is_empty());
        assert!(TransformDefinition::from_value(json!({"variables": null})).unwrap().is_empty());
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let definition =
            TransformDefinition::from_value(json!({"columns": [{"column_name": "t"}]})).unwrap();
        assert_eq!(definition.columns[0].span_name, "");
        assert_eq!(definition.columns[0].attribute_path, "");
    }

    #[test]
    fn test_non_object_is_rejected() {
        let err = TransformDefinition::from_value(json!([1, 2])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid transform definition: expected a JSON object, found array"
        );
    }

    #[test]
    fn test_wrong_field_type_is_invalid_json() {
        let err = TransformDefinition::from_value(json!({"columns": "nope"})).unwrap_err();
        assert!(matches!(err, TransformError::InvalidJson(_)));
    }

    #[test]
    fn test_write_variables_shape() {
        let definition = TransformDefinition::new(vec![
            TransformColumn::new("t", "Weather", "temp").with_fallback("unknown"),
        ]);

        assert_eq!(
            definition.to_wire(WireShape::Variables),
            json!({"variables": [{
                "variable_name": "t",
                "span_name": "Weather",
                "attribute_path": "temp",
                "fallback": "unknown"
            }]})
        );
        assert_eq!(
            definition.to_wire(WireShape::Columns),
            serde_json::to_value(&definition).unwrap()
        );
    }

    #[test]
    fn test_wire_shape_serde_and_display() {
        assert_eq!(
            serde_json::from_str::<WireShape>(r#""variables""#).unwrap(),
            WireShape::Variables
        );
        assert_eq!(WireShape::Columns.to_string(), "columns");
        assert_eq!(WireShape::default(), WireShape::Columns);
    }
}
