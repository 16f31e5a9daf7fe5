//! Transform Definition
//!
//! The persisted, declarative mapping from dataset columns to span/attribute
//! sources. One canonical in-memory representation; the two persisted JSON
//! shapes are handled by [`super::wire`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

use super::error::TransformError;
use super::validate;
use super::wire::{TransformWire, WireShape};
use crate::utils::json::non_null;

/// One output column: where its value comes from and what to use if absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformColumn {
    #[serde(default)]
    pub column_name: String,
    #[serde(default)]
    pub span_name: String,
    #[serde(default)]
    pub attribute_path: String,
    /// Never `Some(Value::Null)`; a `null` fallback reads as absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<JsonValue>,
}

impl TransformColumn {
    pub fn new(
        column_name: impl Into<String>,
        span_name: impl Into<String>,
        attribute_path: impl Into<String>,
    ) -> Self {
        Self {
            column_name: column_name.into(),
            span_name: span_name.into(),
            attribute_path: attribute_path.into(),
            fallback: None,
        }
    }

    /// Set the fallback, normalizing `null` to "no fallback".
    pub fn with_fallback(mut self, fallback: impl Into<JsonValue>) -> Self {
        self.fallback = non_null(Some(fallback.into()));
        self
    }

    /// Combined `<span_name>.<attribute_path>` form used by pickers.
    pub fn path(&self) -> String {
        format!("{}.{}", self.span_name, self.attribute_path)
    }
}

/// Ordered column definitions. Order is presentation order of the row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransformDefinition {
    pub columns: Vec<TransformColumn>,
}

impl TransformDefinition {
    pub fn new(columns: Vec<TransformColumn>) -> Self {
        let mut definition = Self { columns };
        definition.normalize();
        definition
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.column_name.as_str())
    }

    /// Every structural problem, empty when valid.
    pub fn validate(&self) -> Vec<String> {
        validate::validate(self)
    }

    /// `self` when valid, otherwise [`TransformError::Validation`].
    pub fn validated(self) -> Result<Self, TransformError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(TransformError::Validation(errors))
        }
    }

    /// Parse either persisted shape from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, TransformError> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse either persisted shape from a JSON value.
    pub fn from_value(value: JsonValue) -> Result<Self, TransformError> {
        TransformWire::from_value(value).map(Self::from)
    }

    /// Render in the persisted shape the storage collaborator expects.
    pub fn to_wire(&self, shape: WireShape) -> JsonValue {
        TransformWire::from_definition(self, shape).into_value()
    }

    fn normalize(&mut self) {
        for column in &mut self.columns {
            column.fallback = non_null(column.fallback.take());
        }
    }
}

impl From<TransformWire> for TransformDefinition {
    fn from(wire: TransformWire) -> Self {
        Self::new(wire.into_columns())
    }
}

impl<'de> Deserialize<'de> for TransformDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// Parse fallback text typed by a user.
///
/// Blank input and `null` mean "no fallback". Anything else must be valid
/// JSON (`"unknown"`, `0`, `[]`, ...).
pub fn parse_fallback(input: &str) -> Result<Option<JsonValue>, TransformError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(|value| non_null(Some(value)))
        .map_err(|e| TransformError::InvalidFallback(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_fallback_is_absent() {
        let column = TransformColumn::new("t", "Weather", "temp").with_fallback(JsonValue::Null);
        assert_eq!(column.fallback, None);

        let definition = TransformDefinition::new(vec![TransformColumn {
            fallback: Some(JsonValue::Null),
            ..TransformColumn::new("t", "Weather", "temp")
        }]);
        assert_eq!(definition.columns[0].fallback, None);
    }

    #[test]
    fn test_falsy_fallbacks_are_kept() {
        let column = TransformColumn::new("t", "Weather", "temp").with_fallback(0);
        assert_eq!(column.fallback, Some(json!(0)));

        let column = TransformColumn::new("t", "Weather", "temp").with_fallback("");
        assert_eq!(column.fallback, Some(json!("")));
    }

    #[test]
    fn test_serialize_omits_absent_fallback() {
        let definition =
            TransformDefinition::new(vec![TransformColumn::new("t", "Weather", "temp")]);
        assert_eq!(
            serde_json::to_value(&definition).unwrap(),
            json!({"columns": [{"column_name": "t", "span_name": "Weather", "attribute_path": "temp"}]})
        );
    }

    #[test]
    fn test_deserialize_through_serde() {
        let definition: TransformDefinition = serde_json::from_value(json!({
            "columns": [{"column_name": "t", "span_name": "W", "attribute_path": "a", "fallback": null}]
        }))
        .unwrap();
        assert_eq!(definition.len(), 1);
        assert_eq!(definition.columns[0].fallback, None);
    }

    #[test]
    fn test_validated_rejects_empty() {
        let err = TransformDefinition::default().validated().unwrap_err();
        assert_eq!(
            err.validation_errors(),
            ["Transform must have at least one column".to_string()]
        );
    }

    #[test]
    fn test_column_path() {
        let column = TransformColumn::new("t", "A.B", "x.y");
        assert_eq!(column.path(), "A.B.x.y");
    }

    #[test]
    fn test_parse_fallback() {
        assert_eq!(parse_fallback("").unwrap(), None);
        assert_eq!(parse_fallback("   ").unwrap(), None);
        assert_eq!(parse_fallback("null").unwrap(), None);
        assert_eq!(parse_fallback(r#""unknown""#).unwrap(), Some(json!("unknown")));
        assert_eq!(parse_fallback("42").unwrap(), Some(json!(42)));
        assert_eq!(parse_fallback(r#"{"a": 1}"#).unwrap(), Some(json!({"a": 1})));
    }

    #[test]
    fn test_parse_fallback_invalid_json() {
        let err = parse_fallback("unknown").unwrap_err();
        assert!(matches!(err, TransformError::InvalidFallback(_)));
    }
}
