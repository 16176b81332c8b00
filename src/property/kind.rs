//! The closed tree of declarable field kinds and their shape checks.

use serde_json::Value;

use crate::error::{Result, SchemaError};
use crate::schema::Schema;

/// What shape a field's value must have.
///
/// The numeric kinds are exact: `Integer` takes whole numbers carried as
/// i64/u64, `Float` takes numbers carried as f64, and neither admits the
/// other's literals.
#[derive(Debug, Clone)]
pub enum Kind {
    String,
    Integer,
    Float,
    Bool,
    /// Object structurally conforming to the given schema.
    Nested(Schema),
    /// Ordered sequence; every element must match the element kind.
    Array(Box<Kind>),
}

impl Kind {
    /// Boxing constructor for array kinds.
    pub fn array(element: Kind) -> Self {
        Kind::Array(Box::new(element))
    }

    /// Human-readable name used in error text.
    pub fn name(&self) -> String {
        match self {
            Kind::String => "string".to_string(),
            Kind::Integer => "integer".to_string(),
            Kind::Float => "float".to_string(),
            Kind::Bool => "bool".to_string(),
            Kind::Nested(schema) => format!("nested<{}>", schema.name()),
            Kind::Array(element) => format!("array<{}>", element.name()),
        }
    }

    /// Shape check for `value`; arrays check every element, first mismatch
    /// wins and is reported as `field[index]`.
    pub(crate) fn check(&self, field: &str, value: &Value) -> Result<()> {
        match self {
            Kind::String if value.is_string() => Ok(()),
            Kind::Integer if is_integer(value) => Ok(()),
            Kind::Float if is_float(value) => Ok(()),
            Kind::Bool if value.is_boolean() => Ok(()),
            Kind::Nested(schema) => match value.as_object() {
                Some(map) => schema.validate_object(map),
                None => Err(self.mismatch(field, value)),
            },
            Kind::Array(element) => match value.as_array() {
                Some(items) => {
                    for (i, item) in items.iter().enumerate() {
                        element.check(&format!("{field}[{i}]"), item)?;
                    }
                    Ok(())
                }
                None => Err(self.mismatch(field, value)),
            },
            _ => Err(self.mismatch(field, value)),
        }
    }

    fn mismatch(&self, field: &str, value: &Value) -> SchemaError {
        SchemaError::InvalidType {
            field: field.to_string(),
            expected: self.name(),
            value: value.clone(),
            actual: json_type_name(value),
        }
    }
}

fn is_integer(v: &Value) -> bool {
    matches!(v, Value::Number(n) if n.is_i64() || n.is_u64())
}

fn is_float(v: &Value) -> bool {
    matches!(v, Value::Number(n) if n.is_f64())
}

/// JSON-level type name of a value, for diagnostics.
pub(crate) fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
