//! Field descriptors: per-field type, nullability, emptiness, default, and
//! rewritability policy.
//!
//! A [`Property`] describes a field, never a value. Validation runs a fixed
//! pipeline: null gate → emptiness policy → kind check → (arrays) element
//! checks. An accepted null stops the pipeline; nothing downstream sees it.

pub mod kind;

use serde_json::Value;

use crate::error::{Result, SchemaError};
use crate::schema::Schema;

pub use kind::Kind;

// ------------------------------- Policy ---------------------------------- //

/// Emptiness is type-appropriate: `""`, `[]`, `{}`. Numbers and bools are
/// never empty, so an `allow_empty=false` integer field still accepts `0`.
fn is_empty_value(v: &Value) -> bool {
    match v {
        Value::String(s) => s.is_empty(),
        Value::Array(xs) => xs.is_empty(),
        Value::Object(m) => m.is_empty(),
        _ => false,
    }
}

/// Outcome of the null gate: `Done` means the value was an accepted null and
/// no later stage may run; `Continue` hands off to the kind check.
enum Gate {
    Done,
    Continue,
}

// ----------------------------- Descriptor --------------------------------- //

/// A field descriptor: kind plus policy, shared by every record of the
/// owning schema.
///
/// Descriptors are immutable once attached to a built [`Schema`]; the
/// policy builders (including the one-shot [`Property::rewritable`] toggle)
/// consume `self`, so they can only run during declaration.
#[derive(Debug, Clone)]
pub struct Property {
    kind: Kind,
    nullable: bool,
    allow_empty: bool,
    default: Value,
    rewritable: bool,
}

impl Property {
    fn new(kind: Kind, nullable: bool, allow_empty: bool, default: Value) -> Self {
        Self { kind, nullable, allow_empty, default, rewritable: false }
    }

    // ---- one constructor per declarable variant ----

    /// Text; nullable, may be empty, defaults to null.
    pub fn string() -> Self {
        Self::new(Kind::String, true, true, Value::Null)
    }

    /// Text that must be present and non-empty.
    pub fn required_string() -> Self {
        Self::new(Kind::String, false, false, Value::Null)
    }

    /// Whole number carried as i64; non-nullable, defaults to `0`.
    pub fn integer() -> Self {
        Self::new(Kind::Integer, false, true, Value::from(0))
    }

    /// f64 number; non-nullable, defaults to `0.0`.
    pub fn float() -> Self {
        Self::new(Kind::Float, false, true, Value::from(0.0))
    }

    /// Non-nullable, defaults to `false`.
    pub fn boolean() -> Self {
        Self::new(Kind::Bool, false, true, Value::Bool(false))
    }

    /// Value must be an object conforming to `schema`.
    pub fn nested(schema: Schema) -> Self {
        Self::new(Kind::Nested(schema), true, true, Value::Null)
    }

    /// Ordered sequence whose every element matches `element`; defaults to
    /// `[]`.
    pub fn array_of(element: Kind) -> Self {
        Self::new(Kind::array(element), true, true, Value::Array(Vec::new()))
    }

    /// Alias of [`Property::array_of`]: the value model has a single
    /// ordered-sequence type.
    pub fn list_of(element: Kind) -> Self {
        Self::array_of(element)
    }

    /// Alias of [`Property::array_of`]: the value model has a single
    /// ordered-sequence type.
    pub fn tuple_of(element: Kind) -> Self {
        Self::array_of(element)
    }

    // element-typed array shortcuts

    pub fn string_array() -> Self {
        Self::array_of(Kind::String)
    }

    pub fn int_array() -> Self {
        Self::array_of(Kind::Integer)
    }

    pub fn float_array() -> Self {
        Self::array_of(Kind::Float)
    }

    pub fn bool_array() -> Self {
        Self::array_of(Kind::Bool)
    }

    // ---- policy builders, chainable by value ----

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = default;
        self
    }

    /// One-shot toggle: keep the field writable after its record locks.
    pub fn rewritable(mut self) -> Self {
        self.rewritable = true;
        self
    }

    // ---- accessors ----

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn allows_empty(&self) -> bool {
        self.allow_empty
    }

    pub fn is_rewritable(&self) -> bool {
        self.rewritable
    }

    /// The field default, cloned fresh on every call. An unset default is
    /// plain null; a present container default is deep-copied per access, so
    /// two records built without the field never share one container.
    pub fn default_value(&self) -> Value {
        self.default.clone()
    }

    // ---- validation ----

    /// Validate `value` for field `field`. Policy, in order: null gate,
    /// emptiness, kind, elements. Pure: same inputs, same outcome.
    pub fn validate(&self, field: &str, value: &Value) -> Result<()> {
        match self.gate(field, value)? {
            Gate::Done => Ok(()),
            Gate::Continue => self.kind.check(field, value),
        }
    }

    fn gate(&self, field: &str, value: &Value) -> Result<Gate> {
        if value.is_null() {
            if !self.nullable {
                return Err(SchemaError::InvalidValue {
                    field: field.to_string(),
                    reason: "is not nullable",
                });
            }
            return Ok(Gate::Done);
        }
        if !self.allow_empty && is_empty_value(value) {
            return Err(SchemaError::InvalidValue {
                field: field.to_string(),
                reason: "should be a non-empty value",
            });
        }
        Ok(Gate::Continue)
    }
}

// ------------------------------- Tests ------------------------------------ //
