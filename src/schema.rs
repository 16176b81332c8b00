//! Schema declaration: a named, ordered set of field descriptors plus the
//! record-level policy flags.
//!
//! Two declaration paths produce the same thing:
//! - [`Schema::builder`] for shapes assembled at runtime from a mapping of
//!   field name to [`Property`];
//! - the [`schema!`] macro for shapes known at compile time, expanded to a
//!   compute-once `Lazy<Schema>` static.
//!
//! Declaration faults (duplicate or empty field names) surface eagerly at
//! [`SchemaBuilder::build`], before any record of the shape exists.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, SchemaError};
use crate::property::Property;
use crate::record::Record;

// ------------------------------- Policy ---------------------------------- //

/// Record-level flags, declared once per schema shape.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Policy {
    /// Accept undeclared input keys at all.
    pub allow_optional: bool,
    /// Additionally copy undeclared keys into the record, unvalidated.
    pub merge_optional: bool,
    /// Lock non-rewritable fields once the record is built.
    pub immutable: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            allow_optional: true,
            merge_optional: false,
            immutable: true,
        }
    }
}

// ------------------------------- Schema ----------------------------------- //

#[derive(Debug)]
struct Inner {
    name: String,
    fields: IndexMap<String, Property>,
    policy: Policy,
}

/// A declared record shape.
///
/// Cheap to clone: the name, field registry, and policy sit behind a shared
/// pointer. The registry is built exactly once at [`SchemaBuilder::build`]
/// and read-only afterwards, so records of one schema may be constructed
/// from any number of threads without locking.
#[derive(Debug, Clone)]
pub struct Schema {
    inner: Arc<Inner>,
}

impl Schema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: IndexMap::new(),
            policy: Policy::default(),
            fault: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn policy(&self) -> Policy {
        self.inner.policy
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.inner.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.fields.is_empty()
    }

    /// Declared descriptor for `field`, if any.
    pub fn field(&self, field: &str) -> Option<&Property> {
        self.inner.fields.get(field)
    }

    /// Declared (name, descriptor) pairs in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.inner.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Construct a validated record from keyword-style input.
    pub fn record(&self, input: Map<String, Value>) -> Result<Record> {
        Record::build(self, input)
    }

    /// Construct a record with no input: every field takes its default.
    pub fn record_default(&self) -> Result<Record> {
        self.record(Map::new())
    }

    /// Convenience for `json!`-style object literals. Non-object input fails
    /// the same way a mistyped field would.
    pub fn record_from_value(&self, input: Value) -> Result<Record> {
        match input {
            Value::Object(map) => self.record(map),
            other => Err(SchemaError::InvalidType {
                field: "input".to_string(),
                expected: format!("object for schema \"{}\"", self.name()),
                actual: crate::property::kind::json_type_name(&other),
                value: other,
            }),
        }
    }

    /// Structural conformance check: would `input` construct cleanly?
    ///
    /// Runs the per-field pipeline (absent keys take their defaults) and the
    /// unknown-key scan, committing nothing. This is also how a
    /// `Nested`-kinded field decides whether a value "is an instance of" its
    /// inner schema.
    pub fn validate_object(&self, input: &Map<String, Value>) -> Result<()> {
        for (name, property) in self.fields() {
            match input.get(name) {
                Some(value) => property.validate(name, value)?,
                None => property.validate(name, &property.default_value())?,
            }
        }
        if !self.inner.policy.allow_optional {
            for key in input.keys() {
                if !self.inner.fields.contains_key(key.as_str()) {
                    return Err(SchemaError::UnknownProperty {
                        schema: self.name().to_string(),
                        field: key.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

// ------------------------------- Builder ---------------------------------- //

/// Eagerly-checked schema builder. The first declaration fault is kept and
/// reported at [`SchemaBuilder::build`].
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: IndexMap<String, Property>,
    policy: Policy,
    fault: Option<String>,
}

impl SchemaBuilder {
    /// Declare `field` with `property`. Declaration order is kept and is the
    /// iteration order of every record of the shape.
    pub fn field(mut self, field: impl Into<String>, property: Property) -> Self {
        let field = field.into();
        if self.fault.is_none() {
            if field.is_empty() {
                self.fault = Some("field name is empty".to_string());
            } else if self.fields.contains_key(&field) {
                self.fault = Some(format!("field \"{field}\" is declared twice"));
            }
        }
        self.fields.insert(field, property);
        self
    }

    /// Declare every (name, descriptor) pair of a prebuilt mapping.
    pub fn fields<I, K>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Property)>,
        K: Into<String>,
    {
        for (field, property) in fields {
            self = self.field(field, property);
        }
        self
    }

    pub fn allow_optional(mut self, allow: bool) -> Self {
        self.policy.allow_optional = allow;
        self
    }

    pub fn merge_optional(mut self, merge: bool) -> Self {
        self.policy.merge_optional = merge;
        self
    }

    pub fn immutable(mut self, immutable: bool) -> Self {
        self.policy.immutable = immutable;
        self
    }

    pub fn build(self) -> Result<Schema> {
        if let Some(reason) = self.fault {
            return Err(SchemaError::Declaration {
                schema: self.name,
                reason,
            });
        }
        Ok(Schema {
            inner: Arc::new(Inner {
                name: self.name,
                fields: self.fields,
                policy: self.policy,
            }),
        })
    }
}

// -------------------------------- Macro ----------------------------------- //

/// Declare a schema shape as a compute-once static.
///
/// Expands to a `once_cell::sync::Lazy<Schema>` holding an explicit ordered
/// (name, descriptor) list, built on first access and shared by every use
/// afterwards. A malformed declaration panics at first access; use
/// [`Schema::builder`] directly when the fault should be a value.
///
/// Grammar:
///
/// ```text
/// schema! {
///     pub static PERSON: "Person" {
///         name: Property::string(),
///         age: Property::integer(),
///     }
/// }
/// ```
#[macro_export]
macro_rules! schema {
    (
        $(#[$meta:meta])*
        $vis:vis static $ident:ident : $name:literal {
            $($field:ident : $property:expr),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis static $ident: $crate::once_cell::sync::Lazy<$crate::Schema> =
            $crate::once_cell::sync::Lazy::new(|| {
                $crate::Schema::builder($name)
                    $(.field(stringify!($field), $property))*
                    .build()
                    .unwrap_or_else(|e| panic!("schema declaration failed: {e}"))
            });
    };
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::property::Kind;

    #[test]
    fn builder_keeps_declaration_order() {
        let s = Schema::builder("S")
            .field("name", Property::string())
            .field("age", Property::integer())
            .field("tags", Property::string_array())
            .build()
            .unwrap();
        let names: Vec<&str> = s.fields().map(|(n, _)| n).collect();
        assert_eq!(names, ["name", "age", "tags"]);
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn builder_flags_are_readable_back() {
        let s = Schema::builder("S")
            .allow_optional(false)
            .merge_optional(true)
            .immutable(false)
            .field("v", Property::string())
            .build()
            .unwrap();
        let policy = s.policy();
        assert!(!policy.allow_optional);
        assert!(policy.merge_optional);
        assert!(!policy.immutable);
    }

    #[test]
    fn default_flags() {
        let policy = Schema::builder("S").build().unwrap().policy();
        assert!(policy.allow_optional);
        assert!(!policy.merge_optional);
        assert!(policy.immutable);
    }

    #[test]
    fn duplicate_field_fails_at_build() {
        let err = Schema::builder("S")
            .field("v", Property::string())
            .field("v", Property::integer())
            .build()
            .unwrap_err();
        match err {
            SchemaError::Declaration { schema, reason } => {
                assert_eq!(schema, "S");
                assert!(reason.contains("declared twice"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_field_name_fails_at_build() {
        let err = Schema::builder("S")
            .field("", Property::string())
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::Declaration { .. }));
    }

    #[test]
    fn fields_accepts_a_prebuilt_mapping() {
        let mut declared = IndexMap::new();
        declared.insert("v1".to_string(), Property::string());
        declared.insert("v2".to_string(), Property::integer());
        let s = Schema::builder("S").fields(declared).build().unwrap();
        assert!(matches!(s.field("v1").unwrap().kind(), Kind::String));
        assert!(matches!(s.field("v2").unwrap().kind(), Kind::Integer));
    }

    #[test]
    fn validate_object_defaults_absent_fields() {
        let s = Schema::builder("S")
            .field("name", Property::string())
            .field("age", Property::integer())
            .build()
            .unwrap();
        // name defaults to null (nullable), age to 0.
        s.validate_object(&Map::new()).unwrap();
    }

    #[test]
    fn validate_object_enforces_non_nullable_defaults() {
        let s = Schema::builder("S")
            .field("v", Property::required_string())
            .build()
            .unwrap();
        let err = s.validate_object(&Map::new()).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidValue { .. }));
    }

    #[test]
    fn validate_object_flags_unknown_keys_when_disallowed() {
        let s = Schema::builder("S")
            .allow_optional(false)
            .field("name", Property::string())
            .build()
            .unwrap();
        let input = match json!({"name": "x", "extra": 1}) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        let err = s.validate_object(&input).unwrap_err();
        match err {
            SchemaError::UnknownProperty { schema, field } => {
                assert_eq!(schema, "S");
                assert_eq!(field, "extra");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn record_from_value_rejects_non_objects() {
        let s = Schema::builder("S").build().unwrap();
        let err = s.record_from_value(json!(1234)).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidType { .. }));
    }

    schema! {
        /// Static declaration path used by the tests below.
        static CONTACT: "Contact" {
            name: Property::string(),
            age: Property::integer(),
        }
    }

    #[test]
    fn static_declaration_builds_records() {
        let rec = CONTACT
            .record_from_value(json!({"name": "test", "age": 15}))
            .unwrap();
        assert_eq!(rec["name"], json!("test"));
        assert_eq!(rec["age"], json!(15));
    }

    #[test]
    fn static_declaration_is_computed_once() {
        let first: &Schema = &CONTACT;
        let second: &Schema = &CONTACT;
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.name(), "Contact");
    }
}
