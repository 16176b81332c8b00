//! Validated, map-shaped record instances.
//!
//! A [`Record`] is an ordered mapping from field name to validated value:
//! declared fields first, in declaration order, merged optional keys after.
//! Every post-construction write funnels through one guarded assign
//! ([`Record::set`]) that checks the lock state, then validates, then
//! stores. Reads are plain map reads.

use std::ops::Index;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{Result, SchemaError};
use crate::schema::Schema;

/// A constructed schema instance.
///
/// Lifecycle: constructing (writes always permitted, validation active) →
/// unlocked (schema declared `immutable=false`; terminal) or locked
/// (terminal). A locked record accepts writes only on fields marked
/// rewritable. There is no way back from locked.
///
/// Locked records are safe to read from any number of threads; mutation
/// needs `&mut` and any cross-thread sharing of that is the caller's
/// synchronization problem.
#[derive(Debug, Clone)]
pub struct Record {
    schema: Schema,
    values: Map<String, Value>,
    locked: bool,
}

impl Record {
    /// Construction pipeline: per declared field in declaration order, take
    /// the input value or the field default, validate, store. Then apply the
    /// optional-key policy and the lock transition. Construction-time writes
    /// bypass the write guard; on failure only the error escapes, never a
    /// partially-filled record.
    pub(crate) fn build(schema: &Schema, input: Map<String, Value>) -> Result<Self> {
        let policy = schema.policy();
        let mut values = Map::new();

        for (name, property) in schema.fields() {
            let value = match input.get(name) {
                Some(v) => v.clone(),
                None => property.default_value(),
            };
            property.validate(name, &value)?;
            values.insert(name.to_string(), value);
        }

        if policy.merge_optional || !policy.allow_optional {
            for (key, value) in &input {
                if schema.field(key).is_none() {
                    if !policy.allow_optional {
                        return Err(SchemaError::UnknownProperty {
                            schema: schema.name().to_string(),
                            field: key.clone(),
                        });
                    }
                    // merge_optional: copied in verbatim, unvalidated.
                    values.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(Self {
            schema: schema.clone(),
            values,
            locked: policy.immutable,
        })
    }

    // ------------------------------ Reads ---------------------------------- //

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    /// (name, value) pairs: declared fields in declaration order, then any
    /// merged optional keys.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// The plain ordered-mapping view, ready for any encoder.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }

    // ------------------------------ Writes --------------------------------- //

    /// The single guarded assign.
    ///
    /// Declared field: locked and not rewritable fails with `NotRewritable`;
    /// otherwise the value is validated exactly as at construction, then
    /// stored. Undeclared key: always `NotRewritable` on a locked record;
    /// on an unlocked one it follows the schema's optional-key policy
    /// (`UnknownProperty` when undeclared keys are disallowed, stored
    /// verbatim otherwise).
    pub fn set(&mut self, field: &str, value: Value) -> Result<()> {
        match self.schema.field(field) {
            Some(property) => {
                if self.locked && !property.is_rewritable() {
                    return Err(SchemaError::NotRewritable {
                        field: field.to_string(),
                    });
                }
                property.validate(field, &value)?;
                self.values.insert(field.to_string(), value);
                Ok(())
            }
            None => {
                if self.locked {
                    return Err(SchemaError::NotRewritable {
                        field: field.to_string(),
                    });
                }
                if !self.schema.policy().allow_optional {
                    return Err(SchemaError::UnknownProperty {
                        schema: self.schema.name().to_string(),
                        field: field.to_string(),
                    });
                }
                self.values.insert(field.to_string(), value);
                Ok(())
            }
        }
    }

    /// Bulk update through [`Record::set`], in the input's iteration order.
    ///
    /// A failure partway leaves the keys already applied in this call
    /// written; there is no rollback.
    pub fn merge<I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        for (field, value) in entries {
            self.set(&field, value)?;
        }
        Ok(())
    }
}

/// Dict-style read: panics when the field is absent, like indexing a map.
impl Index<&str> for Record {
    type Output = Value;

    fn index(&self, field: &str) -> &Value {
        match self.values.get(field) {
            Some(v) => v,
            None => panic!("record has no field \"{field}\""),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl PartialEq<Value> for Record {
    fn eq(&self, other: &Value) -> bool {
        other.as_object() == Some(&self.values)
    }
}

// ------------------------------- Tests ------------------------------------ //
