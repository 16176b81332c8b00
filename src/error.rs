//! Error types for schema declaration, record construction, and writes.

use serde_json::Value;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Every way a declaration, construction, or write can fail.
///
/// All variants are local, deterministic validation failures: they surface
/// synchronously from the call that caused them and are never retried.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Value's runtime shape does not match the declared kind.
    #[error("\"{field}\"={value} must be {expected}, but got {actual}")]
    InvalidType {
        field: String,
        expected: String,
        value: Value,
        actual: &'static str,
    },

    /// Value violates the field's nullability or emptiness policy.
    #[error("\"{field}\" {reason}")]
    InvalidValue { field: String, reason: &'static str },

    /// Input carries a key the schema does not declare while undeclared keys
    /// are disallowed.
    #[error("<{schema}> unknown property \"{field}\"")]
    UnknownProperty { schema: String, field: String },

    /// Write attempt on a locked, non-rewritable field.
    #[error("\"{field}\" is not rewritable once the record is built")]
    NotRewritable { field: String },

    /// The schema declaration itself is malformed. Raised eagerly at build
    /// time, before any record of the shape exists.
    #[error("schema \"{schema}\": {reason}")]
    Declaration { schema: String, reason: String },
}
