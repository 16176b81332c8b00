//! Typed, lockable, map-shaped records.
//!
//! Declare a named set of field descriptors ([`Property`]), build a
//! [`Schema`] from them, then construct validated [`Record`] instances from
//! keyword-style input. Records read like plain ordered mappings and go
//! straight into any serde encoder.
//!
//! Design goals:
//! - Per-field policy (kind, nullability, emptiness, default, rewritability)
//!   lives on the descriptor, shared by every record of the shape.
//! - One guarded assign: every post-construction write funnels through the
//!   same validation-and-lock check.
//! - Declaration faults surface at build time, before any record exists.
//! - Field order is declaration order, end to end: registry, record, output.

pub mod error;
pub mod property;
pub mod record;
pub mod schema;

pub use error::{Result, SchemaError};
pub use property::{Kind, Property};
pub use record::Record;
pub use schema::{Policy, Schema, SchemaBuilder};

// Re-exported for `schema!` macro expansion.
#[doc(hidden)]
pub use once_cell;
