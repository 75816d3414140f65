//! Schema comparison.
//!
//! [`diff`] compares two [`SchemaSnapshot`](crate::schema::SchemaSnapshot)s
//! and returns an ordered list of dialect-independent [`SchemaOp`]s. The
//! generators in [`crate::generator`] turn those operations into DDL.

mod differ;
mod operation;

pub use differ::diff;
pub use operation::SchemaOp;
