//! Canonical schema model and the builder that folds statements into it.

mod builder;
mod snapshot;

pub use builder::{build_schema, SchemaBuilder};
pub use snapshot::{
    CheckConstraint, Column, ForeignKey, Index, PrimaryKey, SchemaSnapshot, Table, View,
};
