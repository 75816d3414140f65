//! Declarative schema migrations.
//!
//! `schemadef` keeps a database in sync with a schema file: instead of
//! writing migrations by hand, operators edit the desired `CREATE TABLE`
//! statements and let the tool compute and run the difference.
//!
//! # Architecture
//!
//! - **Adapter** - Dumps the live schema as DDL and runs statements
//! - **Executor** - Applies the computed DDL in a single transaction
//! - **Harness** - Checks migrations for idempotence from YAML test cases
//!
//! The parsing, diffing and DDL generation live in `schemadef-core`.
//!
//! # Example
//!
//! ```rust,ignore
//! use schemadef::prelude::*;
//!
//! let adapter = SqliteAdapter::connect("sqlite:app.db").await?;
//! let migrator = Migrator::new(adapter);
//! let ddls = migrator
//!     .apply("CREATE TABLE users (id integer PRIMARY KEY, name text);")
//!     .await?;
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Migrate a database to the schema in schema.sql
//! schemadef --database sqlite:app.db apply --file schema.sql
//!
//! # Print the live schema
//! schemadef --database sqlite:app.db export
//!
//! # Diff two schema files offline
//! schemadef diff --dialect postgres --desired schema.sql --current dump.sql
//! ```

pub mod adapter;
pub mod error;
pub mod executor;
pub mod harness;
pub mod sqlite;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::adapter::{generate_ddls, split_ddls, DatabaseAdapter};
    pub use crate::error::{Result, SchemadefError};
    pub use crate::executor::Migrator;
    pub use crate::sqlite::SqliteAdapter;
    pub use schemadef_core::{join_ddls, Dialect};
}
