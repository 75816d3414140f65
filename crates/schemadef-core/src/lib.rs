//! # schemadef-core
//!
//! Declarative schema diffing for MySQL, PostgreSQL and SQLite.
//!
//! This crate provides:
//! - A hand-written DDL lexer and recursive descent parser with Pratt
//!   expression parsing
//! - A schema builder folding statements into a canonical snapshot
//! - A differ producing ordered, dialect-independent schema operations
//! - One DDL generator per dialect
//!
//! ## Idempotent DDL
//!
//! Given the desired schema and a dump of the live one, the engine computes
//! the statements that bring the database to the desired state. Running it
//! again on a fresh dump yields nothing:
//!
//! ```rust
//! use schemadef_core::{generate_idempotent_ddls, Dialect};
//!
//! let current = "CREATE TABLE users (id bigint, name varchar(100));";
//! let desired = "CREATE TABLE users (id bigint, name varchar(100), age int);";
//!
//! let ddls = generate_idempotent_ddls(Dialect::Mysql, desired, current).unwrap();
//! assert_eq!(ddls, vec!["ALTER TABLE users ADD COLUMN age int"]);
//!
//! let ddls = generate_idempotent_ddls(Dialect::Mysql, desired, desired).unwrap();
//! assert!(ddls.is_empty());
//! ```

pub mod ast;
pub mod dialect;
pub mod diff;
pub mod error;
pub mod generator;
pub mod lexer;
pub mod parser;
pub mod schema;

use tracing::debug;

pub use ast::{Statement, StatementKind};
pub use dialect::Dialect;
pub use diff::{diff, SchemaOp};
pub use error::{Error, Result};
pub use generator::{generate, DdlDialect};
pub use parser::{ParseError, Parser};
pub use schema::{build_schema, SchemaSnapshot};

/// Commonly used items.
pub mod prelude {
    pub use crate::{
        build_schema, diff, generate, generate_idempotent_ddls, join_ddls, parse_ddls, Dialect,
        Error, Result, SchemaOp, SchemaSnapshot, Statement,
    };
}

/// Parses DDL source text into statements.
///
/// # Errors
///
/// Returns [`Error::Syntax`] for malformed input and
/// [`Error::UnsupportedStatement`] for statements the engine cannot model.
pub fn parse_ddls(dialect: Dialect, text: &str) -> Result<Vec<Statement>> {
    let statements = Parser::new(text, dialect)
        .parse_statements()
        .map_err(|err| Error::from_parse_error(err, text))?;
    debug!(dialect = %dialect, statements = statements.len(), "Parsed DDL");
    Ok(statements)
}

/// Parses and builds a snapshot from DDL text.
fn snapshot(dialect: Dialect, text: &str) -> Result<SchemaSnapshot> {
    build_schema(dialect, &parse_ddls(dialect, text)?)
}

/// Computes the DDL statements that turn the `current` schema into the
/// `desired` one.
///
/// Both inputs are plain DDL text; `current` is usually a dump of the live
/// database. Applying the result and dumping again makes a second call
/// return an empty list.
///
/// # Errors
///
/// Returns the parse or semantic error of either input, or
/// [`Error::UnsupportedOperation`] if the dialect cannot express a change.
pub fn generate_idempotent_ddls(
    dialect: Dialect,
    desired: &str,
    current: &str,
) -> Result<Vec<String>> {
    let desired = snapshot(dialect, desired)?;
    let current = snapshot(dialect, current)?;
    let ops = diff(&current, &desired);
    generate(dialect, &ops)
}

/// Joins statements for execution or display, each followed by `;\n`.
#[must_use]
pub fn join_ddls(ddls: &[String]) -> String {
    ddls.iter().map(|ddl| format!("{ddl};\n")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_ddls() {
        let ddls = vec!["DROP TABLE a".to_string(), "DROP TABLE b".to_string()];
        assert_eq!(join_ddls(&ddls), "DROP TABLE a;\nDROP TABLE b;\n");
        assert_eq!(join_ddls(&[]), "");
    }

    #[test]
    fn test_parse_ddls_reports_position() {
        let err = parse_ddls(Dialect::Postgres, "CREATE TABLE t (\n  id int,,\n)").unwrap_err();
        assert!(matches!(err, Error::Syntax { line: 2, .. }), "{err:?}");
    }

    #[test]
    fn test_desired_errors_surface() {
        let err = generate_idempotent_ddls(
            Dialect::Sqlite,
            "CREATE TABLE b (a_id int REFERENCES a (id))",
            "",
        )
        .unwrap_err();
        assert!(matches!(err, Error::Semantic { .. }));
    }
}
