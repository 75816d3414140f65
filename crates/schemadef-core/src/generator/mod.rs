//! DDL generation.
//!
//! Each dialect knows how to render [`SchemaOp`]s as SQL for its database.
//! Rendering produces [`Fragment`]s: whole statements, or clauses of an
//! `ALTER TABLE` that consecutive operations on the same table may share.
//! Generation is all-or-nothing: an operation the dialect cannot express
//! fails the whole call with [`Error::UnsupportedOperation`].

mod mysql;
mod postgres;
mod sqlite;

pub use mysql::MysqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use tracing::{debug, trace};

use crate::ast::{Expr, IndexColumn, QualifiedName, SortDirection, UnaryOp};
use crate::diff::SchemaOp;
use crate::error::{Error, Result};
use crate::lexer::Keyword;
use crate::schema::{Column, ForeignKey};
use crate::Dialect;

/// Words that need quoting as identifiers in at least one dialect but that
/// the lexer does not treat as keywords.
const RESERVED_WORDS: &[&str] = &[
    "all", "analyze", "any", "array", "by", "corresponding", "cross", "current_date",
    "current_time", "current_timestamp", "current_user", "distinct", "do", "except", "fetch",
    "for", "from", "full", "grant", "group", "having", "inner", "intersect", "interval", "into",
    "join", "left", "limit", "localtime", "localtimestamp", "natural", "offset", "order", "outer",
    "range", "right", "row", "rows", "select", "session_user", "some", "union", "user",
    "values", "window",
];

/// A piece of rendered DDL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// A clause of `ALTER TABLE table ...`, such as `ADD COLUMN age int`.
    Clause {
        /// Altered table.
        table: QualifiedName,
        /// Clause text without the `ALTER TABLE` prefix.
        sql: String,
    },
    /// A complete statement.
    Statement(String),
}

impl Fragment {
    fn clause(table: &QualifiedName, sql: impl Into<String>) -> Self {
        Self::Clause {
            table: table.clone(),
            sql: sql.into(),
        }
    }
}

/// Trait for database-specific DDL generation.
pub trait DdlDialect: Send + Sync {
    /// Returns the dialect rendered by this generator.
    fn dialect(&self) -> Dialect;

    /// Quotes an identifier (table name, column name, etc.) when needed.
    fn quote_identifier(&self, name: &str) -> String;

    /// Returns whether consecutive clauses on one table share an ALTER TABLE.
    fn coalesces_alter_clauses(&self) -> bool;

    /// Renders the column definition used by CREATE TABLE and ADD COLUMN.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedOperation`] for attributes the dialect
    /// cannot express.
    fn column_definition(&self, column: &Column) -> Result<String>;

    /// Renders one operation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedOperation`] if the dialect has no DDL for
    /// the operation.
    fn render(&self, op: &SchemaOp) -> Result<Vec<Fragment>>;

    /// Rewrites the operation list before rendering.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedOperation`] when the list cannot be
    /// rendered as a whole.
    fn prepare(&self, ops: &[SchemaOp]) -> Result<Vec<SchemaOp>> {
        Ok(ops.to_vec())
    }

    /// Quotes a possibly schema-qualified name.
    fn quote_name(&self, name: &QualifiedName) -> String {
        match &name.schema {
            Some(schema) => format!(
                "{}.{}",
                self.quote_identifier(schema),
                self.quote_identifier(&name.name)
            ),
            None => self.quote_identifier(&name.name),
        }
    }

    /// Renders an expression with this dialect's identifier quoting.
    fn expr(&self, expr: &Expr) -> String {
        expr.to_sql(&|name: &str| self.quote_identifier(name))
    }

    /// Renders `(a, b DESC, c(10))`.
    fn index_columns(&self, columns: &[IndexColumn]) -> String {
        let rendered: Vec<String> = columns
            .iter()
            .map(|column| {
                let mut sql = self.quote_identifier(&column.name);
                if let Some(length) = column.length {
                    sql.push_str(&format!("({length})"));
                }
                if column.direction == Some(SortDirection::Desc) {
                    sql.push_str(" DESC");
                }
                sql
            })
            .collect();
        format!("({})", rendered.join(", "))
    }

    /// Renders `(a, b)`.
    fn name_list(&self, names: &[String]) -> String {
        let quoted: Vec<String> = names.iter().map(|n| self.quote_identifier(n)).collect();
        format!("({})", quoted.join(", "))
    }

    /// Renders `CONSTRAINT n FOREIGN KEY (c) REFERENCES t (c) [actions]`.
    fn foreign_key_definition(&self, fk: &ForeignKey) -> String {
        let mut sql = format!(
            "CONSTRAINT {} FOREIGN KEY {} REFERENCES {} {}",
            self.quote_identifier(&fk.name),
            self.name_list(&fk.columns),
            self.quote_name(&fk.referenced_table),
            self.name_list(&fk.referenced_columns)
        );
        if let Some(action) = fk.on_delete {
            sql.push_str(" ON DELETE ");
            sql.push_str(action.as_sql());
        }
        if let Some(action) = fk.on_update {
            sql.push_str(" ON UPDATE ");
            sql.push_str(action.as_sql());
        }
        sql
    }

    /// Builds the error for an operation this dialect cannot render.
    fn unsupported(&self, op: &SchemaOp) -> Error {
        Error::UnsupportedOperation {
            dialect: self.dialect().to_string(),
            operation: op.describe(),
        }
    }
}

/// Returns the generator for a dialect.
#[must_use]
pub fn ddl_dialect(dialect: Dialect) -> &'static dyn DdlDialect {
    match dialect {
        Dialect::Mysql => &MysqlDialect,
        Dialect::Postgres => &PostgresDialect,
        Dialect::Sqlite => &SqliteDialect,
    }
}

/// Renders operations as DDL statements for `dialect`.
///
/// # Errors
///
/// Returns [`Error::UnsupportedOperation`] if any operation cannot be
/// rendered; no statements are returned in that case.
pub fn generate(dialect: Dialect, ops: &[SchemaOp]) -> Result<Vec<String>> {
    let ddls = generate_with(ddl_dialect(dialect), ops)?;
    debug!(
        dialect = %dialect,
        operations = ops.len(),
        statements = ddls.len(),
        "Generated DDL"
    );
    Ok(ddls)
}

/// Renders operations with a specific generator.
///
/// # Errors
///
/// Returns [`Error::UnsupportedOperation`] if any operation cannot be
/// rendered.
pub fn generate_with(generator: &dyn DdlDialect, ops: &[SchemaOp]) -> Result<Vec<String>> {
    let ops = generator.prepare(ops)?;
    let mut fragments = Vec::new();
    for op in &ops {
        trace!(operation = %op.describe(), "Rendering operation");
        fragments.extend(generator.render(op)?);
    }
    Ok(assemble(generator, fragments))
}

/// Joins fragments into statements, merging clauses where the dialect allows.
fn assemble(generator: &dyn DdlDialect, fragments: Vec<Fragment>) -> Vec<String> {
    let coalesce = generator.coalesces_alter_clauses();
    let mut statements = Vec::new();
    let mut pending: Option<(QualifiedName, Vec<String>)> = None;

    let flush = |pending: &mut Option<(QualifiedName, Vec<String>)>, out: &mut Vec<String>| {
        if let Some((table, clauses)) = pending.take() {
            out.push(format!(
                "ALTER TABLE {} {}",
                generator.quote_name(&table),
                clauses.join(", ")
            ));
        }
    };

    for fragment in fragments {
        match fragment {
            Fragment::Clause { table, sql } => {
                let same_table = coalesce && pending.as_ref().is_some_and(|(t, _)| *t == table);
                if same_table {
                    if let Some((_, clauses)) = &mut pending {
                        clauses.push(sql);
                    }
                } else {
                    flush(&mut pending, &mut statements);
                    pending = Some((table, vec![sql]));
                }
            }
            Fragment::Statement(sql) => {
                flush(&mut pending, &mut statements);
                statements.push(sql);
            }
        }
    }
    flush(&mut pending, &mut statements);
    statements
}

/// Returns true if `name` can be written without quotes.
///
/// `folds` marks dialects that lower-case unquoted identifiers, where any
/// upper-case letter forces quoting.
pub(crate) fn is_plain_identifier(name: &str, folds: bool) -> bool {
    let well_formed = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    well_formed
        && !(folds && name.chars().any(|c| c.is_ascii_uppercase()))
        && Keyword::from_str(name).is_none()
        && !RESERVED_WORDS.contains(&name.to_ascii_lowercase().as_str())
}

/// Renders a DEFAULT value, wrapping expressions in parentheses for
/// dialects that only accept literals and `plain_functions` bare.
pub(crate) fn default_sql(
    generator: &dyn DdlDialect,
    expr: &Expr,
    wrap_expressions: bool,
    plain_functions: &[&str],
) -> String {
    let sql = generator.expr(expr);
    let plain = match expr {
        Expr::Literal(_) | Expr::Niladic(_) => true,
        Expr::Unary {
            op: UnaryOp::Neg,
            operand,
        } => matches!(**operand, Expr::Literal(_)),
        Expr::Function(call) => plain_functions.contains(&call.name.as_str()),
        _ => false,
    };
    if wrap_expressions && !plain {
        format!("({sql})")
    } else {
        sql
    }
}

/// Renders a string literal.
pub(crate) fn string_literal(value: &str) -> String {
    Expr::string(value).to_string()
}

/// Lays out CREATE TABLE with one definition per line.
pub(crate) fn create_table_sql(
    generator: &dyn DdlDialect,
    name: &QualifiedName,
    definitions: &[String],
    options: &str,
) -> String {
    let mut sql = format!("CREATE TABLE {} (\n", generator.quote_name(name));
    sql.push_str("    ");
    sql.push_str(&definitions.join(",\n    "));
    sql.push_str("\n)");
    if !options.is_empty() {
        sql.push(' ');
        sql.push_str(options);
    }
    sql
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::DataType;

    #[test]
    fn test_plain_identifiers() {
        assert!(is_plain_identifier("users", true));
        assert!(is_plain_identifier("Users", false));
        assert!(!is_plain_identifier("Users", true));
        assert!(!is_plain_identifier("order", false));
        assert!(!is_plain_identifier("key", false));
        assert!(!is_plain_identifier("first name", false));
        assert!(!is_plain_identifier("1st", false));
    }

    #[test]
    fn test_clauses_coalesce_per_table() {
        let users = QualifiedName::new("users");
        let posts = QualifiedName::new("posts");
        let fragments = vec![
            Fragment::clause(&users, "ADD COLUMN a int"),
            Fragment::clause(&users, "ADD COLUMN b int"),
            Fragment::clause(&posts, "DROP COLUMN c"),
            Fragment::Statement("CREATE INDEX i ON posts (d)".to_string()),
            Fragment::clause(&posts, "DROP COLUMN e"),
        ];
        assert_eq!(
            assemble(&MysqlDialect, fragments.clone()),
            vec![
                "ALTER TABLE users ADD COLUMN a int, ADD COLUMN b int",
                "ALTER TABLE posts DROP COLUMN c",
                "CREATE INDEX i ON posts (d)",
                "ALTER TABLE posts DROP COLUMN e",
            ]
        );
        assert_eq!(assemble(&SqliteDialect, fragments).len(), 5);
    }

    #[test]
    fn test_default_wrapping() {
        let call = Expr::Function(crate::ast::FunctionCall {
            name: "UUID".to_string(),
            args: Vec::new(),
        });
        assert_eq!(default_sql(&MysqlDialect, &call, true, &["NOW"]), "(UUID())");
        assert_eq!(default_sql(&PostgresDialect, &call, false, &[]), "UUID()");
        let negative = Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(Expr::integer(1)),
        };
        assert_eq!(default_sql(&SqliteDialect, &negative, true, &[]), "-1");
    }

    #[test]
    fn test_unsupported_operation_error() {
        let op = SchemaOp::ModifyColumn {
            table: QualifiedName::new("users"),
            from: Column::new("name", DataType::new("text")),
            to: Column::new("name", DataType::new("text")).not_null(),
        };
        let err = generate(Dialect::Sqlite, &[op]).unwrap_err();
        assert_eq!(err.to_string(), "sqlite cannot modify column users.name");
    }
}
