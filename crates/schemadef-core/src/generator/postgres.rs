//! PostgreSQL DDL generation.
//!
//! Columns change through `ALTER COLUMN` sub-commands, comments through
//! `COMMENT ON`, and plain indexes live outside the table as separate
//! `CREATE INDEX` statements. Renames cannot share an ALTER TABLE with other
//! clauses, so they are emitted as statements of their own.

use super::{
    create_table_sql, default_sql, is_plain_identifier, string_literal, DdlDialect, Fragment,
};
use crate::ast::QualifiedName;
use crate::diff::SchemaOp;
use crate::error::{Error, Result};
use crate::schema::{Column, Index, PrimaryKey, Table};
use crate::Dialect;

/// PostgreSQL DDL dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Returns the column's type, as a serial pseudo-type when it
    /// auto-increments.
    fn type_sql(&self, column: &Column, allow_serial: bool) -> Result<String> {
        if !column.auto_increment {
            return Ok(column.data_type.to_string());
        }
        let serial = match column.data_type.canonical_name() {
            "integer" => "serial",
            "bigint" => "bigserial",
            "smallint" => "smallserial",
            _ => "",
        };
        if serial.is_empty() || !allow_serial {
            return Err(Error::UnsupportedOperation {
                dialect: self.dialect().to_string(),
                operation: format!(
                    "auto-increment column {} of type {}",
                    column.name, column.data_type
                ),
            });
        }
        Ok(serial.to_string())
    }

    /// Names the index lives under; indexes share the table's schema.
    fn index_name(table: &QualifiedName, index: &Index) -> QualifiedName {
        QualifiedName {
            schema: table.schema.clone(),
            name: index.name.clone(),
        }
    }

    fn primary_key_name(table: &QualifiedName, pk: &PrimaryKey) -> String {
        pk.name
            .clone()
            .unwrap_or_else(|| format!("{}_pkey", table.name))
    }

    fn create_index(&self, table: &QualifiedName, index: &Index) -> String {
        let mut sql = format!(
            "CREATE {}INDEX {} ON {}",
            if index.unique { "UNIQUE " } else { "" },
            self.quote_identifier(&index.name),
            self.quote_name(table)
        );
        if let Some(method) = &index.method {
            sql.push_str(" USING ");
            sql.push_str(&method.to_ascii_lowercase());
        }
        sql.push(' ');
        sql.push_str(&self.index_columns(&index.columns));
        if let Some(condition) = &index.condition {
            sql.push_str(" WHERE ");
            sql.push_str(&self.expr(condition));
        }
        sql
    }

    fn column_comment(&self, table: &QualifiedName, column: &Column) -> String {
        format!(
            "COMMENT ON COLUMN {}.{} IS {}",
            self.quote_name(table),
            self.quote_identifier(&column.name),
            column
                .comment
                .as_deref()
                .map_or_else(|| "NULL".to_string(), string_literal)
        )
    }

    fn create_table(&self, table: &Table) -> Result<Vec<Fragment>> {
        let mut definitions = Vec::new();
        for column in &table.columns {
            definitions.push(self.column_definition(column)?);
        }
        if let Some(pk) = &table.primary_key {
            let columns = self.name_list(&pk.columns);
            let name = Self::primary_key_name(&table.name, pk);
            if name == format!("{}_pkey", table.name.name) {
                definitions.push(format!("PRIMARY KEY {columns}"));
            } else {
                definitions.push(format!(
                    "CONSTRAINT {} PRIMARY KEY {columns}",
                    self.quote_identifier(&name)
                ));
            }
        }
        for index in table.indexes.iter().filter(|i| i.constraint) {
            definitions.push(format!(
                "CONSTRAINT {} UNIQUE {}",
                self.quote_identifier(&index.name),
                self.name_list(&index.columns.iter().map(|c| c.name.clone()).collect::<Vec<_>>())
            ));
        }
        for check in &table.checks {
            definitions.push(format!(
                "CONSTRAINT {} CHECK ({})",
                self.quote_identifier(&check.name),
                self.expr(&check.expr)
            ));
        }
        for fk in &table.foreign_keys {
            definitions.push(self.foreign_key_definition(fk));
        }

        let mut fragments = vec![Fragment::Statement(create_table_sql(
            self,
            &table.name,
            &definitions,
            "",
        ))];
        for index in table.indexes.iter().filter(|i| !i.constraint) {
            fragments.push(Fragment::Statement(self.create_index(&table.name, index)));
        }
        if let Some(comment) = table.option("COMMENT") {
            fragments.push(Fragment::Statement(format!(
                "COMMENT ON TABLE {} IS {comment}",
                self.quote_name(&table.name)
            )));
        }
        for column in table.columns.iter().filter(|c| c.comment.is_some()) {
            fragments.push(Fragment::Statement(self.column_comment(&table.name, column)));
        }
        Ok(fragments)
    }

    fn modify_column(
        &self,
        op: &SchemaOp,
        table: &QualifiedName,
        from: &Column,
        to: &Column,
    ) -> Result<Vec<Fragment>> {
        if from.auto_increment != to.auto_increment
            || from.charset != to.charset
            || from.on_update != to.on_update
        {
            return Err(self.unsupported(op));
        }

        let column = self.quote_identifier(&to.name);
        let mut fragments = Vec::new();
        if from.data_type != to.data_type || from.collation != to.collation {
            let mut sql = format!("ALTER COLUMN {column} TYPE {}", to.data_type);
            if let Some(collation) = &to.collation {
                sql.push_str(" COLLATE ");
                sql.push_str(&self.quote_identifier(collation));
            }
            fragments.push(Fragment::clause(table, sql));
        }
        if from.nullable != to.nullable {
            let change = if to.nullable { "DROP" } else { "SET" };
            fragments.push(Fragment::clause(
                table,
                format!("ALTER COLUMN {column} {change} NOT NULL"),
            ));
        }
        if from.default != to.default {
            let sql = match &to.default {
                Some(default) => format!(
                    "ALTER COLUMN {column} SET DEFAULT {}",
                    default_sql(self, default, false, &[])
                ),
                None => format!("ALTER COLUMN {column} DROP DEFAULT"),
            };
            fragments.push(Fragment::clause(table, sql));
        }
        if from.comment != to.comment {
            fragments.push(Fragment::Statement(self.column_comment(table, to)));
        }
        Ok(fragments)
    }
}

impl DdlDialect for PostgresDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn quote_identifier(&self, name: &str) -> String {
        if is_plain_identifier(name, true) {
            name.to_string()
        } else {
            format!("\"{}\"", name.replace('"', "\"\""))
        }
    }

    fn coalesces_alter_clauses(&self) -> bool {
        true
    }

    fn column_definition(&self, column: &Column) -> Result<String> {
        if column.charset.is_some() || column.on_update.is_some() {
            return Err(Error::UnsupportedOperation {
                dialect: self.dialect().to_string(),
                operation: format!("declare MySQL column attributes on {}", column.name),
            });
        }
        let mut parts = vec![
            self.quote_identifier(&column.name),
            self.type_sql(column, true)?,
        ];
        if let Some(collation) = &column.collation {
            parts.push(format!("COLLATE {}", self.quote_identifier(collation)));
        }
        if !column.nullable {
            parts.push("NOT NULL".to_string());
        }
        if let Some(default) = &column.default {
            parts.push(format!("DEFAULT {}", default_sql(self, default, false, &[])));
        }
        Ok(parts.join(" "))
    }

    fn render(&self, op: &SchemaOp) -> Result<Vec<Fragment>> {
        let fragments = match op {
            SchemaOp::CreateTable { table } => self.create_table(table)?,
            SchemaOp::DropTable { name } => vec![Fragment::Statement(format!(
                "DROP TABLE {}",
                self.quote_name(name)
            ))],
            SchemaOp::RenameTable { from, to } => {
                if from.schema != to.schema {
                    return Err(self.unsupported(op));
                }
                vec![Fragment::Statement(format!(
                    "ALTER TABLE {} RENAME TO {}",
                    self.quote_name(from),
                    self.quote_identifier(&to.name)
                ))]
            }
            SchemaOp::AddColumn { table, column, .. } => {
                let mut fragments = vec![Fragment::clause(
                    table,
                    format!("ADD COLUMN {}", self.column_definition(column)?),
                )];
                if column.comment.is_some() {
                    fragments.push(Fragment::Statement(self.column_comment(table, column)));
                }
                fragments
            }
            SchemaOp::DropColumn { table, column } => vec![Fragment::clause(
                table,
                format!("DROP COLUMN {}", self.quote_identifier(column)),
            )],
            SchemaOp::RenameColumn { table, from, to } => vec![Fragment::Statement(format!(
                "ALTER TABLE {} RENAME COLUMN {} TO {}",
                self.quote_name(table),
                self.quote_identifier(from),
                self.quote_identifier(to)
            ))],
            SchemaOp::ModifyColumn { table, from, to } => {
                self.modify_column(op, table, from, to)?
            }
            SchemaOp::AddIndex { table, index } => {
                if index.constraint {
                    let columns: Vec<String> =
                        index.columns.iter().map(|c| c.name.clone()).collect();
                    vec![Fragment::clause(
                        table,
                        format!(
                            "ADD CONSTRAINT {} UNIQUE {}",
                            self.quote_identifier(&index.name),
                            self.name_list(&columns)
                        ),
                    )]
                } else {
                    vec![Fragment::Statement(self.create_index(table, index))]
                }
            }
            SchemaOp::DropIndex { table, index } => {
                if index.constraint {
                    vec![Fragment::clause(
                        table,
                        format!("DROP CONSTRAINT {}", self.quote_identifier(&index.name)),
                    )]
                } else {
                    vec![Fragment::Statement(format!(
                        "DROP INDEX {}",
                        self.quote_name(&Self::index_name(table, index))
                    ))]
                }
            }
            SchemaOp::AddPrimaryKey { table, primary_key } => {
                let columns = self.name_list(&primary_key.columns);
                let sql = match &primary_key.name {
                    Some(name) => format!(
                        "ADD CONSTRAINT {} PRIMARY KEY {columns}",
                        self.quote_identifier(name)
                    ),
                    None => format!("ADD PRIMARY KEY {columns}"),
                };
                vec![Fragment::clause(table, sql)]
            }
            SchemaOp::DropPrimaryKey { table, primary_key } => vec![Fragment::clause(
                table,
                format!(
                    "DROP CONSTRAINT {}",
                    self.quote_identifier(&Self::primary_key_name(table, primary_key))
                ),
            )],
            SchemaOp::AddForeignKey { table, foreign_key } => vec![Fragment::clause(
                table,
                format!("ADD {}", self.foreign_key_definition(foreign_key)),
            )],
            SchemaOp::DropForeignKey { table, foreign_key } => vec![Fragment::clause(
                table,
                format!("DROP CONSTRAINT {}", self.quote_identifier(&foreign_key.name)),
            )],
            SchemaOp::AddCheck { table, check } => vec![Fragment::clause(
                table,
                format!(
                    "ADD CONSTRAINT {} CHECK ({})",
                    self.quote_identifier(&check.name),
                    self.expr(&check.expr)
                ),
            )],
            SchemaOp::DropCheck { table, check } => vec![Fragment::clause(
                table,
                format!("DROP CONSTRAINT {}", self.quote_identifier(&check.name)),
            )],
            SchemaOp::CreateView { view } => vec![Fragment::Statement(format!(
                "CREATE VIEW {} AS {}",
                self.quote_name(&view.name),
                view.definition
            ))],
            SchemaOp::ReplaceView { view } => vec![Fragment::Statement(format!(
                "CREATE OR REPLACE VIEW {} AS {}",
                self.quote_name(&view.name),
                view.definition
            ))],
            SchemaOp::DropView { name } => vec![Fragment::Statement(format!(
                "DROP VIEW {}",
                self.quote_name(name)
            ))],
        };
        Ok(fragments)
    }
}
