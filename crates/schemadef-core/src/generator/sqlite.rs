//! SQLite DDL generation.
//!
//! SQLite's ALTER TABLE only renames tables and columns and adds or drops
//! columns. Keys and constraints are fixed when the table is created, so
//! foreign keys of new tables are folded back into their CREATE TABLE and
//! any other constraint change on an existing table is unsupported.

use std::collections::HashSet;

use super::{create_table_sql, default_sql, is_plain_identifier, DdlDialect, Fragment};
use crate::ast::QualifiedName;
use crate::diff::SchemaOp;
use crate::error::{Error, Result};
use crate::schema::{Column, Index, Table};
use crate::Dialect;

/// SQLite DDL dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Renders a column, with AUTOINCREMENT allowed only for the inline
    /// primary key of a new table.
    fn column_sql(&self, column: &Column, inline_primary_key: bool) -> Result<String> {
        let unsupported = |what: &str| Error::UnsupportedOperation {
            dialect: self.dialect().to_string(),
            operation: format!("declare {what} on column {}", column.name),
        };
        if column.comment.is_some() {
            return Err(unsupported("a comment"));
        }
        if column.charset.is_some() {
            return Err(unsupported("a character set"));
        }
        if column.on_update.is_some() {
            return Err(unsupported("ON UPDATE"));
        }
        if column.auto_increment && !inline_primary_key {
            return Err(unsupported("AUTOINCREMENT outside a single-column primary key"));
        }

        let mut parts = vec![
            self.quote_identifier(&column.name),
            column.data_type.to_string(),
        ];
        if !column.nullable {
            parts.push("NOT NULL".to_string());
        }
        if let Some(default) = &column.default {
            parts.push(format!("DEFAULT {}", default_sql(self, default, true, &[])));
        }
        if let Some(collation) = &column.collation {
            parts.push(format!("COLLATE {}", self.quote_identifier(collation)));
        }
        if inline_primary_key {
            parts.push("PRIMARY KEY".to_string());
            if column.auto_increment {
                parts.push("AUTOINCREMENT".to_string());
            }
        }
        Ok(parts.join(" "))
    }

    fn create_index(&self, op: &SchemaOp, table: &QualifiedName, index: &Index) -> Result<String> {
        if index.method.is_some() {
            return Err(self.unsupported(op));
        }
        let name = QualifiedName {
            schema: table.schema.clone(),
            name: index.name.clone(),
        };
        let mut sql = format!(
            "CREATE {}INDEX {} ON {} {}",
            if index.unique { "UNIQUE " } else { "" },
            self.quote_name(&name),
            self.quote_identifier(&table.name),
            self.index_columns(&index.columns)
        );
        if let Some(condition) = &index.condition {
            sql.push_str(" WHERE ");
            sql.push_str(&self.expr(condition));
        }
        Ok(sql)
    }

    fn create_table(&self, op: &SchemaOp, table: &Table) -> Result<Vec<Fragment>> {
        let inline_key = table
            .primary_key
            .as_ref()
            .filter(|pk| pk.columns.len() == 1)
            .and_then(|pk| pk.columns.first());

        let mut definitions = Vec::new();
        for column in &table.columns {
            let inline = inline_key == Some(&column.name);
            definitions.push(self.column_sql(column, inline)?);
        }
        if let Some(pk) = table.primary_key.as_ref().filter(|_| inline_key.is_none()) {
            definitions.push(format!("PRIMARY KEY {}", self.name_list(&pk.columns)));
        }
        for index in table.indexes.iter().filter(|i| i.constraint) {
            let columns: Vec<String> = index.columns.iter().map(|c| c.name.clone()).collect();
            definitions.push(format!(
                "CONSTRAINT {} UNIQUE {}",
                self.quote_identifier(&index.name),
                self.name_list(&columns)
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

        let options: Vec<&str> = table.options.iter().map(|(key, _)| key.as_str()).collect();
        let mut fragments = vec![Fragment::Statement(create_table_sql(
            self,
            &table.name,
            &definitions,
            &options.join(", "),
        ))];
        for index in table.indexes.iter().filter(|i| !i.constraint) {
            fragments.push(Fragment::Statement(self.create_index(op, &table.name, index)?));
        }
        Ok(fragments)
    }
}

impl DdlDialect for SqliteDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn quote_identifier(&self, name: &str) -> String {
        if is_plain_identifier(name, false) {
            name.to_string()
        } else {
            format!("\"{}\"", name.replace('"', "\"\""))
        }
    }

    fn coalesces_alter_clauses(&self) -> bool {
        false
    }

    fn column_definition(&self, column: &Column) -> Result<String> {
        self.column_sql(column, false)
    }

    /// Moves foreign keys of tables created in this run into their CREATE
    /// TABLE and discards foreign key drops on tables that are dropped anyway.
    fn prepare(&self, ops: &[SchemaOp]) -> Result<Vec<SchemaOp>> {
        let created: HashSet<&QualifiedName> = ops
            .iter()
            .filter_map(|op| match op {
                SchemaOp::CreateTable { table } => Some(&table.name),
                _ => None,
            })
            .collect();
        let dropped: HashSet<&QualifiedName> = ops
            .iter()
            .filter_map(|op| match op {
                SchemaOp::DropTable { name } => Some(name),
                _ => None,
            })
            .collect();

        let mut prepared: Vec<SchemaOp> = Vec::with_capacity(ops.len());
        for op in ops {
            match op {
                SchemaOp::AddForeignKey { table, foreign_key } if created.contains(table) => {
                    let create = prepared.iter_mut().find_map(|op| match op {
                        SchemaOp::CreateTable { table: t } if t.name == *table => Some(t),
                        _ => None,
                    });
                    match create {
                        Some(t) => t.foreign_keys.push(foreign_key.clone()),
                        None => return Err(self.unsupported(op)),
                    }
                }
                SchemaOp::DropForeignKey { table, .. } if dropped.contains(table) => {}
                _ => prepared.push(op.clone()),
            }
        }
        Ok(prepared)
    }

    fn render(&self, op: &SchemaOp) -> Result<Vec<Fragment>> {
        let fragments = match op {
            SchemaOp::CreateTable { table } => self.create_table(op, table)?,
            SchemaOp::DropTable { name } => vec![Fragment::Statement(format!(
                "DROP TABLE {}",
                self.quote_name(name)
            ))],
            SchemaOp::RenameTable { from, to } => {
                if from.schema != to.schema {
                    return Err(self.unsupported(op));
                }
                vec![Fragment::clause(
                    from,
                    format!("RENAME TO {}", self.quote_identifier(&to.name)),
                )]
            }
            SchemaOp::AddColumn { table, column, .. } => {
                if !column.nullable && column.default.is_none() {
                    return Err(self.unsupported(op));
                }
                vec![Fragment::clause(
                    table,
                    format!("ADD COLUMN {}", self.column_definition(column)?),
                )]
            }
            SchemaOp::DropColumn { table, column } => vec![Fragment::clause(
                table,
                format!("DROP COLUMN {}", self.quote_identifier(column)),
            )],
            SchemaOp::RenameColumn { table, from, to } => vec![Fragment::clause(
                table,
                format!(
                    "RENAME COLUMN {} TO {}",
                    self.quote_identifier(from),
                    self.quote_identifier(to)
                ),
            )],
            SchemaOp::AddIndex { table, index } if !index.constraint => {
                vec![Fragment::Statement(self.create_index(op, table, index)?)]
            }
            SchemaOp::DropIndex { table, index } if !index.constraint => {
                let name = QualifiedName {
                    schema: table.schema.clone(),
                    name: index.name.clone(),
                };
                vec![Fragment::Statement(format!(
                    "DROP INDEX {}",
                    self.quote_name(&name)
                ))]
            }
            SchemaOp::CreateView { view } => vec![Fragment::Statement(format!(
                "CREATE VIEW {} AS {}",
                self.quote_name(&view.name),
                view.definition
            ))],
            SchemaOp::ReplaceView { view } => vec![
                Fragment::Statement(format!("DROP VIEW {}", self.quote_name(&view.name))),
                Fragment::Statement(format!(
                    "CREATE VIEW {} AS {}",
                    self.quote_name(&view.name),
                    view.definition
                )),
            ],
            SchemaOp::DropView { name } => vec![Fragment::Statement(format!(
                "DROP VIEW {}",
                self.quote_name(name)
            ))],
            SchemaOp::ModifyColumn { .. }
            | SchemaOp::AddIndex { .. }
            | SchemaOp::DropIndex { .. }
            | SchemaOp::AddPrimaryKey { .. }
            | SchemaOp::DropPrimaryKey { .. }
            | SchemaOp::AddForeignKey { .. }
            | SchemaOp::DropForeignKey { .. }
            | SchemaOp::AddCheck { .. }
            | SchemaOp::DropCheck { .. } => return Err(self.unsupported(op)),
        };
        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ColumnPosition, DataType, Expr};
    use crate::generator::generate_with;
    use crate::schema::ForeignKey;

    fn render(ops: &[SchemaOp]) -> Result<Vec<String>> {
        generate_with(&SqliteDialect::new(), ops)
    }

    fn fk(name: &str, column: &str, target: &str) -> ForeignKey {
        ForeignKey {
            name: name.to_string(),
            columns: vec![column.to_string()],
            referenced_table: QualifiedName::new(target),
            referenced_columns: vec!["id".to_string()],
            on_delete: None,
            on_update: None,
        }
    }

    #[test]
    fn test_create_table_inline_primary_key() {
        let table = Table::new(QualifiedName::new("users"))
            .column(
                Column::new("id", DataType::new("integer"))
                    .not_null()
                    .auto_increment(),
            )
            .column(Column::new("name", DataType::new("text")).default(Expr::string("")))
            .primary_key(["id"])
            .index(Index::new("users_name", ["name"]));
        assert_eq!(
            render(&[SchemaOp::CreateTable { table }]).unwrap(),
            vec![
                "CREATE TABLE users (\n    id integer NOT NULL PRIMARY KEY AUTOINCREMENT,\n    \
                 name text DEFAULT ''\n)",
                "CREATE INDEX users_name ON users (name)",
            ]
        );
    }

    #[test]
    fn test_foreign_keys_fold_into_create_table() {
        let posts = Table::new(QualifiedName::new("posts"))
            .column(Column::new("id", DataType::new("integer")).not_null())
            .column(Column::new("user_id", DataType::new("integer")).not_null())
            .primary_key(["id", "user_id"]);
        let ops = vec![
            SchemaOp::CreateTable { table: posts },
            SchemaOp::AddForeignKey {
                table: QualifiedName::new("posts"),
                foreign_key: fk("posts_user_id_fkey", "user_id", "users"),
            },
        ];
        assert_eq!(
            render(&ops).unwrap(),
            vec![
                "CREATE TABLE posts (\n    id integer NOT NULL,\n    user_id integer NOT NULL,\n    \
                 PRIMARY KEY (id, user_id),\n    CONSTRAINT posts_user_id_fkey FOREIGN KEY \
                 (user_id) REFERENCES users (id)\n)"
            ]
        );
    }

    #[test]
    fn test_alter_clauses_stay_separate() {
        let users = QualifiedName::new("users");
        let ops = vec![
            SchemaOp::AddColumn {
                table: users.clone(),
                column: Column::new("age", DataType::new("integer")),
                position: ColumnPosition::Last,
            },
            SchemaOp::DropColumn {
                table: users,
                column: "legacy".to_string(),
            },
        ];
        assert_eq!(
            render(&ops).unwrap(),
            vec![
                "ALTER TABLE users ADD COLUMN age integer",
                "ALTER TABLE users DROP COLUMN legacy",
            ]
        );
    }

    #[test]
    fn test_add_not_null_column_without_default_is_unsupported() {
        let op = SchemaOp::AddColumn {
            table: QualifiedName::new("users"),
            column: Column::new("age", DataType::new("integer")).not_null(),
            position: ColumnPosition::Last,
        };
        let err = render(&[op]).unwrap_err();
        assert_eq!(err.to_string(), "sqlite cannot add column users.age");
    }

    #[test]
    fn test_foreign_key_on_existing_table_is_unsupported() {
        let op = SchemaOp::AddForeignKey {
            table: QualifiedName::new("posts"),
            foreign_key: fk("posts_user_id_fkey", "user_id", "users"),
        };
        assert!(matches!(
            render(&[op]),
            Err(Error::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn test_dropped_table_foreign_keys_are_skipped() {
        let ops = vec![
            SchemaOp::DropForeignKey {
                table: QualifiedName::new("a"),
                foreign_key: fk("a_b", "b_id", "b"),
            },
            SchemaOp::DropTable {
                name: QualifiedName::new("a"),
            },
        ];
        assert_eq!(render(&ops).unwrap(), vec!["DROP TABLE a"]);
    }
}
