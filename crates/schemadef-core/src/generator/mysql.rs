//! MySQL DDL generation.
//!
//! MySQL alters tables in place: columns are modified with their full
//! definition, new columns land at the declared position, and several
//! changes to one table share a single ALTER TABLE.

use super::{
    create_table_sql, default_sql, is_plain_identifier, string_literal, DdlDialect, Fragment,
};
use crate::ast::{ColumnPosition, QualifiedName};
use crate::diff::SchemaOp;
use crate::error::Result;
use crate::schema::{Column, Index, Table};
use crate::Dialect;

/// Functions MySQL accepts as a bare DEFAULT.
const PLAIN_DEFAULT_FUNCTIONS: &[&str] = &["NOW", "CURRENT_TIMESTAMP", "LOCALTIMESTAMP"];

/// MySQL DDL dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Renders `[UNIQUE] KEY name (cols) [USING m]`.
    fn key_definition(&self, index: &Index) -> String {
        let mut sql = format!(
            "{}KEY {} {}",
            if index.unique { "UNIQUE " } else { "" },
            self.quote_identifier(&index.name),
            self.index_columns(&index.columns)
        );
        if let Some(method) = &index.method {
            sql.push_str(" USING ");
            sql.push_str(method);
        }
        sql
    }

    /// Renders an ALTER TABLE that never shares its statement.
    ///
    /// Foreign key changes stay out of coalesced statements: MySQL rejects
    /// dropping and re-adding one constraint name in a single ALTER TABLE.
    fn alter_alone(&self, table: &QualifiedName, clause: &str) -> Fragment {
        Fragment::Statement(format!("ALTER TABLE {} {clause}", self.quote_name(table)))
    }

    fn create_table(&self, op: &SchemaOp, table: &Table) -> Result<String> {
        let mut definitions = Vec::new();
        for column in &table.columns {
            definitions.push(self.column_definition(column)?);
        }
        if let Some(pk) = &table.primary_key {
            definitions.push(format!("PRIMARY KEY {}", self.name_list(&pk.columns)));
        }
        for index in &table.indexes {
            if index.condition.is_some() {
                return Err(self.unsupported(op));
            }
            definitions.push(self.key_definition(index));
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

        let options: Vec<String> = table
            .options
            .iter()
            .map(|(key, value)| {
                if value.is_empty() {
                    key.clone()
                } else {
                    format!("{key}={value}")
                }
            })
            .collect();
        Ok(create_table_sql(self, &table.name, &definitions, &options.join(" ")))
    }
}

impl DdlDialect for MysqlDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Mysql
    }

    fn quote_identifier(&self, name: &str) -> String {
        if is_plain_identifier(name, false) {
            name.to_string()
        } else {
            format!("`{}`", name.replace('`', "``"))
        }
    }

    fn coalesces_alter_clauses(&self) -> bool {
        true
    }

    fn column_definition(&self, column: &Column) -> Result<String> {
        let mut parts = vec![
            self.quote_identifier(&column.name),
            column.data_type.to_string(),
        ];
        if let Some(charset) = &column.charset {
            parts.push(format!("CHARACTER SET {charset}"));
        }
        if let Some(collation) = &column.collation {
            parts.push(format!("COLLATE {collation}"));
        }
        if !column.nullable {
            parts.push("NOT NULL".to_string());
        }
        if let Some(default) = &column.default {
            parts.push(format!(
                "DEFAULT {}",
                default_sql(self, default, true, PLAIN_DEFAULT_FUNCTIONS)
            ));
        }
        if column.auto_increment {
            parts.push("AUTO_INCREMENT".to_string());
        }
        if let Some(on_update) = &column.on_update {
            parts.push(format!("ON UPDATE {}", self.expr(on_update)));
        }
        if let Some(comment) = &column.comment {
            parts.push(format!("COMMENT {}", string_literal(comment)));
        }
        Ok(parts.join(" "))
    }

    fn render(&self, op: &SchemaOp) -> Result<Vec<Fragment>> {
        let fragment = match op {
            SchemaOp::CreateTable { table } => Fragment::Statement(self.create_table(op, table)?),
            SchemaOp::DropTable { name } => {
                Fragment::Statement(format!("DROP TABLE {}", self.quote_name(name)))
            }
            SchemaOp::RenameTable { from, to } => {
                Fragment::clause(from, format!("RENAME TO {}", self.quote_name(to)))
            }
            SchemaOp::AddColumn {
                table,
                column,
                position,
            } => {
                let mut sql = format!("ADD COLUMN {}", self.column_definition(column)?);
                match position {
                    ColumnPosition::Last => {}
                    ColumnPosition::First => sql.push_str(" FIRST"),
                    ColumnPosition::After(after) => {
                        sql.push_str(" AFTER ");
                        sql.push_str(&self.quote_identifier(after));
                    }
                }
                Fragment::clause(table, sql)
            }
            SchemaOp::DropColumn { table, column } => {
                Fragment::clause(table, format!("DROP COLUMN {}", self.quote_identifier(column)))
            }
            SchemaOp::RenameColumn { table, from, to } => Fragment::clause(
                table,
                format!(
                    "RENAME COLUMN {} TO {}",
                    self.quote_identifier(from),
                    self.quote_identifier(to)
                ),
            ),
            SchemaOp::ModifyColumn { table, to, .. } => {
                Fragment::clause(table, format!("MODIFY COLUMN {}", self.column_definition(to)?))
            }
            SchemaOp::AddIndex { table, index } => {
                if index.condition.is_some() {
                    return Err(self.unsupported(op));
                }
                Fragment::clause(table, format!("ADD {}", self.key_definition(index)))
            }
            SchemaOp::DropIndex { table, index } => Fragment::clause(
                table,
                format!("DROP INDEX {}", self.quote_identifier(&index.name)),
            ),
            SchemaOp::AddPrimaryKey { table, primary_key } => Fragment::clause(
                table,
                format!("ADD PRIMARY KEY {}", self.name_list(&primary_key.columns)),
            ),
            SchemaOp::DropPrimaryKey { table, .. } => Fragment::clause(table, "DROP PRIMARY KEY"),
            SchemaOp::AddForeignKey { table, foreign_key } => self.alter_alone(
                table,
                &format!("ADD {}", self.foreign_key_definition(foreign_key)),
            ),
            SchemaOp::DropForeignKey { table, foreign_key } => self.alter_alone(
                table,
                &format!("DROP FOREIGN KEY {}", self.quote_identifier(&foreign_key.name)),
            ),
            SchemaOp::AddCheck { table, check } => Fragment::clause(
                table,
                format!(
                    "ADD CONSTRAINT {} CHECK ({})",
                    self.quote_identifier(&check.name),
                    self.expr(&check.expr)
                ),
            ),
            SchemaOp::DropCheck { table, check } => Fragment::clause(
                table,
                format!("DROP CHECK {}", self.quote_identifier(&check.name)),
            ),
            SchemaOp::CreateView { view } => Fragment::Statement(format!(
                "CREATE VIEW {} AS {}",
                self.quote_name(&view.name),
                view.definition
            )),
            SchemaOp::ReplaceView { view } => Fragment::Statement(format!(
                "CREATE OR REPLACE VIEW {} AS {}",
                self.quote_name(&view.name),
                view.definition
            )),
            SchemaOp::DropView { name } => {
                Fragment::Statement(format!("DROP VIEW {}", self.quote_name(name)))
            }
        };
        Ok(vec![fragment])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{DataType, Expr, QualifiedName, ReferentialAction};
    use crate::generator::generate_with;
    use crate::schema::ForeignKey;

    fn users() -> QualifiedName {
        QualifiedName::new("users")
    }

    fn render(ops: &[SchemaOp]) -> Vec<String> {
        generate_with(&MysqlDialect::new(), ops).unwrap()
    }

    #[test]
    fn test_add_column_last() {
        let op = SchemaOp::AddColumn {
            table: users(),
            column: Column::new("age", DataType::new("int")),
            position: ColumnPosition::Last,
        };
        assert_eq!(render(&[op]), vec!["ALTER TABLE users ADD COLUMN age int"]);
    }

    #[test]
    fn test_add_column_after_and_first() {
        let ops = vec![
            SchemaOp::AddColumn {
                table: users(),
                column: Column::new("email", DataType::new("varchar").with_params(["255"]))
                    .not_null()
                    .default(Expr::string("")),
                position: ColumnPosition::After("id".to_string()),
            },
            SchemaOp::AddColumn {
                table: users(),
                column: Column::new("key", DataType::new("int")),
                position: ColumnPosition::First,
            },
        ];
        assert_eq!(
            render(&ops),
            vec![
                "ALTER TABLE users ADD COLUMN email varchar(255) NOT NULL DEFAULT '' AFTER id, \
                 ADD COLUMN `key` int FIRST"
            ]
        );
    }

    #[test]
    fn test_create_table() {
        let mut table = Table::new(users())
            .column(
                Column::new("id", DataType::new("bigint"))
                    .not_null()
                    .auto_increment(),
            )
            .column(Column::new("name", DataType::new("varchar").with_params(["100"])))
            .primary_key(["id"])
            .index(Index::new("name", ["name"]).unique());
        table
            .options
            .push(("ENGINE".to_string(), "InnoDB".to_string()));
        assert_eq!(
            render(&[SchemaOp::CreateTable { table }]),
            vec![
                "CREATE TABLE users (\n    id bigint NOT NULL AUTO_INCREMENT,\n    \
                 name varchar(100),\n    PRIMARY KEY (id),\n    UNIQUE KEY name (name)\n) ENGINE=InnoDB"
            ]
        );
    }

    #[test]
    fn test_modify_column_uses_full_definition() {
        let op = SchemaOp::ModifyColumn {
            table: users(),
            from: Column::new("name", DataType::new("varchar").with_params(["100"])),
            to: Column::new("name", DataType::new("varchar").with_params(["200"])).not_null(),
        };
        assert_eq!(
            render(&[op]),
            vec!["ALTER TABLE users MODIFY COLUMN name varchar(200) NOT NULL"]
        );
    }

    #[test]
    fn test_foreign_keys() {
        let fk = ForeignKey {
            name: "posts_ibfk_1".to_string(),
            columns: vec!["user_id".to_string()],
            referenced_table: users(),
            referenced_columns: vec!["id".to_string()],
            on_delete: Some(ReferentialAction::Cascade),
            on_update: None,
        };
        let posts = QualifiedName::new("posts");
        let ops = vec![
            SchemaOp::DropForeignKey {
                table: posts.clone(),
                foreign_key: fk.clone(),
            },
            SchemaOp::DropColumn {
                table: users(),
                column: "legacy".to_string(),
            },
            SchemaOp::AddForeignKey {
                table: posts,
                foreign_key: fk,
            },
        ];
        assert_eq!(
            render(&ops),
            vec![
                "ALTER TABLE posts DROP FOREIGN KEY posts_ibfk_1",
                "ALTER TABLE users DROP COLUMN legacy",
                "ALTER TABLE posts ADD CONSTRAINT posts_ibfk_1 FOREIGN KEY (user_id) \
                 REFERENCES users (id) ON DELETE CASCADE",
            ]
        );
    }

    #[test]
    fn test_foreign_keys_do_not_share_an_alter() {
        let fk = ForeignKey {
            name: "fk".to_string(),
            columns: vec!["user_id".to_string()],
            referenced_table: users(),
            referenced_columns: vec!["id".to_string()],
            on_delete: None,
            on_update: None,
        };
        let posts = QualifiedName::new("posts");
        let ops = vec![
            SchemaOp::ModifyColumn {
                table: posts.clone(),
                from: Column::new("title", DataType::new("text")),
                to: Column::new("title", DataType::new("text")).not_null(),
            },
            SchemaOp::DropForeignKey {
                table: posts.clone(),
                foreign_key: fk.clone(),
            },
            SchemaOp::AddForeignKey {
                table: posts.clone(),
                foreign_key: fk,
            },
            SchemaOp::DropColumn {
                table: posts,
                column: "legacy".to_string(),
            },
        ];
        assert_eq!(
            render(&ops),
            vec![
                "ALTER TABLE posts MODIFY COLUMN title text NOT NULL",
                "ALTER TABLE posts DROP FOREIGN KEY fk",
                "ALTER TABLE posts ADD CONSTRAINT fk FOREIGN KEY (user_id) REFERENCES users (id)",
                "ALTER TABLE posts DROP COLUMN legacy",
            ]
        );
    }

    #[test]
    fn test_expression_default_is_parenthesized() {
        let column = Column::new("created_at", DataType::new("datetime")).default(Expr::Niladic(
            "CURRENT_TIMESTAMP".to_string(),
        ));
        let sql = MysqlDialect::new()
            .column_definition(&column)
            .unwrap();
        assert_eq!(sql, "created_at datetime DEFAULT CURRENT_TIMESTAMP");

        let column = Column::new("n", DataType::new("int"))
            .default(Expr::integer(1).binary(crate::ast::BinaryOp::Add, Expr::integer(1)));
        let sql = MysqlDialect::new()
            .column_definition(&column)
            .unwrap();
        assert_eq!(sql, "n int DEFAULT (1 + 1)");
    }

    #[test]
    fn test_views() {
        let view = crate::schema::View {
            name: QualifiedName::new("active_users"),
            definition: "SELECT id FROM users".to_string(),
        };
        assert_eq!(
            render(&[SchemaOp::ReplaceView { view }]),
            vec!["CREATE OR REPLACE VIEW active_users AS SELECT id FROM users"]
        );
    }
}
