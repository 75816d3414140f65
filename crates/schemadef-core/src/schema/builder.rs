//! Schema reconstruction from DDL statements.
//!
//! Statements are replayed in order on an accumulated [`SchemaSnapshot`].
//! Column-level constraints are lifted to the table, defaults the database
//! would report differently are normalized, and unnamed constraints get the
//! name the dialect would give them, so that a schema written by hand and the
//! same schema dumped from a database build equal snapshots.

use tracing::{debug, trace};

use crate::ast::{
    AlterColumnChange, AlterTableAction, ColumnConstraint, ColumnDef, ColumnPosition,
    CommentStatement, CommentTarget, CreateIndexStatement, CreateTableStatement,
    CreateViewStatement, DropIndexStatement, DropStatement, Expr, IndexColumn, QualifiedName,
    ReferencesClause, ReferentialAction, SortDirection, Statement, StatementKind,
    TableConstraint,
};
use crate::error::{Error, Result};
use crate::schema::{
    CheckConstraint, Column, ForeignKey, Index, PrimaryKey, SchemaSnapshot, Table, View,
};
use crate::Dialect;

/// Builds a [`SchemaSnapshot`] by applying statements in order.
#[derive(Debug)]
pub struct SchemaBuilder {
    dialect: Dialect,
    schema: SchemaSnapshot,
}

impl SchemaBuilder {
    /// Creates a builder starting from an empty schema.
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            schema: SchemaSnapshot::new(),
        }
    }

    /// Applies a single statement to the accumulated schema.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Semantic`] if the statement refers to an object that
    /// does not exist or redefines one that does.
    pub fn apply(&mut self, statement: &Statement) -> Result<()> {
        trace!(sql = %statement.sql(), "Applying statement");
        match &statement.kind {
            StatementKind::CreateTable(create) => self.create_table(create),
            StatementKind::AlterTable(alter) => {
                let mut name = alter.name.clone();
                for action in &alter.actions {
                    name = self.alter_table(&name, action)?;
                }
                Ok(())
            }
            StatementKind::CreateIndex(create) => self.create_index(create),
            StatementKind::CreateView(create) => self.create_view(create),
            StatementKind::DropTable(drop) => self.drop_tables(drop),
            StatementKind::DropView(drop) => self.drop_views(drop),
            StatementKind::DropIndex(drop) => self.drop_index(drop),
            StatementKind::Comment(comment) => self.comment(comment),
        }
    }

    /// Validates cross-table references and returns the finished schema.
    ///
    /// Foreign keys written without a column list are resolved to the
    /// referenced table's primary key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Semantic`] if a foreign key refers to a table or column
    /// missing from the schema.
    pub fn finish(mut self) -> Result<SchemaSnapshot> {
        let mut resolved = Vec::new();
        for (table_idx, table) in self.schema.tables.iter().enumerate() {
            for (fk_idx, fk) in table.foreign_keys.iter().enumerate() {
                let target = self.schema.get_table(&fk.referenced_table).ok_or_else(|| {
                    Error::semantic(
                        format!("foreign key '{}' references a missing table", fk.name),
                        &fk.referenced_table,
                    )
                })?;

                if fk.referenced_columns.is_empty() {
                    let pk = target.primary_key.as_ref().ok_or_else(|| {
                        Error::semantic(
                            format!(
                                "foreign key '{}' references a table without primary key",
                                fk.name
                            ),
                            &fk.referenced_table,
                        )
                    })?;
                    resolved.push((table_idx, fk_idx, pk.columns.clone()));
                    continue;
                }

                if let Some(missing) = fk
                    .referenced_columns
                    .iter()
                    .find(|c| target.get_column(c).is_none())
                {
                    return Err(Error::semantic_column(
                        format!("foreign key '{}' references a missing column", fk.name),
                        &fk.referenced_table,
                        missing.clone(),
                    ));
                }
            }
        }

        for (table_idx, fk_idx, columns) in resolved {
            self.schema.tables[table_idx].foreign_keys[fk_idx].referenced_columns = columns;
        }

        for table in &self.schema.tables {
            for fk in &table.foreign_keys {
                if fk.columns.len() != fk.referenced_columns.len() {
                    return Err(Error::semantic(
                        format!("foreign key '{}' has mismatched column counts", fk.name),
                        &table.name,
                    ));
                }
            }
        }

        debug!(
            dialect = %self.dialect,
            tables = self.schema.tables.len(),
            views = self.schema.views.len(),
            "Built schema snapshot"
        );
        Ok(self.schema)
    }

    fn create_table(&mut self, create: &CreateTableStatement) -> Result<()> {
        if self.schema.get_table(&create.name).is_some() {
            if create.if_not_exists {
                return Ok(());
            }
            return Err(Error::semantic("table already exists", &create.name));
        }
        if self.schema.get_view(&create.name).is_some() {
            return Err(Error::semantic("a view with this name already exists", &create.name));
        }

        let mut table = Table::new(create.name.clone());
        table.options.clone_from(&create.options);
        for def in &create.columns {
            add_column(self.dialect, &mut table, def, &ColumnPosition::Last)?;
        }
        for constraint in &create.constraints {
            add_constraint(self.dialect, &mut table, constraint, None)?;
        }
        self.schema.tables.push(table);
        Ok(())
    }

    /// Applies one ALTER TABLE action and returns the table's name afterwards.
    fn alter_table(
        &mut self,
        name: &QualifiedName,
        action: &AlterTableAction,
    ) -> Result<QualifiedName> {
        let dialect = self.dialect;

        if let AlterTableAction::RenameTable { to } = action {
            if self.schema.get_table(to).is_some() {
                return Err(Error::semantic("table already exists", to));
            }
            let table = table_mut(&mut self.schema, name)?;
            if table.renamed_from.is_none() {
                table.renamed_from = Some(table.name.clone());
            }
            table.name = to.clone();
            for table in &mut self.schema.tables {
                for fk in &mut table.foreign_keys {
                    if fk.referenced_table == *name {
                        fk.referenced_table = to.clone();
                    }
                }
            }
            return Ok(to.clone());
        }

        let mut renamed_column = None;
        let table = table_mut(&mut self.schema, name)?;
        match action {
            AlterTableAction::AddColumn { column, position } => {
                add_column(dialect, table, column, position)?;
            }
            AlterTableAction::DropColumn { name: column, if_exists } => {
                if table.get_column(column).is_none() {
                    if *if_exists {
                        return Ok(name.clone());
                    }
                    return Err(Error::semantic_column("column does not exist", name, column));
                }
                drop_column(dialect, table, column);
            }
            AlterTableAction::ModifyColumn {
                old_name,
                column,
                position,
            } => {
                modify_column(dialect, table, old_name, column, position)?;
                if *old_name != column.name {
                    renamed_column = Some((old_name.clone(), column.name.clone()));
                }
            }
            AlterTableAction::AlterColumn { name: column, change } => {
                let in_pk = table.is_primary_key_column(column);
                let col = table
                    .get_column_mut(column)
                    .ok_or_else(|| Error::semantic_column("column does not exist", name, column))?;
                match change {
                    AlterColumnChange::SetType {
                        data_type,
                        collation,
                    } => {
                        col.data_type = data_type.clone();
                        col.collation.clone_from(collation);
                    }
                    AlterColumnChange::SetNotNull => col.nullable = false,
                    AlterColumnChange::DropNotNull => col.nullable = true,
                    AlterColumnChange::SetDefault(expr) => col.default = normalize_default(expr),
                    AlterColumnChange::DropDefault => col.default = None,
                }
                if in_pk {
                    col.nullable = false;
                }
            }
            AlterTableAction::RenameColumn { from, to } => {
                if table.get_column(to).is_some() {
                    return Err(Error::semantic_column("column already exists", name, to));
                }
                let col = table
                    .get_column_mut(from)
                    .ok_or_else(|| Error::semantic_column("column does not exist", name, from))?;
                if col.renamed_from.is_none() {
                    col.renamed_from = Some(from.clone());
                }
                col.name.clone_from(to);
                rename_column_references(table, from, to);
                renamed_column = Some((from.clone(), to.clone()));
            }
            AlterTableAction::RenameTable { .. } => {}
            AlterTableAction::AddConstraint(constraint) => {
                add_constraint(dialect, table, constraint, None)?;
            }
            AlterTableAction::DropConstraint { name: constraint } => {
                let removed = remove_named(&mut table.foreign_keys, |fk| fk.name == *constraint)
                    || remove_named(&mut table.checks, |c| c.name == *constraint)
                    || remove_named(&mut table.indexes, |i| i.name == *constraint);
                if !removed {
                    let is_pk = table
                        .primary_key
                        .as_ref()
                        .is_some_and(|pk| pk.name.as_deref() == Some(constraint.as_str()));
                    if !is_pk {
                        return Err(Error::semantic(
                            format!("constraint '{constraint}' does not exist"),
                            name,
                        ));
                    }
                    table.primary_key = None;
                }
            }
            AlterTableAction::DropIndex { name: index } => {
                if !remove_named(&mut table.indexes, |i| i.name == *index) {
                    return Err(Error::semantic(format!("index '{index}' does not exist"), name));
                }
            }
            AlterTableAction::DropForeignKey { name: fk } => {
                if !remove_named(&mut table.foreign_keys, |f| f.name == *fk) {
                    return Err(Error::semantic(
                        format!("foreign key '{fk}' does not exist"),
                        name,
                    ));
                }
            }
            AlterTableAction::DropPrimaryKey => {
                if table.primary_key.take().is_none() {
                    return Err(Error::semantic("table has no primary key", name));
                }
            }
            AlterTableAction::DropCheck { name: check } => {
                if !remove_named(&mut table.checks, |c| c.name == *check) {
                    return Err(Error::semantic(format!("check '{check}' does not exist"), name));
                }
            }
        }

        if let Some((from, to)) = renamed_column {
            for other in &mut self.schema.tables {
                for fk in &mut other.foreign_keys {
                    if fk.referenced_table == *name {
                        rename_in(&mut fk.referenced_columns, &from, &to);
                    }
                }
            }
        }
        Ok(name.clone())
    }

    fn create_index(&mut self, create: &CreateIndexStatement) -> Result<()> {
        let dialect = self.dialect;
        let table = table_mut(&mut self.schema, &create.table)?;
        if table.get_index(&create.name).is_some() {
            if create.if_not_exists {
                return Ok(());
            }
            return Err(Error::semantic(
                format!("index '{}' already exists", create.name),
                &create.table,
            ));
        }
        let columns = index_columns(table, &create.columns)?;
        table.indexes.push(Index {
            name: create.name.clone(),
            columns,
            unique: create.unique,
            method: normalize_method(dialect, create.method.as_deref()),
            condition: create.condition.clone().map(Expr::strip_parens),
            constraint: false,
        });
        Ok(())
    }

    fn create_view(&mut self, create: &CreateViewStatement) -> Result<()> {
        if self.schema.get_table(&create.name).is_some() {
            return Err(Error::semantic("a table with this name already exists", &create.name));
        }
        match self.schema.views.iter_mut().find(|v| v.name == create.name) {
            Some(existing) if create.or_replace => {
                existing.definition.clone_from(&create.definition);
            }
            Some(_) => return Err(Error::semantic("view already exists", &create.name)),
            None => self.schema.views.push(View {
                name: create.name.clone(),
                definition: create.definition.clone(),
            }),
        }
        Ok(())
    }

    fn drop_tables(&mut self, drop: &DropStatement) -> Result<()> {
        for name in &drop.names {
            if !remove_named(&mut self.schema.tables, |t| t.name == *name) && !drop.if_exists {
                return Err(Error::semantic("table does not exist", name));
            }
        }
        Ok(())
    }

    fn drop_views(&mut self, drop: &DropStatement) -> Result<()> {
        for name in &drop.names {
            if !remove_named(&mut self.schema.views, |v| v.name == *name) && !drop.if_exists {
                return Err(Error::semantic("view does not exist", name));
            }
        }
        Ok(())
    }

    fn drop_index(&mut self, drop: &DropIndexStatement) -> Result<()> {
        let removed = match &drop.table {
            Some(table) => {
                let table = table_mut(&mut self.schema, table)?;
                remove_named(&mut table.indexes, |i| i.name == drop.name)
            }
            None => self
                .schema
                .tables
                .iter_mut()
                .any(|t| remove_named(&mut t.indexes, |i| i.name == drop.name)),
        };
        if !removed && !drop.if_exists {
            let table = drop
                .table
                .as_ref()
                .map_or_else(|| drop.name.clone(), ToString::to_string);
            return Err(Error::semantic(
                format!("index '{}' does not exist", drop.name),
                table,
            ));
        }
        Ok(())
    }

    fn comment(&mut self, comment: &CommentStatement) -> Result<()> {
        match &comment.target {
            CommentTarget::Column { table, column } => {
                let t = table_mut(&mut self.schema, table)?;
                let col = t
                    .get_column_mut(column)
                    .ok_or_else(|| Error::semantic_column("column does not exist", table, column))?;
                col.comment.clone_from(&comment.comment);
            }
            CommentTarget::Table(table) => {
                let t = table_mut(&mut self.schema, table)?;
                t.options.retain(|(k, _)| k != "COMMENT");
                if let Some(text) = &comment.comment {
                    t.options
                        .push(("COMMENT".to_string(), format!("'{}'", text.replace('\'', "''"))));
                }
            }
        }
        Ok(())
    }
}

/// Builds a schema snapshot from parsed statements.
///
/// # Errors
///
/// Returns [`Error::Semantic`] for dangling references and duplicate
/// definitions.
pub fn build_schema(dialect: Dialect, statements: &[Statement]) -> Result<SchemaSnapshot> {
    let mut builder = SchemaBuilder::new(dialect);
    for statement in statements {
        builder.apply(statement)?;
    }
    builder.finish()
}

fn table_mut<'s>(schema: &'s mut SchemaSnapshot, name: &QualifiedName) -> Result<&'s mut Table> {
    schema
        .get_table_mut(name)
        .ok_or_else(|| Error::semantic("table does not exist", name))
}

/// Removes the first item matching `pred`, returning whether one was found.
fn remove_named<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> bool {
    match items.iter().position(pred) {
        Some(idx) => {
            items.remove(idx);
            true
        }
        None => false,
    }
}

fn rename_in(columns: &mut [String], from: &str, to: &str) {
    for column in columns.iter_mut().filter(|c| *c == from) {
        *column = to.to_string();
    }
}

/// Renames a column inside the table's own keys, indexes and foreign keys.
fn rename_column_references(table: &mut Table, from: &str, to: &str) {
    if let Some(pk) = &mut table.primary_key {
        rename_in(&mut pk.columns, from, to);
    }
    for index in &mut table.indexes {
        for column in index.columns.iter_mut().filter(|c| c.name == from) {
            column.name = to.to_string();
        }
    }
    for fk in &mut table.foreign_keys {
        rename_in(&mut fk.columns, from, to);
        if fk.referenced_table == table.name {
            rename_in(&mut fk.referenced_columns, from, to);
        }
    }
}

/// `DEFAULT NULL` is no default; `DEFAULT (expr)` is `DEFAULT expr`.
fn normalize_default(expr: &Expr) -> Option<Expr> {
    let expr = expr.clone().strip_parens();
    (!expr.is_null_literal()).then_some(expr)
}

fn normalize_method(dialect: Dialect, method: Option<&str>) -> Option<String> {
    let method = method?.to_ascii_uppercase();
    if dialect == Dialect::Postgres && method == "BTREE" {
        return None;
    }
    Some(method)
}

fn normalize_action(
    dialect: Dialect,
    action: Option<ReferentialAction>,
) -> Option<ReferentialAction> {
    match action {
        Some(ReferentialAction::NoAction) => None,
        Some(ReferentialAction::Restrict) if dialect == Dialect::Mysql => None,
        other => other,
    }
}

/// Maps PostgreSQL serial pseudo-types onto their integer type.
fn serial_base_type(name: &str) -> Option<&'static str> {
    match name {
        "serial" | "serial4" => Some("integer"),
        "bigserial" | "serial8" => Some("bigint"),
        "smallserial" | "serial2" => Some("smallint"),
        _ => None,
    }
}

/// Converts a parsed column definition into a column plus the table-level
/// constraints it declares inline.
fn column_from_def(dialect: Dialect, def: &ColumnDef) -> (Column, Vec<TableConstraint>) {
    let mut column = Column::new(def.name.clone(), def.data_type.clone());
    if dialect == Dialect::Postgres {
        if let Some(base) = serial_base_type(&def.data_type.name) {
            column.data_type.name = base.to_string();
            column.auto_increment = true;
            column.nullable = false;
        }
    }

    let mut lifted = Vec::new();
    for constraint in &def.constraints {
        match constraint {
            ColumnConstraint::NotNull => column.nullable = false,
            ColumnConstraint::Null => column.nullable = true,
            ColumnConstraint::Default(expr) => column.default = normalize_default(expr),
            ColumnConstraint::PrimaryKey { name } => lifted.push(TableConstraint::PrimaryKey {
                name: name.clone(),
                columns: vec![IndexColumn::new(def.name.clone())],
            }),
            ColumnConstraint::Unique { name } => lifted.push(TableConstraint::Unique {
                name: name.clone(),
                columns: vec![IndexColumn::new(def.name.clone())],
                method: None,
            }),
            ColumnConstraint::AutoIncrement => column.auto_increment = true,
            ColumnConstraint::References { name, clause } => {
                lifted.push(TableConstraint::ForeignKey {
                    name: name.clone(),
                    columns: vec![def.name.clone()],
                    references: clause.clone(),
                });
            }
            ColumnConstraint::Check { name, expr } => lifted.push(TableConstraint::Check {
                name: name.clone(),
                expr: expr.clone(),
            }),
            ColumnConstraint::Comment(text) => column.comment = Some(text.clone()),
            ColumnConstraint::Collate(collation) => column.collation = Some(collation.clone()),
            ColumnConstraint::CharacterSet(charset) => column.charset = Some(charset.clone()),
            ColumnConstraint::OnUpdate(expr) => column.on_update = Some(expr.clone()),
        }
    }

    let sequence_default =
        matches!(&column.default, Some(Expr::Function(call)) if call.name == "NEXTVAL");
    if sequence_default {
        column.default = None;
        column.auto_increment = true;
    }

    (column, lifted)
}

fn insert_position(table: &Table, position: &ColumnPosition) -> Result<usize> {
    match position {
        ColumnPosition::Last => Ok(table.columns.len()),
        ColumnPosition::First => Ok(0),
        ColumnPosition::After(after) => table
            .column_position(after)
            .map(|idx| idx + 1)
            .ok_or_else(|| Error::semantic_column("column does not exist", &table.name, after)),
    }
}

fn add_column(
    dialect: Dialect,
    table: &mut Table,
    def: &ColumnDef,
    position: &ColumnPosition,
) -> Result<()> {
    if table.get_column(&def.name).is_some() {
        return Err(Error::semantic_column("duplicate column", &table.name, &def.name));
    }
    let (column, lifted) = column_from_def(dialect, def);
    let idx = insert_position(table, position)?;
    table.columns.insert(idx, column);
    for constraint in &lifted {
        add_constraint(dialect, table, constraint, Some(&def.name))?;
    }
    Ok(())
}

fn modify_column(
    dialect: Dialect,
    table: &mut Table,
    old_name: &str,
    def: &ColumnDef,
    position: &ColumnPosition,
) -> Result<()> {
    let idx = table
        .column_position(old_name)
        .ok_or_else(|| Error::semantic_column("column does not exist", &table.name, old_name))?;
    if old_name != def.name && table.get_column(&def.name).is_some() {
        return Err(Error::semantic_column("column already exists", &table.name, &def.name));
    }

    let old = table.columns.remove(idx);
    let (mut column, lifted) = column_from_def(dialect, def);
    if old_name != def.name {
        column.renamed_from = old.renamed_from.or_else(|| Some(old_name.to_string()));
        rename_column_references(table, old_name, &def.name);
    } else {
        column.renamed_from = old.renamed_from;
    }
    if table.is_primary_key_column(&def.name) {
        column.nullable = false;
    }

    let idx = match position {
        ColumnPosition::Last => idx,
        other => insert_position(table, other)?,
    };
    table.columns.insert(idx, column);
    for constraint in &lifted {
        add_constraint(dialect, table, constraint, Some(&def.name))?;
    }
    Ok(())
}

fn drop_column(dialect: Dialect, table: &mut Table, column: &str) {
    table.columns.retain(|c| c.name != column);

    if table.is_primary_key_column(column) {
        if dialect == Dialect::Mysql {
            if let Some(pk) = &mut table.primary_key {
                pk.columns.retain(|c| c != column);
                if pk.columns.is_empty() {
                    table.primary_key = None;
                }
            }
        } else {
            table.primary_key = None;
        }
    }

    if dialect == Dialect::Mysql {
        for index in &mut table.indexes {
            index.columns.retain(|c| c.name != column);
        }
        table.indexes.retain(|i| !i.columns.is_empty());
    } else {
        table.indexes.retain(|i| !i.contains(column));
    }
    table
        .foreign_keys
        .retain(|fk| !fk.columns.iter().any(|c| c == column));
}

fn index_columns(table: &Table, columns: &[IndexColumn]) -> Result<Vec<IndexColumn>> {
    columns
        .iter()
        .map(|column| {
            if table.get_column(&column.name).is_none() {
                return Err(Error::semantic_column(
                    "column does not exist",
                    &table.name,
                    &column.name,
                ));
            }
            let mut column = column.clone();
            if column.direction == Some(SortDirection::Asc) {
                column.direction = None;
            }
            Ok(column)
        })
        .collect()
}

/// Returns true if an index, foreign key or check already uses `name`.
fn name_taken(table: &Table, name: &str) -> bool {
    table.indexes.iter().any(|i| i.name == name)
        || table.foreign_keys.iter().any(|fk| fk.name == name)
        || table.checks.iter().any(|c| c.name == name)
}

/// Appends a numeric suffix to `base` until the name is free.
fn dedupe(table: &Table, base: String, separator: &str, first: usize) -> String {
    if !name_taken(table, &base) {
        return base;
    }
    (first..)
        .map(|n| format!("{base}{separator}{n}"))
        .find(|candidate| !name_taken(table, candidate))
        .unwrap_or(base)
}

/// Returns one more than the largest `N` among names shaped `{prefix}N`.
fn next_ordinal<'n>(names: impl Iterator<Item = &'n str>, prefix: &str) -> usize {
    names
        .filter_map(|name| name.strip_prefix(prefix)?.parse::<usize>().ok())
        .max()
        .unwrap_or(0)
        + 1
}

fn auto_unique_name(dialect: Dialect, table: &Table, columns: &[IndexColumn]) -> String {
    let first = columns.first().map_or("", |c| c.name.as_str());
    match dialect {
        Dialect::Mysql => dedupe(table, first.to_string(), "_", 2),
        Dialect::Postgres | Dialect::Sqlite => {
            let joined: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
            let base = format!("{}_{}_key", table.name.name, joined.join("_"));
            dedupe(table, base, "", 1)
        }
    }
}

fn auto_foreign_key_name(dialect: Dialect, table: &Table, columns: &[String]) -> String {
    match dialect {
        Dialect::Mysql => {
            let prefix = format!("{}_ibfk_", table.name.name);
            let n = next_ordinal(table.foreign_keys.iter().map(|fk| fk.name.as_str()), &prefix);
            format!("{prefix}{n}")
        }
        Dialect::Postgres | Dialect::Sqlite => {
            let base = format!("{}_{}_fkey", table.name.name, columns.join("_"));
            dedupe(table, base, "", 1)
        }
    }
}

fn auto_check_name(dialect: Dialect, table: &Table, column: Option<&str>) -> String {
    match dialect {
        Dialect::Mysql => {
            let prefix = format!("{}_chk_", table.name.name);
            let n = next_ordinal(table.checks.iter().map(|c| c.name.as_str()), &prefix);
            format!("{prefix}{n}")
        }
        Dialect::Postgres | Dialect::Sqlite => {
            let base = match column {
                Some(column) => format!("{}_{column}_check", table.name.name),
                None => format!("{}_check", table.name.name),
            };
            dedupe(table, base, "", 1)
        }
    }
}

fn add_constraint(
    dialect: Dialect,
    table: &mut Table,
    constraint: &TableConstraint,
    column_hint: Option<&str>,
) -> Result<()> {
    match constraint {
        TableConstraint::PrimaryKey { name, columns } => {
            if table.primary_key.is_some() {
                return Err(Error::semantic("multiple primary keys", &table.name));
            }
            let columns = index_columns(table, columns)?;
            let columns: Vec<String> = columns.into_iter().map(|c| c.name).collect();
            for column in &columns {
                if let Some(col) = table.get_column_mut(column) {
                    col.nullable = false;
                }
            }
            let name = match dialect {
                Dialect::Postgres => Some(
                    name.clone()
                        .unwrap_or_else(|| format!("{}_pkey", table.name.name)),
                ),
                Dialect::Mysql | Dialect::Sqlite => None,
            };
            table.primary_key = Some(PrimaryKey { name, columns });
        }
        TableConstraint::Unique {
            name,
            columns,
            method,
        } => {
            let columns = index_columns(table, columns)?;
            let name = match name {
                Some(name) => name.clone(),
                None => auto_unique_name(dialect, table, &columns),
            };
            push_index(
                table,
                Index {
                    name,
                    columns,
                    unique: true,
                    method: normalize_method(dialect, method.as_deref()),
                    condition: None,
                    constraint: dialect != Dialect::Mysql,
                },
            )?;
        }
        TableConstraint::Index {
            name,
            columns,
            method,
        } => {
            let columns = index_columns(table, columns)?;
            let name = match name {
                Some(name) => name.clone(),
                None => {
                    let first = columns.first().map_or("", |c| c.name.as_str()).to_string();
                    dedupe(table, first, "_", 2)
                }
            };
            push_index(
                table,
                Index {
                    name,
                    columns,
                    unique: false,
                    method: normalize_method(dialect, method.as_deref()),
                    condition: None,
                    constraint: false,
                },
            )?;
        }
        TableConstraint::ForeignKey {
            name,
            columns,
            references,
        } => add_foreign_key(dialect, table, name.as_deref(), columns, references)?,
        TableConstraint::Check { name, expr } => {
            let name = match name {
                Some(name) => name.clone(),
                None => auto_check_name(dialect, table, column_hint),
            };
            if table.checks.iter().any(|c| c.name == name) {
                return Err(Error::semantic(
                    format!("check '{name}' already exists"),
                    &table.name,
                ));
            }
            table.checks.push(CheckConstraint {
                name,
                expr: expr.clone().strip_parens(),
            });
        }
    }
    Ok(())
}

fn push_index(table: &mut Table, index: Index) -> Result<()> {
    if table.get_index(&index.name).is_some() {
        return Err(Error::semantic(
            format!("index '{}' already exists", index.name),
            &table.name,
        ));
    }
    table.indexes.push(index);
    Ok(())
}

fn add_foreign_key(
    dialect: Dialect,
    table: &mut Table,
    name: Option<&str>,
    columns: &[String],
    references: &ReferencesClause,
) -> Result<()> {
    if let Some(missing) = columns.iter().find(|c| table.get_column(c).is_none()) {
        return Err(Error::semantic_column(
            "column does not exist",
            &table.name,
            missing.clone(),
        ));
    }
    let name = match name {
        Some(name) => name.to_string(),
        None => auto_foreign_key_name(dialect, table, columns),
    };
    if table.get_foreign_key(&name).is_some() {
        return Err(Error::semantic(
            format!("foreign key '{name}' already exists"),
            &table.name,
        ));
    }
    table.foreign_keys.push(ForeignKey {
        name,
        columns: columns.to_vec(),
        referenced_table: references.table.clone(),
        referenced_columns: references.columns.clone(),
        on_delete: normalize_action(dialect, references.on_delete),
        on_update: normalize_action(dialect, references.on_update),
    });
    Ok(())
}
