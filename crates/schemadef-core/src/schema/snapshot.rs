//! Canonical schema snapshot types.

use serde::Serialize;

use crate::ast::{DataType, Expr, IndexColumn, QualifiedName, ReferentialAction};

/// A table column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Declared data type.
    pub data_type: DataType,
    /// Whether the column allows NULL values.
    pub nullable: bool,
    /// Default expression. `DEFAULT NULL` is stored as `None`.
    pub default: Option<Expr>,
    /// Whether this column auto-increments.
    pub auto_increment: bool,
    /// Column comment.
    pub comment: Option<String>,
    /// Collation.
    pub collation: Option<String>,
    /// Character set.
    pub charset: Option<String>,
    /// MySQL `ON UPDATE` expression.
    pub on_update: Option<Expr>,
    /// The name this column had before an explicit rename.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renamed_from: Option<String>,
}

impl Column {
    /// Creates a nullable column without default.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            default: None,
            auto_increment: false,
            comment: None,
            collation: None,
            charset: None,
            on_update: None,
            renamed_from: None,
        }
    }

    /// Sets the column as NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: Expr) -> Self {
        self.default = Some(value);
        self
    }

    /// Sets the column to auto-increment.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Returns true if both columns have the same definition, ignoring names.
    #[must_use]
    pub fn same_definition(&self, other: &Self) -> bool {
        self.data_type == other.data_type
            && self.nullable == other.nullable
            && self.default == other.default
            && self.auto_increment == other.auto_increment
            && self.comment == other.comment
            && self.collation == other.collation
            && self.charset == other.charset
            && self.on_update == other.on_update
    }
}

/// A table's primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimaryKey {
    /// Constraint name, where the dialect names primary keys.
    pub name: Option<String>,
    /// Key columns in order.
    pub columns: Vec<String>,
}

/// An index or unique constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Index {
    /// Index name.
    pub name: String,
    /// Indexed columns.
    pub columns: Vec<IndexColumn>,
    /// Whether this is a unique index.
    pub unique: bool,
    /// Index method such as `BTREE` or `GIN`.
    pub method: Option<String>,
    /// Partial index predicate.
    pub condition: Option<Expr>,
    /// True for a table-level UNIQUE constraint, false for CREATE INDEX.
    /// Always false on MySQL.
    pub constraint: bool,
}

impl Index {
    /// Creates a plain index over the named columns.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(IndexColumn::new).collect(),
            unique: false,
            method: None,
            condition: None,
            constraint: false,
        }
    }

    /// Marks the index as unique.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Returns true if the index covers `column`.
    #[must_use]
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c.name == column)
    }

    /// Returns true if both indexes have the same definition, ignoring names.
    #[must_use]
    pub fn same_definition(&self, other: &Self) -> bool {
        self.columns == other.columns
            && self.unique == other.unique
            && self.method == other.method
            && self.condition == other.condition
            && self.constraint == other.constraint
    }
}

/// A foreign key constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    /// Constraint name.
    pub name: String,
    /// Column(s) in the referencing table.
    pub columns: Vec<String>,
    /// Referenced table name.
    pub referenced_table: QualifiedName,
    /// Referenced column(s).
    pub referenced_columns: Vec<String>,
    /// Action on delete. `None` means the default (NO ACTION).
    pub on_delete: Option<ReferentialAction>,
    /// Action on update.
    pub on_update: Option<ReferentialAction>,
}

impl ForeignKey {
    /// Returns true if both foreign keys have the same definition, ignoring names.
    #[must_use]
    pub fn same_definition(&self, other: &Self) -> bool {
        self.columns == other.columns
            && self.referenced_table == other.referenced_table
            && self.referenced_columns == other.referenced_columns
            && self.on_delete == other.on_delete
            && self.on_update == other.on_update
    }
}

/// A CHECK constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckConstraint {
    /// Constraint name.
    pub name: String,
    /// Check expression without enclosing parentheses.
    pub expr: Expr,
}

/// A table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    /// Table name.
    pub name: QualifiedName,
    /// Columns in declaration order.
    pub columns: Vec<Column>,
    /// Primary key.
    pub primary_key: Option<PrimaryKey>,
    /// Indexes and unique constraints.
    pub indexes: Vec<Index>,
    /// Foreign keys.
    pub foreign_keys: Vec<ForeignKey>,
    /// CHECK constraints.
    pub checks: Vec<CheckConstraint>,
    /// Dialect-specific options (ENGINE, CHARSET, ...). Never diffed.
    pub options: Vec<(String, String)>,
    /// The name this table had before an explicit rename.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renamed_from: Option<QualifiedName>,
}

impl Table {
    /// Creates an empty table.
    #[must_use]
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            columns: Vec::new(),
            primary_key: None,
            indexes: Vec::new(),
            foreign_keys: Vec::new(),
            checks: Vec::new(),
            options: Vec::new(),
            renamed_from: None,
        }
    }

    /// Adds a column to the table.
    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Sets the primary key columns.
    #[must_use]
    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = Some(PrimaryKey {
            name: None,
            columns: columns.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Adds an index.
    #[must_use]
    pub fn index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// Adds a foreign key.
    #[must_use]
    pub fn foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Gets a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Gets a mutable column by name.
    pub fn get_column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Returns the position of a column.
    #[must_use]
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Gets an index by name.
    #[must_use]
    pub fn get_index(&self, name: &str) -> Option<&Index> {
        self.indexes.iter().find(|i| i.name == name)
    }

    /// Gets a foreign key by name.
    #[must_use]
    pub fn get_foreign_key(&self, name: &str) -> Option<&ForeignKey> {
        self.foreign_keys.iter().find(|fk| fk.name == name)
    }

    /// Returns true if the column is part of the primary key.
    #[must_use]
    pub fn is_primary_key_column(&self, name: &str) -> bool {
        self.primary_key
            .as_ref()
            .is_some_and(|pk| pk.columns.iter().any(|c| c == name))
    }

    /// Returns the value of a table option, keys compared case-insensitively.
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// A view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    /// View name.
    pub name: QualifiedName,
    /// Defining query, canonicalized.
    pub definition: String,
}

/// The complete schema of one database.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaSnapshot {
    /// Tables in declaration order.
    pub tables: Vec<Table>,
    /// Views in declaration order.
    pub views: Vec<View>,
}

impl SchemaSnapshot {
    /// Creates a new empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table to the snapshot.
    #[must_use]
    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Gets a table by name.
    #[must_use]
    pub fn get_table(&self, name: &QualifiedName) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == *name)
    }

    /// Gets a mutable table by name.
    pub fn get_table_mut(&mut self, name: &QualifiedName) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.name == *name)
    }

    /// Gets a view by name.
    #[must_use]
    pub fn get_view(&self, name: &QualifiedName) -> Option<&View> {
        self.views.iter().find(|v| v.name == *name)
    }

    /// Returns true if the snapshot has no tables and no views.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.views.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_builder() {
        let table = Table::new(QualifiedName::new("users"))
            .column(Column::new("id", DataType::new("bigint")).not_null())
            .column(Column::new("email", DataType::new("text")))
            .primary_key(["id"])
            .index(Index::new("users_email", ["email"]).unique());

        assert!(table.is_primary_key_column("id"));
        assert!(!table.is_primary_key_column("email"));
        assert_eq!(table.column_position("email"), Some(1));
        assert!(table.get_index("users_email").is_some_and(|i| i.unique));
    }

    #[test]
    fn test_column_definition_ignores_name_and_aliases() {
        let a = Column::new("a", DataType::new("int")).not_null();
        let b = Column::new("b", DataType::new("integer")).not_null();
        assert!(a.same_definition(&b));

        let c = Column::new("a", DataType::new("int")).not_null().default(Expr::integer(0));
        assert!(!a.same_definition(&c));
    }

    #[test]
    fn test_table_options_lookup() {
        let mut table = Table::new(QualifiedName::new("t"));
        table.options.push(("ENGINE".to_string(), "InnoDB".to_string()));
        assert_eq!(table.option("engine"), Some("InnoDB"));
        assert_eq!(table.option("charset"), None);
    }
}
