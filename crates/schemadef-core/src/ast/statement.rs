//! DDL statement AST types.

use std::fmt;

use serde::Serialize;

use super::{DataType, Expr};
use crate::lexer::Span;

/// A possibly schema-qualified object name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct QualifiedName {
    /// Schema (or database) qualifier.
    pub schema: Option<String>,
    /// Object name.
    pub name: String,
}

impl QualifiedName {
    /// Creates an unqualified name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    /// Creates a schema-qualified name.
    #[must_use]
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{schema}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// A parsed DDL statement together with its source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// The parsed statement.
    pub kind: StatementKind,
    /// Source text of the statement, without the terminator.
    pub text: String,
    /// Location of the statement in the parsed input.
    pub span: Span,
}

impl Statement {
    /// Returns the statement's original source text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.text
    }
}

/// The statements the engine understands.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// CREATE TABLE.
    CreateTable(CreateTableStatement),
    /// ALTER TABLE.
    AlterTable(AlterTableStatement),
    /// CREATE INDEX.
    CreateIndex(CreateIndexStatement),
    /// CREATE VIEW.
    CreateView(CreateViewStatement),
    /// DROP TABLE.
    DropTable(DropStatement),
    /// DROP VIEW.
    DropView(DropStatement),
    /// DROP INDEX.
    DropIndex(DropIndexStatement),
    /// COMMENT ON.
    Comment(CommentStatement),
}

/// Referential action of a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReferentialAction {
    /// CASCADE.
    Cascade,
    /// SET NULL.
    SetNull,
    /// SET DEFAULT.
    SetDefault,
    /// RESTRICT.
    Restrict,
    /// NO ACTION.
    NoAction,
}

impl ReferentialAction {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
            Self::Restrict => "RESTRICT",
            Self::NoAction => "NO ACTION",
        }
    }
}

/// Sort direction of an index column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortDirection {
    /// ASC.
    Asc,
    /// DESC.
    Desc,
}

/// A column inside an index or key definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexColumn {
    /// Column name.
    pub name: String,
    /// MySQL prefix length.
    pub length: Option<u32>,
    /// Sort direction.
    pub direction: Option<SortDirection>,
}

impl IndexColumn {
    /// Creates an index column without length or direction.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            length: None,
            direction: None,
        }
    }
}

/// REFERENCES clause.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencesClause {
    /// Referenced table.
    pub table: QualifiedName,
    /// Referenced columns.
    pub columns: Vec<String>,
    /// ON DELETE action.
    pub on_delete: Option<ReferentialAction>,
    /// ON UPDATE action.
    pub on_update: Option<ReferentialAction>,
}

/// An attribute attached to a column definition.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnConstraint {
    /// NOT NULL.
    NotNull,
    /// NULL.
    Null,
    /// DEFAULT expr.
    Default(Expr),
    /// [CONSTRAINT name] PRIMARY KEY.
    PrimaryKey {
        /// Constraint name.
        name: Option<String>,
    },
    /// [CONSTRAINT name] UNIQUE [KEY].
    Unique {
        /// Constraint name.
        name: Option<String>,
    },
    /// AUTO_INCREMENT / AUTOINCREMENT.
    AutoIncrement,
    /// [CONSTRAINT name] REFERENCES t (cols).
    References {
        /// Constraint name.
        name: Option<String>,
        /// Referenced table and columns.
        clause: ReferencesClause,
    },
    /// [CONSTRAINT name] CHECK (expr).
    Check {
        /// Constraint name.
        name: Option<String>,
        /// Check expression.
        expr: Expr,
    },
    /// COMMENT 'text'.
    Comment(String),
    /// COLLATE name.
    Collate(String),
    /// CHARACTER SET name.
    CharacterSet(String),
    /// ON UPDATE expr.
    OnUpdate(Expr),
}

/// A column definition inside CREATE TABLE or ALTER TABLE.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Column name.
    pub name: String,
    /// Data type.
    pub data_type: DataType,
    /// Attributes in source order.
    pub constraints: Vec<ColumnConstraint>,
}

/// A table-level constraint or key.
#[derive(Debug, Clone, PartialEq)]
pub enum TableConstraint {
    /// PRIMARY KEY (cols).
    PrimaryKey {
        /// Constraint name.
        name: Option<String>,
        /// Key columns.
        columns: Vec<IndexColumn>,
    },
    /// UNIQUE (cols), or MySQL UNIQUE KEY.
    Unique {
        /// Constraint or index name.
        name: Option<String>,
        /// Key columns.
        columns: Vec<IndexColumn>,
        /// Index method (MySQL `USING BTREE`).
        method: Option<String>,
    },
    /// MySQL KEY/INDEX (cols).
    Index {
        /// Index name.
        name: Option<String>,
        /// Key columns.
        columns: Vec<IndexColumn>,
        /// Index method.
        method: Option<String>,
    },
    /// FOREIGN KEY (cols) REFERENCES ...
    ForeignKey {
        /// Constraint name.
        name: Option<String>,
        /// Local columns.
        columns: Vec<String>,
        /// Referenced table and columns.
        references: ReferencesClause,
    },
    /// CHECK (expr).
    Check {
        /// Constraint name.
        name: Option<String>,
        /// Check expression.
        expr: Expr,
    },
}

/// CREATE TABLE.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
    /// Table name.
    pub name: QualifiedName,
    /// IF NOT EXISTS.
    pub if_not_exists: bool,
    /// Column definitions in order.
    pub columns: Vec<ColumnDef>,
    /// Table constraints in order.
    pub constraints: Vec<TableConstraint>,
    /// Table options such as `ENGINE=InnoDB`, keys upper-cased.
    pub options: Vec<(String, String)>,
}

/// Where ADD COLUMN places the new column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ColumnPosition {
    /// At the end of the table.
    Last,
    /// FIRST.
    First,
    /// AFTER column.
    After(String),
}

/// A change applied by ALTER [COLUMN] c ...
#[derive(Debug, Clone, PartialEq)]
pub enum AlterColumnChange {
    /// TYPE t [COLLATE c] / SET DATA TYPE t [COLLATE c].
    SetType {
        /// New data type.
        data_type: DataType,
        /// New collation; none resets to the type's default.
        collation: Option<String>,
    },
    /// SET NOT NULL.
    SetNotNull,
    /// DROP NOT NULL.
    DropNotNull,
    /// SET DEFAULT expr.
    SetDefault(Expr),
    /// DROP DEFAULT.
    DropDefault,
}

/// One action of an ALTER TABLE statement.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterTableAction {
    /// ADD [COLUMN].
    AddColumn {
        /// The new column.
        column: ColumnDef,
        /// Placement.
        position: ColumnPosition,
    },
    /// DROP [COLUMN].
    DropColumn {
        /// Column name.
        name: String,
        /// IF EXISTS.
        if_exists: bool,
    },
    /// MySQL MODIFY [COLUMN] or CHANGE [COLUMN] old new.
    ModifyColumn {
        /// The column being replaced.
        old_name: String,
        /// Its new definition.
        column: ColumnDef,
        /// Placement.
        position: ColumnPosition,
    },
    /// ALTER [COLUMN] c ...
    AlterColumn {
        /// Column name.
        name: String,
        /// The change.
        change: AlterColumnChange,
    },
    /// RENAME [COLUMN] a TO b.
    RenameColumn {
        /// Old name.
        from: String,
        /// New name.
        to: String,
    },
    /// RENAME [TO] t.
    RenameTable {
        /// New table name.
        to: QualifiedName,
    },
    /// ADD [CONSTRAINT name] ..., ADD INDEX/KEY.
    AddConstraint(TableConstraint),
    /// DROP CONSTRAINT name.
    DropConstraint {
        /// Constraint name.
        name: String,
    },
    /// DROP INDEX/KEY name.
    DropIndex {
        /// Index name.
        name: String,
    },
    /// DROP FOREIGN KEY name.
    DropForeignKey {
        /// Constraint name.
        name: String,
    },
    /// DROP PRIMARY KEY.
    DropPrimaryKey,
    /// DROP CHECK name.
    DropCheck {
        /// Constraint name.
        name: String,
    },
}

/// ALTER TABLE.
#[derive(Debug, Clone, PartialEq)]
pub struct AlterTableStatement {
    /// Table name.
    pub name: QualifiedName,
    /// Actions in order.
    pub actions: Vec<AlterTableAction>,
}

/// CREATE INDEX.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndexStatement {
    /// Index name.
    pub name: String,
    /// Indexed table.
    pub table: QualifiedName,
    /// UNIQUE.
    pub unique: bool,
    /// IF NOT EXISTS.
    pub if_not_exists: bool,
    /// USING method.
    pub method: Option<String>,
    /// Indexed columns.
    pub columns: Vec<IndexColumn>,
    /// Partial index predicate.
    pub condition: Option<Expr>,
}

/// CREATE [OR REPLACE] VIEW.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateViewStatement {
    /// View name.
    pub name: QualifiedName,
    /// OR REPLACE.
    pub or_replace: bool,
    /// Defining query, canonicalized to single-space separated tokens.
    pub definition: String,
}

/// DROP TABLE / DROP VIEW.
#[derive(Debug, Clone, PartialEq)]
pub struct DropStatement {
    /// Dropped objects.
    pub names: Vec<QualifiedName>,
    /// IF EXISTS.
    pub if_exists: bool,
}

/// DROP INDEX.
#[derive(Debug, Clone, PartialEq)]
pub struct DropIndexStatement {
    /// Index name.
    pub name: String,
    /// MySQL `ON table`.
    pub table: Option<QualifiedName>,
    /// IF EXISTS.
    pub if_exists: bool,
}

/// What a COMMENT ON statement annotates.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentTarget {
    /// COMMENT ON TABLE t.
    Table(QualifiedName),
    /// COMMENT ON COLUMN t.c.
    Column {
        /// Table name.
        table: QualifiedName,
        /// Column name.
        column: String,
    },
}

/// COMMENT ON ... IS 'text' | NULL.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentStatement {
    /// Annotated object.
    pub target: CommentTarget,
    /// The comment, `None` for IS NULL.
    pub comment: Option<String>,
}
