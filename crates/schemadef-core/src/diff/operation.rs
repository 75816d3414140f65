//! Schema change operations.

use serde::Serialize;

use crate::ast::{ColumnPosition, QualifiedName};
use crate::schema::{CheckConstraint, Column, ForeignKey, Index, PrimaryKey, Table, View};

/// A single dialect-independent schema change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SchemaOp {
    /// Create a new table. Foreign keys follow as separate
    /// [`SchemaOp::AddForeignKey`] operations.
    CreateTable {
        /// Table definition.
        table: Table,
    },

    /// Drop a table.
    DropTable {
        /// Table name.
        name: QualifiedName,
    },

    /// Rename a table.
    RenameTable {
        /// Old table name.
        from: QualifiedName,
        /// New table name.
        to: QualifiedName,
    },

    /// Add a column to a table.
    AddColumn {
        /// Table name.
        table: QualifiedName,
        /// Column definition.
        column: Column,
        /// Placement, honored where column order is observable.
        position: ColumnPosition,
    },

    /// Drop a column from a table.
    DropColumn {
        /// Table name.
        table: QualifiedName,
        /// Column name.
        column: String,
    },

    /// Rename a column.
    RenameColumn {
        /// Table name.
        table: QualifiedName,
        /// Old column name.
        from: String,
        /// New column name.
        to: String,
    },

    /// Change a column's definition.
    ModifyColumn {
        /// Table name.
        table: QualifiedName,
        /// Current definition.
        from: Column,
        /// Desired definition.
        to: Column,
    },

    /// Create an index or unique constraint.
    AddIndex {
        /// Table name.
        table: QualifiedName,
        /// Index definition.
        index: Index,
    },

    /// Drop an index or unique constraint.
    DropIndex {
        /// Table name.
        table: QualifiedName,
        /// The index being dropped.
        index: Index,
    },

    /// Add a primary key.
    AddPrimaryKey {
        /// Table name.
        table: QualifiedName,
        /// Key definition.
        primary_key: PrimaryKey,
    },

    /// Drop the primary key.
    DropPrimaryKey {
        /// Table name.
        table: QualifiedName,
        /// The key being dropped.
        primary_key: PrimaryKey,
    },

    /// Add a foreign key constraint.
    AddForeignKey {
        /// Table name.
        table: QualifiedName,
        /// Foreign key definition.
        foreign_key: ForeignKey,
    },

    /// Drop a foreign key constraint.
    DropForeignKey {
        /// Table name.
        table: QualifiedName,
        /// The foreign key being dropped.
        foreign_key: ForeignKey,
    },

    /// Add a CHECK constraint.
    AddCheck {
        /// Table name.
        table: QualifiedName,
        /// Check definition.
        check: CheckConstraint,
    },

    /// Drop a CHECK constraint.
    DropCheck {
        /// Table name.
        table: QualifiedName,
        /// The check being dropped.
        check: CheckConstraint,
    },

    /// Create a view.
    CreateView {
        /// View definition.
        view: View,
    },

    /// Drop a view.
    DropView {
        /// View name.
        name: QualifiedName,
    },

    /// Replace a view's defining query.
    ReplaceView {
        /// New view definition.
        view: View,
    },
}

impl SchemaOp {
    /// Returns the table this operation alters, if it alters an existing table.
    #[must_use]
    pub fn table(&self) -> Option<&QualifiedName> {
        match self {
            Self::AddColumn { table, .. }
            | Self::DropColumn { table, .. }
            | Self::RenameColumn { table, .. }
            | Self::ModifyColumn { table, .. }
            | Self::AddIndex { table, .. }
            | Self::DropIndex { table, .. }
            | Self::AddPrimaryKey { table, .. }
            | Self::DropPrimaryKey { table, .. }
            | Self::AddForeignKey { table, .. }
            | Self::DropForeignKey { table, .. }
            | Self::AddCheck { table, .. }
            | Self::DropCheck { table, .. } => Some(table),
            Self::RenameTable { from, .. } => Some(from),
            Self::CreateTable { .. }
            | Self::DropTable { .. }
            | Self::CreateView { .. }
            | Self::DropView { .. }
            | Self::ReplaceView { .. } => None,
        }
    }

    /// Returns a short human-readable description.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::CreateTable { table } => format!("create table {}", table.name),
            Self::DropTable { name } => format!("drop table {name}"),
            Self::RenameTable { from, to } => format!("rename table {from} to {to}"),
            Self::AddColumn { table, column, .. } => {
                format!("add column {}.{}", table, column.name)
            }
            Self::DropColumn { table, column } => format!("drop column {table}.{column}"),
            Self::RenameColumn { table, from, to } => {
                format!("rename column {table}.{from} to {to}")
            }
            Self::ModifyColumn { table, to, .. } => format!("modify column {}.{}", table, to.name),
            Self::AddIndex { table, index } => format!("add index {} on {}", index.name, table),
            Self::DropIndex { table, index } => format!("drop index {} on {}", index.name, table),
            Self::AddPrimaryKey { table, .. } => format!("add primary key on {table}"),
            Self::DropPrimaryKey { table, .. } => format!("drop primary key on {table}"),
            Self::AddForeignKey { table, foreign_key } => {
                format!("add foreign key {} on {}", foreign_key.name, table)
            }
            Self::DropForeignKey { table, foreign_key } => {
                format!("drop foreign key {} on {}", foreign_key.name, table)
            }
            Self::AddCheck { table, check } => format!("add check {} on {}", check.name, table),
            Self::DropCheck { table, check } => format!("drop check {} on {}", check.name, table),
            Self::CreateView { view } => format!("create view {}", view.name),
            Self::DropView { name } => format!("drop view {name}"),
            Self::ReplaceView { view } => format!("replace view {}", view.name),
        }
    }
}
