//! Abstract Syntax Tree (AST) types for DDL statements.

mod expression;
mod statement;
mod types;

pub use expression::{BinaryOp, Expr, FunctionCall, Literal, UnaryOp};
pub use statement::{
    AlterColumnChange, AlterTableAction, AlterTableStatement, ColumnConstraint, ColumnDef,
    ColumnPosition, CommentStatement, CommentTarget, CreateIndexStatement, CreateTableStatement,
    CreateViewStatement, DropIndexStatement, DropStatement, IndexColumn, QualifiedName,
    ReferencesClause, ReferentialAction, SortDirection, Statement, StatementKind,
    TableConstraint,
};
pub use types::DataType;
