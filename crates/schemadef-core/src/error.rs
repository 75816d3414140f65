//! Error types for the schema engine.

use crate::parser::{ParseError, ParseErrorKind};

/// Errors that can occur while parsing, building, diffing or rendering a schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The DDL text is malformed.
    #[error("syntax error at line {line}, column {column}: {message}")]
    Syntax {
        /// Byte offset of the offending token.
        position: usize,
        /// 1-based line of the offending token.
        line: usize,
        /// 1-based column of the offending token.
        column: usize,
        /// What went wrong.
        message: String,
    },

    /// The statement is valid SQL but cannot be modeled.
    #[error("unsupported statement: {statement}")]
    UnsupportedStatement {
        /// Full source text of the statement.
        statement: String,
    },

    /// A statement refers to an object that does not exist, or redefines one
    /// that does.
    #[error("{what}: table '{table}'{}", .column.as_ref().map(|c| format!(", column '{c}'")).unwrap_or_default())]
    Semantic {
        /// Description of the problem.
        what: String,
        /// Table involved.
        table: String,
        /// Column involved, if any.
        column: Option<String>,
    },

    /// The dialect tag is not one of the supported dialects.
    #[error("unsupported dialect: {0}")]
    UnsupportedDialect(String),

    /// The dialect has no DDL for the requested change.
    #[error("{dialect} cannot {operation}")]
    UnsupportedOperation {
        /// Dialect tag.
        dialect: String,
        /// The change that could not be rendered.
        operation: String,
    },
}

impl Error {
    /// Creates a semantic error about a table.
    #[must_use]
    pub fn semantic(what: impl Into<String>, table: impl ToString) -> Self {
        Self::Semantic {
            what: what.into(),
            table: table.to_string(),
            column: None,
        }
    }

    /// Creates a semantic error about a column of a table.
    #[must_use]
    pub fn semantic_column(
        what: impl Into<String>,
        table: impl ToString,
        column: impl Into<String>,
    ) -> Self {
        Self::Semantic {
            what: what.into(),
            table: table.to_string(),
            column: Some(column.into()),
        }
    }

    /// Converts a parser error into an engine error, locating it in `input`.
    #[must_use]
    pub fn from_parse_error(err: ParseError, input: &str) -> Self {
        match err.kind {
            ParseErrorKind::Unsupported => Self::UnsupportedStatement {
                statement: input
                    .get(err.span.start..err.span.end)
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
            },
            ParseErrorKind::Syntax => {
                let (line, column) = err.span.line_col(input);
                Self::Syntax {
                    position: err.span.start,
                    line,
                    column,
                    message: err.message,
                }
            }
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
