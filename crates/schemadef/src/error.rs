//! Error types for schema migrations.

use std::path::PathBuf;

/// Errors that can occur while dumping, diffing or migrating a database.
#[derive(Debug, thiserror::Error)]
pub enum SchemadefError {
    /// The schema engine rejected a schema or a change.
    #[error(transparent)]
    Engine(#[from] schemadef_core::Error),

    /// Database error outside statement execution.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A generated statement failed; the transaction was rolled back.
    #[error("Statement {index} failed: {source}\n{sql}")]
    Statement {
        /// Zero-based position of the statement in the batch.
        index: usize,
        /// Statement text.
        sql: String,
        /// Driver error.
        source: sqlx::Error,
    },

    /// IO error (reading schema or test case files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The database URL does not name a supported driver.
    #[error("Unsupported database URL: {0}")]
    UnsupportedDatabase(String),

    /// Failed to parse a test case file.
    #[error("Failed to parse test case file '{path}': {message}")]
    TestCaseFile {
        /// Path to the file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Two test case files define the same case.
    #[error("There are multiple test cases named '{0}'")]
    DuplicateTestCase(String),

    /// Generated DDL differs from the expected output.
    #[error("Unexpected DDL:\nexpected:\n```\n{expected}```\n\nactual:\n```\n{actual}```")]
    OutputMismatch {
        /// Expected statements, joined.
        expected: String,
        /// Generated statements, joined.
        actual: String,
    },

    /// A schema that should be converged still produces DDL.
    #[error("Expected nothing to be modified, but got:\n```\n{0}```")]
    NotIdempotent(String),
}

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, SchemadefError>;
