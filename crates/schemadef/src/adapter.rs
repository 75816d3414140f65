//! The database capability the migrator relies on.

use async_trait::async_trait;
use schemadef_core::{generate_idempotent_ddls, parse_ddls, Dialect};
use tracing::debug;

use crate::error::Result;

/// A live database that can describe its schema and run DDL.
#[async_trait]
pub trait DatabaseAdapter: Send + Sync {
    /// Returns the dialect the database speaks.
    fn dialect(&self) -> Dialect;

    /// Dumps the live schema as DDL text parseable for [`Self::dialect`].
    async fn dump_schema_as_ddl(&self) -> Result<String>;

    /// Runs statements sequentially in one transaction, rolling back on the
    /// first failure.
    async fn run_ddls(&self, ddls: &[String]) -> Result<()>;
}

/// Computes the DDL that brings the database to `desired`.
///
/// # Errors
///
/// Returns the dump failure, or the engine error for either schema.
pub async fn generate_ddls(adapter: &dyn DatabaseAdapter, desired: &str) -> Result<Vec<String>> {
    let current = adapter.dump_schema_as_ddl().await?;
    let ddls = generate_idempotent_ddls(adapter.dialect(), desired, &current)?;
    debug!(statements = ddls.len(), "Computed migration");
    Ok(ddls)
}

/// Splits DDL text into the source text of each statement.
///
/// # Errors
///
/// Returns the parse error of the text.
pub fn split_ddls(dialect: Dialect, text: &str) -> Result<Vec<String>> {
    Ok(parse_ddls(dialect, text)?
        .into_iter()
        .map(|statement| statement.text)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_ddls() {
        let ddls = split_ddls(
            Dialect::Sqlite,
            "CREATE TABLE a (id int);;\nCREATE INDEX a_id ON a (id)",
        )
        .unwrap();
        assert_eq!(ddls, vec!["CREATE TABLE a (id int)", "CREATE INDEX a_id ON a (id)"]);
    }

    #[test]
    fn test_split_ddls_rejects_unsupported() {
        assert!(split_ddls(Dialect::Mysql, "SELECT 1").is_err());
    }
}
