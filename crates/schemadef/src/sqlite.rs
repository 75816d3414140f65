//! SQLite adapter.

use async_trait::async_trait;
use schemadef_core::Dialect;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::debug;

use crate::adapter::DatabaseAdapter;
use crate::error::{Result, SchemadefError};
use crate::executor::run_in_transaction;

/// Schema objects in dump order. SQLite keeps the original CREATE text of
/// each object; internal tables and automatic indexes are left out.
const DUMP_QUERY: &str = "\
    SELECT sql FROM sqlite_master \
    WHERE sql IS NOT NULL AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' \
    ORDER BY CASE type WHEN 'table' THEN 0 WHEN 'index' THEN 1 WHEN 'view' THEN 2 ELSE 3 END, \
    rowid";

/// A SQLite database reached through a connection pool.
#[derive(Debug, Clone)]
pub struct SqliteAdapter {
    pool: SqlitePool,
}

impl SqliteAdapter {
    /// Creates an adapter over an existing pool.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connects to a `sqlite:` URL.
    ///
    /// # Errors
    ///
    /// Returns [`SchemadefError::UnsupportedDatabase`] for other URL schemes
    /// and the driver error if the connection fails.
    pub async fn connect(url: &str) -> Result<Self> {
        if !url.starts_with("sqlite:") {
            return Err(SchemadefError::UnsupportedDatabase(url.to_string()));
        }
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Returns the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl DatabaseAdapter for SqliteAdapter {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    async fn dump_schema_as_ddl(&self) -> Result<String> {
        let rows: Vec<(String,)> = sqlx::query_as(DUMP_QUERY).fetch_all(&self.pool).await?;
        debug!(objects = rows.len(), "Dumped schema");
        Ok(rows.into_iter().map(|(sql,)| format!("{sql};\n")).collect())
    }

    async fn run_ddls(&self, ddls: &[String]) -> Result<()> {
        run_in_transaction(&self.pool, ddls).await
    }
}
