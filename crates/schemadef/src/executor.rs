//! Migration executor.
//!
//! This module brings a database to a desired schema: it dumps the live
//! schema, computes the DDL and runs it in a single transaction.

use sqlx::sqlite::SqlitePool;
use tracing::{debug, info, warn};

use crate::adapter::{generate_ddls, DatabaseAdapter};
use crate::error::{Result, SchemadefError};

/// Runs statements in one transaction on `pool`.
///
/// # Errors
///
/// Returns [`SchemadefError::Statement`] for the first failing statement,
/// after rolling back everything that ran before it.
pub async fn run_in_transaction(pool: &SqlitePool, ddls: &[String]) -> Result<()> {
    let mut transaction = pool.begin().await?;
    info!(statements = ddls.len(), "Began transaction");

    for (index, sql) in ddls.iter().enumerate() {
        debug!(sql = %sql, "Executing SQL");
        if let Err(source) = sqlx::query(sql).execute(&mut *transaction).await {
            warn!(index, sql = %sql, "Statement failed, rolling back");
            transaction.rollback().await?;
            return Err(SchemadefError::Statement {
                index,
                sql: sql.clone(),
                source,
            });
        }
    }

    transaction.commit().await?;
    info!(statements = ddls.len(), "Committed transaction");
    Ok(())
}

/// Applies a desired schema to a database.
pub struct Migrator<A: DatabaseAdapter> {
    adapter: A,
    dry_run: bool,
}

impl<A: DatabaseAdapter> Migrator<A> {
    /// Creates a new migrator.
    pub const fn new(adapter: A) -> Self {
        Self {
            adapter,
            dry_run: false,
        }
    }

    /// Enables dry-run mode (DDL is computed but not executed).
    #[must_use]
    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Returns the adapter.
    #[must_use]
    pub const fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Computes the DDL that brings the database to `desired`.
    ///
    /// # Errors
    ///
    /// Returns the dump or engine error.
    pub async fn plan(&self, desired: &str) -> Result<Vec<String>> {
        generate_ddls(&self.adapter, desired).await
    }

    /// Brings the database to `desired` and returns the DDL that ran, or
    /// would have run in dry-run mode.
    ///
    /// # Errors
    ///
    /// Returns the dump, engine or execution error. A failed execution
    /// leaves the database untouched.
    pub async fn apply(&self, desired: &str) -> Result<Vec<String>> {
        let ddls = self.plan(desired).await?;
        if ddls.is_empty() {
            info!("Schema is up to date");
        } else if self.dry_run {
            info!(statements = ddls.len(), "Dry run, nothing executed");
        } else {
            self.adapter.run_ddls(&ddls).await?;
            info!(statements = ddls.len(), "Schema migrated");
        }
        Ok(ddls)
    }
}
