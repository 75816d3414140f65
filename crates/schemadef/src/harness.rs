//! Idempotence test harness.
//!
//! Test cases live in YAML files mapping a case name to its `current`
//! schema, its `desired` schema and the expected `output` DDL. Each case is
//! run against a database adapter: the current schema is applied, the
//! migration to the desired schema is compared against the output, and both
//! schemas must be stable once applied.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use schemadef_core::{build_schema, join_ddls, parse_ddls, Dialect};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use crate::adapter::{generate_ddls, split_ddls, DatabaseAdapter};
use crate::error::{Result, SchemadefError};

/// One migration scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestCase {
    /// Schema the database starts with. Empty means no schema.
    pub current: String,
    /// Schema to migrate to.
    pub desired: String,
    /// Expected DDL, joined with `;\n`. Empty means the desired text.
    pub output: String,
}

/// Reads every `.yml` and `.yaml` file in `dir`.
///
/// # Errors
///
/// Returns an error if a file cannot be read or parsed, or if two files
/// define a case with the same name.
pub fn read_test_cases(dir: &Path) -> Result<BTreeMap<String, TestCase>> {
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    paths.retain(|path| matches!(path.extension().and_then(|e| e.to_str()), Some("yml" | "yaml")));
    paths.sort();

    let mut cases = BTreeMap::new();
    for path in paths {
        let text = fs::read_to_string(&path)?;
        let parsed: BTreeMap<String, TestCase> =
            serde_yaml::from_str(&text).map_err(|e| SchemadefError::TestCaseFile {
                path: path.clone(),
                message: e.to_string(),
            })?;
        for (name, mut case) in parsed {
            if case.output.is_empty() {
                case.output.clone_from(&case.desired);
            }
            if cases.insert(name.clone(), case).is_some() {
                return Err(SchemadefError::DuplicateTestCase(name));
            }
        }
    }
    debug!(dir = %dir.display(), cases = cases.len(), "Read test cases");
    Ok(cases)
}

/// Runs one case against a database.
///
/// # Errors
///
/// Returns [`SchemadefError::OutputMismatch`] or
/// [`SchemadefError::NotIdempotent`] when the case fails, and any adapter or
/// engine error on the way.
pub async fn run_test(db: &dyn DatabaseAdapter, case: &TestCase) -> Result<()> {
    if !case.current.is_empty() {
        let ddls = split_ddls(db.dialect(), &case.current)?;
        db.run_ddls(&ddls).await?;
    }
    assert_converged(db, &case.current).await?;

    let ddls = generate_ddls(db, &case.desired).await?;
    let actual = join_ddls(&ddls);
    if actual != case.output {
        return Err(SchemadefError::OutputMismatch {
            expected: case.output.clone(),
            actual,
        });
    }
    db.run_ddls(&ddls).await?;

    assert_converged(db, &case.desired).await
}

async fn assert_converged(db: &dyn DatabaseAdapter, schema: &str) -> Result<()> {
    let ddls = generate_ddls(db, schema).await?;
    if ddls.is_empty() {
        Ok(())
    } else {
        Err(SchemadefError::NotIdempotent(join_ddls(&ddls)))
    }
}

/// An in-memory stand-in for a database: its dump is every statement run
/// so far.
///
/// Executed statements must leave a schema the engine can build, so the
/// generated DDL of dialects without a live database can still be checked
/// for convergence.
#[derive(Debug)]
pub struct ReplayDatabase {
    dialect: Dialect,
    ddl: Mutex<String>,
}

impl ReplayDatabase {
    /// Creates an empty database.
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            ddl: Mutex::new(String::new()),
        }
    }
}

#[async_trait]
impl DatabaseAdapter for ReplayDatabase {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn dump_schema_as_ddl(&self) -> Result<String> {
        Ok(self.ddl.lock().await.clone())
    }

    async fn run_ddls(&self, ddls: &[String]) -> Result<()> {
        let mut ddl = self.ddl.lock().await;
        let next = format!("{}{}", ddl, join_ddls(ddls));
        build_schema(self.dialect, &parse_ddls(self.dialect, &next)?)?;
        *ddl = next;
        Ok(())
    }
}
