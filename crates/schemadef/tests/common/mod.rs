#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;

use schemadef::harness::{read_test_cases, TestCase};
use schemadef::sqlite::SqliteAdapter;

pub fn cases_dir(dialect: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("cases")
        .join(dialect)
}

pub fn cases(dialect: &str) -> BTreeMap<String, TestCase> {
    let dir = cases_dir(dialect);
    let cases = read_test_cases(&dir)
        .unwrap_or_else(|e| panic!("Failed to read cases in {}\nError: {e}", dir.display()));
    assert!(!cases.is_empty(), "No cases in {}", dir.display());
    cases
}

pub async fn memory_database() -> SqliteAdapter {
    SqliteAdapter::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite database")
}

/// Panics with every failed case, one per line.
pub fn report(failures: &[String]) {
    assert!(
        failures.is_empty(),
        "{} case(s) failed:\n{}",
        failures.len(),
        failures.join("\n")
    );
}
