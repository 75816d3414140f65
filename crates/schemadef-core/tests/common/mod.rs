#![allow(dead_code)]

use schemadef_core::{
    build_schema, diff, generate_idempotent_ddls, join_ddls, parse_ddls, Dialect, Error,
    SchemaOp, SchemaSnapshot,
};

pub fn snapshot(dialect: Dialect, sql: &str) -> SchemaSnapshot {
    let statements = parse_ddls(dialect, sql)
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"));
    build_schema(dialect, &statements)
        .unwrap_or_else(|e| panic!("Failed to build: {sql}\nError: {e:?}"))
}

pub fn parse_err(dialect: Dialect, sql: &str) -> Error {
    parse_ddls(dialect, sql).expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn ops(dialect: Dialect, current: &str, desired: &str) -> Vec<SchemaOp> {
    diff(&snapshot(dialect, current), &snapshot(dialect, desired))
}

pub fn ddls(dialect: Dialect, current: &str, desired: &str) -> Vec<String> {
    generate_idempotent_ddls(dialect, desired, current)
        .unwrap_or_else(|e| panic!("Failed to generate DDL\nError: {e:?}"))
}

/// Replays the generated DDL on top of `current`, standing in for a dump
/// of the migrated database.
pub fn apply(current: &str, ddls: &[String]) -> String {
    format!("{current};\n{}", join_ddls(ddls))
}

/// Verifies that migrating `current` to `desired` converges: the replayed
/// schema diffs empty against `desired`. Returns the generated DDL.
pub fn assert_converges(dialect: Dialect, current: &str, desired: &str) -> Vec<String> {
    let generated = ddls(dialect, current, desired);
    let migrated = apply(current, &generated);
    let remaining = ddls(dialect, &migrated, desired);
    assert!(
        remaining.is_empty(),
        "Migration did not converge for {dialect}.\n  Generated: {generated:#?}\n  Remaining: {remaining:#?}"
    );
    let backwards = ops(dialect, desired, &migrated);
    assert!(
        backwards.is_empty(),
        "Migrated schema has extra definitions for {dialect}: {backwards:#?}"
    );
    generated
}
