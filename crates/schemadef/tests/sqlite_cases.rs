//! Runs the SQLite cases against a live in-memory database.

mod common;

use schemadef::harness::run_test;

use common::{cases, memory_database, report};

#[tokio::test]
async fn sqlite_cases_converge() {
    let mut failures = Vec::new();
    for (name, case) in cases("sqlite") {
        let db = memory_database().await;
        if let Err(e) = run_test(&db, &case).await {
            failures.push(format!("{name}: {e}"));
        }
    }
    report(&failures);
}

#[tokio::test]
async fn sqlite_unsupported_change_is_not_applied() {
    use schemadef::prelude::*;

    let db = memory_database().await;
    let migrator = Migrator::new(db.clone());
    migrator
        .apply("CREATE TABLE users (id integer PRIMARY KEY, name text);")
        .await
        .unwrap();
    let before = db.dump_schema_as_ddl().await.unwrap();

    let err = migrator
        .apply("CREATE TABLE users (id integer PRIMARY KEY, name text, age integer NOT NULL);")
        .await
        .unwrap_err();
    assert!(
        matches!(err, SchemadefError::Engine(_)),
        "expected an unsupported operation, got {err:?}"
    );
    assert_eq!(db.dump_schema_as_ddl().await.unwrap(), before);
}
