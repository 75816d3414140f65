//! Runs the MySQL and PostgreSQL cases against a replayed schema dump.

mod common;

use schemadef::harness::{run_test, ReplayDatabase};
use schemadef_core::Dialect;

use common::{cases, report};

async fn run_dialect(dialect: Dialect) {
    let mut failures = Vec::new();
    for (name, case) in cases(dialect.as_str()) {
        let db = ReplayDatabase::new(dialect);
        if let Err(e) = run_test(&db, &case).await {
            failures.push(format!("{name}: {e}"));
        }
    }
    report(&failures);
}

#[tokio::test]
async fn mysql_cases_converge() {
    run_dialect(Dialect::Mysql).await;
}

#[tokio::test]
async fn postgres_cases_converge() {
    run_dialect(Dialect::Postgres).await;
}
