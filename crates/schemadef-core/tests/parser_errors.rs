//! Tests for the error taxonomy of the engine entry points.

mod common;
use common::*;

use schemadef_core::{generate_idempotent_ddls, Dialect, Error};

#[test]
fn error_unclosed_column_list() {
    let err = parse_err(Dialect::Mysql, "CREATE TABLE users (id int");
    assert!(matches!(err, Error::Syntax { .. }), "{err:?}");
}

#[test]
fn error_syntax_position_points_at_token() {
    let sql = "CREATE TABLE a (id int);\nCREATE TABLE b (id int PRIMARY);";
    let Error::Syntax {
        position,
        line,
        column,
        ..
    } = parse_err(Dialect::Postgres, sql)
    else {
        panic!("expected syntax error");
    };
    assert_eq!(line, 2);
    assert_eq!(&sql[position..position + 1], ")");
    assert_eq!(column, position - sql.find('\n').unwrap_or_default());
}

#[test]
fn error_trigger_is_unsupported() {
    let sql = "CREATE TABLE a (id int); CREATE TRIGGER trg AFTER INSERT ON a BEGIN SELECT 1; END;";
    let err = parse_err(Dialect::Sqlite, sql);
    let Error::UnsupportedStatement { statement } = err else {
        panic!("expected unsupported statement, got {err:?}");
    };
    assert!(statement.starts_with("CREATE TRIGGER trg"), "{statement}");
}

#[test]
fn error_insert_is_unsupported() {
    let err = parse_err(Dialect::Mysql, "INSERT INTO users VALUES (1)");
    assert!(matches!(err, Error::UnsupportedStatement { .. }), "{err:?}");
}

#[test]
fn error_alter_unknown_table() {
    let err = generate_idempotent_ddls(
        Dialect::Postgres,
        "ALTER TABLE users ADD COLUMN age int",
        "",
    )
    .unwrap_err();
    assert_eq!(err, Error::semantic("table does not exist", "users"));
}

#[test]
fn error_foreign_key_to_unknown_column() {
    let err = generate_idempotent_ddls(
        Dialect::Mysql,
        "CREATE TABLE a (id int); CREATE TABLE b (a_id int, FOREIGN KEY (a_id) REFERENCES a (uid));",
        "",
    )
    .unwrap_err();
    assert!(
        matches!(err, Error::Semantic { ref column, .. } if column.as_deref() == Some("uid")),
        "{err:?}"
    );
}

#[test]
fn error_in_current_dump_surfaces() {
    let err = generate_idempotent_ddls(Dialect::Sqlite, "", "CREATE TABLE t (id int").unwrap_err();
    assert!(matches!(err, Error::Syntax { .. }), "{err:?}");
}

#[test]
fn error_unknown_dialect_tag() {
    let err = "oracle".parse::<Dialect>().unwrap_err();
    assert_eq!(err.to_string(), "unsupported dialect: oracle");
}
