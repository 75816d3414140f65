//! End-to-end tests for the parse, build, diff and generate pipeline.
//!
//! Each migration is replayed on top of the current schema text and diffed
//! again against the desired schema; a converged migration leaves nothing
//! to do.

mod common;
use common::*;

use schemadef_core::{generate_idempotent_ddls, Dialect, Error, SchemaOp};

// =============================================================================
// Basic examples
// =============================================================================

#[test]
fn add_column_in_every_dialect() {
    let current = "CREATE TABLE users (id bigint, name varchar(100));";
    let desired = "CREATE TABLE users (id bigint, name varchar(100), age int);";
    for dialect in Dialect::ALL {
        let generated = assert_converges(dialect, current, desired);
        assert_eq!(generated, vec!["ALTER TABLE users ADD COLUMN age int"], "{dialect}");
        assert!(ddls(dialect, desired, desired).is_empty(), "{dialect}");
    }
}

#[test]
fn referenced_table_is_created_before_foreign_key() {
    let desired = "CREATE TABLE a (id int); \
                   CREATE TABLE b (id int, a_id int, FOREIGN KEY (a_id) REFERENCES a(id));";
    for dialect in Dialect::ALL {
        let generated = assert_converges(dialect, "", desired);
        let create_a = generated
            .iter()
            .position(|ddl| ddl.starts_with("CREATE TABLE a "))
            .unwrap_or_else(|| panic!("no CREATE TABLE a for {dialect}: {generated:?}"));
        let foreign_key = generated
            .iter()
            .position(|ddl| ddl.contains("REFERENCES a (id)"))
            .unwrap_or_else(|| panic!("no foreign key for {dialect}: {generated:?}"));
        assert!(create_a < foreign_key, "{dialect}: {generated:?}");
    }
}

#[test]
fn foreign_key_is_deferred_until_tables_exist() {
    let generated = ddls(
        Dialect::Mysql,
        "",
        "CREATE TABLE b (id int, a_id int, CONSTRAINT b_a FOREIGN KEY (a_id) REFERENCES a (id)); \
         CREATE TABLE a (id int);",
    );
    assert_eq!(
        generated,
        vec![
            "CREATE TABLE b (\n    id int,\n    a_id int\n)",
            "CREATE TABLE a (\n    id int\n)",
            "ALTER TABLE b ADD CONSTRAINT b_a FOREIGN KEY (a_id) REFERENCES a (id)",
        ]
    );
}

#[test]
fn identical_schemas_produce_nothing() {
    let schema = "CREATE TABLE users (id int PRIMARY KEY, email varchar(255) NOT NULL UNIQUE); \
                  CREATE INDEX users_email_idx ON users (email); \
                  CREATE VIEW emails AS SELECT email FROM users;";
    for dialect in Dialect::ALL {
        assert!(ops(dialect, schema, schema).is_empty(), "{dialect}");
    }
}

#[test]
fn generation_is_deterministic() {
    let current = "CREATE TABLE a (id int, x int); CREATE TABLE gone1 (id int); \
                   CREATE TABLE gone2 (id int);";
    let desired = "CREATE TABLE a (id int, y int, z text); CREATE TABLE c (id int); \
                   CREATE TABLE d (id int);";
    for dialect in Dialect::ALL {
        let first = ddls(dialect, current, desired);
        for _ in 0..5 {
            assert_eq!(ddls(dialect, current, desired), first, "{dialect}");
        }
    }
}

// =============================================================================
// MySQL
// =============================================================================

const MYSQL_CURRENT: &str = "
CREATE TABLE users (
    id bigint NOT NULL AUTO_INCREMENT,
    name varchar(100),
    legacy int,
    PRIMARY KEY (id)
) ENGINE=InnoDB;
CREATE TABLE posts (
    id bigint NOT NULL,
    user_id bigint,
    title varchar(10),
    PRIMARY KEY (id),
    KEY user_id (user_id)
);
";

const MYSQL_DESIRED: &str = "
CREATE TABLE users (
    id bigint NOT NULL AUTO_INCREMENT,
    email varchar(255) NOT NULL DEFAULT '',
    name varchar(200) NOT NULL,
    created_at datetime DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
    PRIMARY KEY (id),
    UNIQUE KEY email (email)
) ENGINE=InnoDB;
CREATE TABLE posts (
    id bigint NOT NULL,
    user_id bigint,
    title varchar(10) COMMENT 'Headline',
    PRIMARY KEY (id),
    KEY user_id (user_id),
    CONSTRAINT posts_user_fk FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
);
CREATE VIEW active_users AS SELECT id, name FROM users;
";

#[test]
fn mysql_alter_tables() {
    let generated = assert_converges(Dialect::Mysql, MYSQL_CURRENT, MYSQL_DESIRED);
    assert_eq!(
        generated,
        vec![
            "ALTER TABLE users DROP COLUMN legacy, \
             ADD COLUMN email varchar(255) NOT NULL DEFAULT '' AFTER id, \
             ADD COLUMN created_at datetime DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP, \
             MODIFY COLUMN name varchar(200) NOT NULL, \
             ADD UNIQUE KEY email (email)",
            "ALTER TABLE posts MODIFY COLUMN title varchar(10) COMMENT 'Headline'",
            "ALTER TABLE posts ADD CONSTRAINT posts_user_fk FOREIGN KEY (user_id) \
             REFERENCES users (id) ON DELETE CASCADE",
            "CREATE VIEW active_users AS SELECT id , name FROM users",
        ]
    );
}

#[test]
fn mysql_from_empty_database() {
    assert_converges(Dialect::Mysql, "", MYSQL_DESIRED);
}

#[test]
fn mysql_drop_everything() {
    assert_converges(Dialect::Mysql, MYSQL_DESIRED, "");
}

#[test]
fn mysql_cyclic_foreign_keys_are_dropped_first() {
    let current = "CREATE TABLE a (id int PRIMARY KEY, b_id int); \
                   CREATE TABLE b (id int PRIMARY KEY, a_id int, \
                       CONSTRAINT b_a FOREIGN KEY (a_id) REFERENCES a (id)); \
                   ALTER TABLE a ADD CONSTRAINT a_b FOREIGN KEY (b_id) REFERENCES b (id);";
    let generated = assert_converges(Dialect::Mysql, current, "");
    assert_eq!(
        generated,
        vec![
            "ALTER TABLE a DROP FOREIGN KEY a_b",
            "ALTER TABLE b DROP FOREIGN KEY b_a",
            "DROP TABLE a",
            "DROP TABLE b",
        ]
    );
}

#[test]
fn mysql_changed_foreign_key_is_recreated() {
    let current = "CREATE TABLE users (id int PRIMARY KEY); \
                   CREATE TABLE posts (id int PRIMARY KEY, user_id int, \
                       CONSTRAINT fk FOREIGN KEY (user_id) REFERENCES users (id));";
    let desired = "CREATE TABLE users (id int PRIMARY KEY); \
                   CREATE TABLE posts (id int PRIMARY KEY, user_id int, \
                       CONSTRAINT fk FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE SET NULL);";
    let generated = assert_converges(Dialect::Mysql, current, desired);
    assert_eq!(
        generated,
        vec![
            "ALTER TABLE posts DROP FOREIGN KEY fk",
            "ALTER TABLE posts ADD CONSTRAINT fk FOREIGN KEY (user_id) REFERENCES users (id) \
             ON DELETE SET NULL",
        ]
    );
}

// =============================================================================
// PostgreSQL
// =============================================================================

const POSTGRES_CURRENT: &str = "
CREATE TABLE users (
    id serial PRIMARY KEY,
    name text,
    age integer,
    status text DEFAULT 'new'
);
CREATE INDEX users_name_idx ON users (name);
CREATE TABLE posts (
    id serial PRIMARY KEY,
    user_id integer NOT NULL,
    body text
);
CREATE VIEW names AS SELECT id FROM users;
";

const POSTGRES_DESIRED: &str = "
CREATE TABLE public.users (
    id serial PRIMARY KEY,
    name text NOT NULL,
    age bigint DEFAULT 0,
    status text,
    email text UNIQUE,
    CHECK (age >= 0)
);
COMMENT ON COLUMN users.name IS 'Display name';
CREATE INDEX users_active_idx ON users (name) WHERE status IS NOT NULL;
CREATE TABLE posts (
    id serial PRIMARY KEY,
    user_id integer NOT NULL REFERENCES users (id),
    body text
);
CREATE VIEW names AS SELECT id, name FROM users;
";

#[test]
fn postgres_alter_tables() {
    let generated = assert_converges(Dialect::Postgres, POSTGRES_CURRENT, POSTGRES_DESIRED);
    assert_eq!(
        generated,
        vec![
            "DROP INDEX users_name_idx",
            "ALTER TABLE users ADD COLUMN email text, ALTER COLUMN name SET NOT NULL",
            "COMMENT ON COLUMN users.name IS 'Display name'",
            "ALTER TABLE users ALTER COLUMN age TYPE bigint, ALTER COLUMN age SET DEFAULT 0, \
             ALTER COLUMN status DROP DEFAULT, \
             ADD CONSTRAINT users_email_key UNIQUE (email)",
            "CREATE INDEX users_active_idx ON users (name) WHERE status IS NOT NULL",
            "ALTER TABLE users ADD CONSTRAINT users_check CHECK (age >= 0)",
            "ALTER TABLE posts ADD CONSTRAINT posts_user_id_fkey FOREIGN KEY (user_id) \
             REFERENCES users (id)",
            "CREATE OR REPLACE VIEW names AS SELECT id , name FROM users",
        ]
    );
}

#[test]
fn postgres_from_empty_database() {
    let generated = assert_converges(Dialect::Postgres, "", POSTGRES_DESIRED);
    assert!(generated[0].starts_with("CREATE TABLE users (\n    id serial NOT NULL,"));
}

#[test]
fn postgres_drop_everything() {
    assert_converges(Dialect::Postgres, POSTGRES_DESIRED, "");
}

#[test]
fn postgres_explicit_renames() {
    let current = "CREATE TABLE accounts (id int PRIMARY KEY, name text); \
                   CREATE INDEX accounts_name_idx ON accounts (name);";
    let desired = "CREATE TABLE accounts (id int PRIMARY KEY, name text); \
                   CREATE INDEX accounts_name_idx ON accounts (name); \
                   ALTER TABLE accounts RENAME TO users; \
                   ALTER TABLE users RENAME COLUMN name TO full_name;";
    let generated = assert_converges(Dialect::Postgres, current, desired);
    assert_eq!(
        generated,
        vec![
            "ALTER TABLE accounts RENAME TO users",
            "ALTER TABLE users RENAME COLUMN name TO full_name",
        ]
    );
}

#[test]
fn postgres_case_sensitive_names_are_quoted() {
    let generated = assert_converges(
        Dialect::Postgres,
        "CREATE TABLE \"Users\" (id int);",
        "CREATE TABLE \"Users\" (id int, \"displayName\" text);",
    );
    assert_eq!(
        generated,
        vec!["ALTER TABLE \"Users\" ADD COLUMN \"displayName\" text"]
    );
}

#[test]
fn nested_negation_survives_a_round_trip() {
    let desired = "CREATE TABLE t (id int, d int DEFAULT - -1, e int DEFAULT - - - 1, \
                   c int CHECK (c > - -1));";
    for dialect in Dialect::ALL {
        let generated = assert_converges(dialect, "", desired);
        assert!(
            generated.iter().all(|ddl| !ddl.contains("--")),
            "{dialect}: {generated:?}"
        );
    }
}

// =============================================================================
// SQLite
// =============================================================================

const SQLITE_CURRENT: &str = "
CREATE TABLE users (id integer PRIMARY KEY AUTOINCREMENT, name text);
CREATE TABLE legacy (id integer);
CREATE VIEW names AS SELECT id FROM users;
";

const SQLITE_DESIRED: &str = "
CREATE TABLE users (id integer PRIMARY KEY AUTOINCREMENT, name text, nickname text DEFAULT 'x');
CREATE INDEX users_name ON users (name);
CREATE TABLE posts (
    id integer PRIMARY KEY,
    user_id integer REFERENCES users (id) ON DELETE CASCADE
);
CREATE VIEW names AS SELECT id, name FROM users;
";

#[test]
fn sqlite_alter_tables() {
    let generated = assert_converges(Dialect::Sqlite, SQLITE_CURRENT, SQLITE_DESIRED);
    assert_eq!(
        generated,
        vec![
            "DROP TABLE legacy",
            "ALTER TABLE users ADD COLUMN nickname text DEFAULT 'x'",
            "CREATE INDEX users_name ON users (name)",
            "CREATE TABLE posts (\n    id integer NOT NULL PRIMARY KEY,\n    user_id integer,\n    \
             CONSTRAINT posts_user_id_fkey FOREIGN KEY (user_id) REFERENCES users (id) \
             ON DELETE CASCADE\n)",
            "DROP VIEW names",
            "CREATE VIEW names AS SELECT id , name FROM users",
        ]
    );
}

#[test]
fn sqlite_from_empty_database() {
    assert_converges(Dialect::Sqlite, "", SQLITE_DESIRED);
}

#[test]
fn sqlite_drop_everything() {
    assert_converges(Dialect::Sqlite, SQLITE_DESIRED, "");
}

#[test]
fn sqlite_rejects_column_changes() {
    let err = generate_idempotent_ddls(
        Dialect::Sqlite,
        "CREATE TABLE users (id integer, name text NOT NULL DEFAULT '')",
        "CREATE TABLE users (id integer, name text)",
    )
    .unwrap_err();
    assert_eq!(
        err,
        Error::UnsupportedOperation {
            dialect: "sqlite".to_string(),
            operation: "modify column users.name".to_string(),
        }
    );
}

#[test]
fn sqlite_rejects_foreign_key_on_existing_table() {
    let err = generate_idempotent_ddls(
        Dialect::Sqlite,
        "CREATE TABLE a (id integer PRIMARY KEY); \
         CREATE TABLE b (a_id integer REFERENCES a (id));",
        "CREATE TABLE a (id integer PRIMARY KEY); CREATE TABLE b (a_id integer);",
    )
    .unwrap_err();
    assert!(matches!(err, Error::UnsupportedOperation { .. }), "{err:?}");
}

// =============================================================================
// Operations
// =============================================================================

#[test]
fn dropped_column_without_rename_is_drop_and_add() {
    let ops = ops(
        Dialect::Mysql,
        "CREATE TABLE users (id int, name text)",
        "CREATE TABLE users (id int, full_name text)",
    );
    assert_eq!(
        ops.iter().map(SchemaOp::describe).collect::<Vec<_>>(),
        vec!["drop column users.name", "add column users.full_name"]
    );
}
