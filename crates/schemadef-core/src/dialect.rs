//! The closed set of supported SQL dialects.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

/// A database family selecting parsing grammar and rendering rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// MySQL and MariaDB.
    Mysql,
    /// PostgreSQL.
    Postgres,
    /// SQLite 3.
    Sqlite,
}

impl Dialect {
    /// All supported dialects.
    pub const ALL: [Self; 3] = [Self::Mysql, Self::Postgres, Self::Sqlite];

    /// Returns the canonical tag of the dialect.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }

    /// Returns the schema name that unqualified objects live in, if the
    /// dialect has one that dumps spell out.
    #[must_use]
    pub const fn default_schema(&self) -> Option<&'static str> {
        match self {
            Self::Mysql => None,
            Self::Postgres => Some("public"),
            Self::Sqlite => Some("main"),
        }
    }

    /// Returns true if unquoted identifiers are folded to lower case.
    #[must_use]
    pub const fn folds_identifiers(&self) -> bool {
        matches!(self, Self::Postgres)
    }

    /// Returns true if a double-quoted token is a string literal rather than
    /// an identifier.
    #[must_use]
    pub const fn double_quote_is_string(&self) -> bool {
        matches!(self, Self::Mysql)
    }

    /// Returns true if backticks quote identifiers.
    #[must_use]
    pub const fn accepts_backticks(&self) -> bool {
        matches!(self, Self::Mysql | Self::Sqlite)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Self::Mysql),
            "postgres" | "postgresql" | "psql" => Ok(Self::Postgres),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            _ => Err(Error::UnsupportedDialect(s.to_string())),
        }
    }
}
